// Library interface for testing

// Declare all modules
pub mod accounts;
pub mod admin;
pub mod auth;
pub mod catalog;
pub mod classroom;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod db;
pub mod enrollment;
pub mod error;
pub mod exams;
pub mod grading;
pub mod models;
pub mod progress;
pub mod queries;
pub mod schedule;
pub mod schema;
pub mod seed;
pub mod serve;
pub mod serve_admin;

// Re-export the expected database version for convenience
pub use constants::EXPECTED_DB_VERSION;
