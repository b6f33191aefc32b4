//! SQL builders, one function per statement, rendered with `SqliteQueryBuilder`.

pub mod announcements;
pub mod assignments;
pub mod courses;
pub mod ddl;
pub mod enrollments;
pub mod exams;
pub mod lessons;
pub mod materials;
pub mod metadata;
pub mod progress;
pub mod sessions;
pub mod teachers;
pub mod users;
