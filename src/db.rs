use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;

use crate::constants::EXPECTED_DB_VERSION;
use crate::error::DynError;
use crate::queries::{ddl, metadata};

/// Open a file-based database pool for production use
/// Creates the file if missing, enables WAL mode and foreign keys
pub async fn open_database(db_path: &Path) -> Result<SqlitePool, DynError> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    info!("SQLite database: {}", db_path.display());
    Ok(pool)
}

/// Initialize database schema
/// Creates tables and indexes; safe to run on every startup
pub async fn init_database_schema(pool: &SqlitePool) -> Result<(), DynError> {
    for sql in ddl::all_statements() {
        sqlx::query(&sql).execute(pool).await?;
    }
    Ok(())
}

/// Record the schema version on a fresh database, reject a mismatching one
pub async fn ensure_database_version(pool: &SqlitePool) -> Result<(), DynError> {
    let existing: Option<String> = sqlx::query_scalar(&metadata::select_by_key("version"))
        .fetch_optional(pool)
        .await?;

    match existing {
        None => {
            sqlx::query(&metadata::insert("version", EXPECTED_DB_VERSION))
                .execute(pool)
                .await?;
            Ok(())
        }
        Some(version) if version == EXPECTED_DB_VERSION => Ok(()),
        Some(version) => Err(format!(
            "Unsupported database version: '{}'. This application only supports version '{}'",
            version, EXPECTED_DB_VERSION
        )
        .into()),
    }
}

/// Open, migrate and version-check a database in one step
pub async fn prepare_database(db_path: &Path) -> Result<SqlitePool, DynError> {
    let pool = open_database(db_path).await?;
    init_database_schema(&pool).await?;
    ensure_database_version(&pool).await?;
    Ok(pool)
}

/// Create a database in a temporary directory for testing
/// Keep the returned guard alive for as long as the pool is used
pub async fn create_test_connection_in_temporary_file(
) -> Result<(SqlitePool, tempfile::TempDir), DynError> {
    let guard = tempfile::tempdir()?;
    let db_path = guard.path().join("test.sqlite");
    let pool = prepare_database(&db_path).await?;
    Ok((pool, guard))
}
