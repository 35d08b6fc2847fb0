use crate::db::migrate::run_pending_migrations;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

/// Tables every command relies on once migrations have run.
const REQUIRED_TABLES: &[&str] = &[
    "projects",
    "workers",
    "worker_projects",
    "devices",
    "device_projects",
    "daily_sessions",
    "attendance",
    "log",
];

/// Bring the schema up to date, then confirm the attendance tables exist.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;

    let mut stmt = conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
    for table in REQUIRED_TABLES {
        if !stmt.exists([table])? {
            return Err(AppError::Other(format!(
                "table '{table}' is missing after migrations"
            )));
        }
    }
    Ok(())
}
