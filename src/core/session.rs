//! Session resolver: the per-(device, project, day) anchor.

use crate::db::queries::{insert_session_if_absent, load_session};
use crate::errors::{AppError, AppResult};
use crate::models::session::DailySession;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, ErrorCode};

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::ConstraintViolation)
}

/// Return the day's session for (device, project), creating it with
/// `anchor = now` when absent. The flag is `true` only for the caller whose
/// insert won; every caller observes the same stored anchor.
///
/// Safe across processes: creation relies on the table's unique key, never
/// on a read-then-write.
pub fn resolve_session(
    conn: &Connection,
    device_id: &str,
    project_id: i64,
    day: &NaiveDate,
    now: &NaiveDateTime,
) -> AppResult<(DailySession, bool)> {
    let created = match insert_session_if_absent(conn, device_id, project_id, day, now) {
        Ok(created) => created,
        // A competing insert won: read its row.
        Err(e) if is_unique_violation(&e) => false,
        Err(e) => return Err(e.into()),
    };

    let session = load_session(conn, device_id, project_id, day)?.ok_or_else(|| {
        AppError::Other(format!(
            "daily session for device '{}', project {}, {} missing after insert",
            device_id, project_id, day
        ))
    })?;

    Ok((session, created))
}
