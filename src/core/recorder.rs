use crate::db::queries::{load_attendance, upsert_attendance};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, AttendanceSource};
use crate::models::lateness::LatenessCategory;
use chrono::NaiveDate;
use rusqlite::Connection;

/// Upsert the (worker, project, day) record and return what is stored.
/// Callers guarantee the worker and project exist.
pub fn record_attendance(
    conn: &Connection,
    worker_id: i64,
    project_id: i64,
    day: &NaiveDate,
    present: bool,
    category: Option<LatenessCategory>,
    source: AttendanceSource,
) -> AppResult<AttendanceRecord> {
    record_attendance_tracked(conn, worker_id, project_id, day, present, category, source)
        .map(|(record, _)| record)
}

/// Same as [`record_attendance`], also reporting whether the row was new.
pub fn record_attendance_tracked(
    conn: &Connection,
    worker_id: i64,
    project_id: i64,
    day: &NaiveDate,
    present: bool,
    category: Option<LatenessCategory>,
    source: AttendanceSource,
) -> AppResult<(AttendanceRecord, bool)> {
    let created = upsert_attendance(conn, worker_id, project_id, day, present, category, source)?;

    let record = load_attendance(conn, worker_id, project_id, day)?.ok_or_else(|| {
        AppError::Other(format!(
            "attendance for worker {} in project {} on {} missing after upsert",
            worker_id, project_id, day
        ))
    })?;

    Ok((record, created))
}
