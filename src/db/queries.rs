use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, AttendanceSource};
use crate::models::device::Device;
use crate::models::lateness::LatenessCategory;
use crate::models::project::Project;
use crate::models::session::DailySession;
use crate::models::worker::{NewWorker, Worker};
use crate::utils::date::{DATE_FMT, format_date};
use crate::utils::time::{TIMESTAMP_FMT, format_timestamp};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Result, Row, params};

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

fn get_date(row: &Row, col: &str) -> Result<NaiveDate> {
    let raw: String = row.get(col)?;
    NaiveDate::parse_from_str(&raw, DATE_FMT).map_err(|_| conversion_error(0, AppError::InvalidDate(raw)))
}

fn get_timestamp(row: &Row, col: &str) -> Result<NaiveDateTime> {
    let raw: String = row.get(col)?;
    NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FMT)
        .map_err(|_| conversion_error(0, AppError::InvalidTime(raw)))
}

fn collect<T>(rows: impl Iterator<Item = Result<T>>) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ------------------------------------------------
// Projects
// ------------------------------------------------

fn map_project(row: &Row) -> Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}

pub fn insert_project(conn: &Connection, name: &str, description: Option<&str>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO projects (name, description) VALUES (?1, ?2)",
        params![name, description],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_project(conn: &Connection, id: i64) -> AppResult<Option<Project>> {
    Ok(conn
        .query_row(
            "SELECT id, name, description FROM projects WHERE id = ?1",
            [id],
            map_project,
        )
        .optional()?)
}

pub fn require_project(conn: &Connection, id: i64) -> AppResult<Project> {
    load_project(conn, id)?.ok_or(AppError::ProjectNotFound(id))
}

pub fn list_projects(conn: &Connection) -> AppResult<Vec<Project>> {
    let mut stmt = conn.prepare("SELECT id, name, description FROM projects ORDER BY name ASC")?;
    let rows = stmt.query_map([], map_project)?;
    Ok(collect(rows)?)
}

// ------------------------------------------------
// Workers
// ------------------------------------------------

const WORKER_COLUMNS: &str =
    "w.id, w.first_name, w.last_name, w.second_last_name, w.category, w.phone, w.curp, w.nss, w.created_at";

fn map_worker(row: &Row) -> Result<Worker> {
    Ok(Worker {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        second_last_name: row.get("second_last_name")?,
        category: row.get("category")?,
        phone: row.get("phone")?,
        curp: row.get("curp")?,
        nss: row.get("nss")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_worker(conn: &Connection, w: &NewWorker) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO workers (first_name, last_name, second_last_name, category, phone, curp, nss, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            w.first_name,
            w.last_name,
            w.second_last_name,
            w.category,
            w.phone,
            w.curp,
            w.nss,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_worker(conn: &Connection, id: i64) -> AppResult<Option<Worker>> {
    let sql = format!("SELECT {WORKER_COLUMNS} FROM workers w WHERE w.id = ?1");
    Ok(conn.query_row(&sql, [id], map_worker).optional()?)
}

pub fn require_worker(conn: &Connection, id: i64) -> AppResult<Worker> {
    load_worker(conn, id)?.ok_or(AppError::WorkerNotFound(id))
}

/// Workers ordered by surnames; restricted to one project when given.
pub fn list_workers(conn: &Connection, project_id: Option<i64>) -> AppResult<Vec<Worker>> {
    let sql = format!(
        "SELECT {WORKER_COLUMNS} FROM workers w
         WHERE ?1 IS NULL
            OR EXISTS (SELECT 1 FROM worker_projects wp
                       WHERE wp.worker_id = w.id AND wp.project_id = ?1)
         ORDER BY w.last_name ASC, w.second_last_name ASC, w.id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![project_id], map_worker)?;
    Ok(collect(rows)?)
}

/// Associate a worker with a project. New associations go to the end of the
/// worker's project order; existing ones keep their position.
pub fn assign_worker_project(conn: &Connection, worker_id: i64, project_id: i64) -> AppResult<bool> {
    let inserted = conn.execute(
        "INSERT INTO worker_projects (worker_id, project_id, position)
         VALUES (?1, ?2, (SELECT IFNULL(MAX(position), -1) + 1
                          FROM worker_projects WHERE worker_id = ?1))
         ON CONFLICT(worker_id, project_id) DO NOTHING",
        params![worker_id, project_id],
    )?;
    Ok(inserted == 1)
}

pub fn unassign_worker_project(conn: &Connection, worker_id: i64, project_id: i64) -> AppResult<bool> {
    let deleted = conn.execute(
        "DELETE FROM worker_projects WHERE worker_id = ?1 AND project_id = ?2",
        params![worker_id, project_id],
    )?;
    Ok(deleted == 1)
}

/// The worker's projects in association order (first association first).
pub fn worker_project_ids(conn: &Connection, worker_id: i64) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare_cached(
        "SELECT project_id FROM worker_projects
         WHERE worker_id = ?1
         ORDER BY position ASC, project_id ASC",
    )?;
    let rows = stmt.query_map([worker_id], |row| row.get(0))?;
    Ok(collect(rows)?)
}

// ------------------------------------------------
// Devices
// ------------------------------------------------

pub fn insert_device(conn: &Connection, id: &str, name: &str) -> AppResult<()> {
    match conn.execute(
        "INSERT INTO devices (id, name) VALUES (?1, ?2)",
        params![id, name],
    ) {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(AppError::DeviceExists(id.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn device_project_ids(conn: &Connection, device_id: &str) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare_cached(
        "SELECT project_id FROM device_projects WHERE device_id = ?1 ORDER BY project_id ASC",
    )?;
    let rows = stmt.query_map([device_id], |row| row.get(0))?;
    collect(rows)
}

pub fn load_device(conn: &Connection, id: &str) -> AppResult<Option<Device>> {
    let found: Option<(String, String)> = conn
        .query_row(
            "SELECT id, name FROM devices WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match found {
        Some((id, name)) => {
            let project_ids = device_project_ids(conn, &id)?;
            Ok(Some(Device {
                id,
                name,
                project_ids,
            }))
        }
        None => Ok(None),
    }
}

pub fn list_devices(conn: &Connection) -> AppResult<Vec<Device>> {
    let mut stmt = conn.prepare("SELECT id, name FROM devices ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

    let mut out = Vec::new();
    for r in rows {
        let (id, name) = r?;
        let project_ids = device_project_ids(conn, &id)?;
        out.push(Device {
            id,
            name,
            project_ids,
        });
    }
    Ok(out)
}

pub fn authorize_device_project(conn: &Connection, device_id: &str, project_id: i64) -> AppResult<bool> {
    let inserted = conn.execute(
        "INSERT INTO device_projects (device_id, project_id) VALUES (?1, ?2)
         ON CONFLICT(device_id, project_id) DO NOTHING",
        params![device_id, project_id],
    )?;
    Ok(inserted == 1)
}

pub fn revoke_device_project(conn: &Connection, device_id: &str, project_id: i64) -> AppResult<bool> {
    let deleted = conn.execute(
        "DELETE FROM device_projects WHERE device_id = ?1 AND project_id = ?2",
        params![device_id, project_id],
    )?;
    Ok(deleted == 1)
}

// ------------------------------------------------
// Daily sessions
// ------------------------------------------------

fn map_session(row: &Row) -> Result<DailySession> {
    Ok(DailySession {
        id: row.get("id")?,
        device_id: row.get("device_id")?,
        project_id: row.get("project_id")?,
        day: get_date(row, "day")?,
        anchor: get_timestamp(row, "anchor")?,
    })
}

/// Conditional insert guarded by UNIQUE(device_id, project_id, day).
/// Returns `true` only for the caller whose insert created the row.
pub fn insert_session_if_absent(
    conn: &Connection,
    device_id: &str,
    project_id: i64,
    day: &NaiveDate,
    anchor: &NaiveDateTime,
) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO daily_sessions (device_id, project_id, day, anchor)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(device_id, project_id, day) DO NOTHING",
        params![device_id, project_id, format_date(day), format_timestamp(anchor)],
    )?;
    Ok(inserted == 1)
}

pub fn load_session(
    conn: &Connection,
    device_id: &str,
    project_id: i64,
    day: &NaiveDate,
) -> Result<Option<DailySession>> {
    conn.query_row(
        "SELECT id, device_id, project_id, day, anchor FROM daily_sessions
         WHERE device_id = ?1 AND project_id = ?2 AND day = ?3",
        params![device_id, project_id, format_date(day)],
        map_session,
    )
    .optional()
}

pub fn list_sessions(conn: &Connection, day: &NaiveDate) -> AppResult<Vec<DailySession>> {
    let mut stmt = conn.prepare(
        "SELECT id, device_id, project_id, day, anchor FROM daily_sessions
         WHERE day = ?1
         ORDER BY anchor ASC, id ASC",
    )?;
    let rows = stmt.query_map([format_date(day)], map_session)?;
    Ok(collect(rows)?)
}

// ------------------------------------------------
// Attendance
// ------------------------------------------------

const ATTENDANCE_COLUMNS: &str =
    "id, worker_id, project_id, day, present, category, source, updated_at";

fn map_attendance(row: &Row) -> Result<AttendanceRecord> {
    let category: Option<String> = row.get("category")?;
    let category = match category {
        Some(raw) => Some(
            LatenessCategory::from_db_str(&raw)
                .ok_or_else(|| conversion_error(0, AppError::InvalidCategory(raw)))?,
        ),
        None => None,
    };

    let source_raw: String = row.get("source")?;
    let source = AttendanceSource::from_db_str(&source_raw)
        .ok_or_else(|| conversion_error(0, AppError::Other(format!("Invalid source: {source_raw}"))))?;

    Ok(AttendanceRecord {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        project_id: row.get("project_id")?,
        day: get_date(row, "day")?,
        present: row.get::<_, i32>("present")? == 1,
        category,
        source,
        updated_at: row.get("updated_at")?,
    })
}

/// Upsert on UNIQUE(worker_id, project_id, day); last writer wins.
/// Returns `true` only for the caller whose insert created the row: the flag
/// comes from the insert's own change count, so racing writers cannot both
/// see it.
pub fn upsert_attendance(
    conn: &Connection,
    worker_id: i64,
    project_id: i64,
    day: &NaiveDate,
    present: bool,
    category: Option<LatenessCategory>,
    source: AttendanceSource,
) -> Result<bool> {
    let day = format_date(day);
    let present = if present { 1 } else { 0 };
    let category = category.map(|c| c.to_db_str());
    let updated_at = Local::now().to_rfc3339();

    let inserted = conn.execute(
        "INSERT INTO attendance (worker_id, project_id, day, present, category, source, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(worker_id, project_id, day) DO NOTHING",
        params![worker_id, project_id, day, present, category, source.to_db_str(), updated_at],
    )?;
    if inserted == 1 {
        return Ok(true);
    }

    conn.execute(
        "UPDATE attendance
         SET present = ?4, category = ?5, source = ?6, updated_at = ?7
         WHERE worker_id = ?1 AND project_id = ?2 AND day = ?3",
        params![worker_id, project_id, day, present, category, source.to_db_str(), updated_at],
    )?;
    Ok(false)
}

pub fn load_attendance(
    conn: &Connection,
    worker_id: i64,
    project_id: i64,
    day: &NaiveDate,
) -> Result<Option<AttendanceRecord>> {
    let sql = format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance
         WHERE worker_id = ?1 AND project_id = ?2 AND day = ?3"
    );
    conn.query_row(
        &sql,
        params![worker_id, project_id, format_date(day)],
        map_attendance,
    )
    .optional()
}

/// All records of a project in `[start, end]`, ordered by day then worker.
pub fn load_attendance_between(
    conn: &Connection,
    project_id: i64,
    start: &NaiveDate,
    end: &NaiveDate,
) -> AppResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance
         WHERE project_id = ?1 AND day BETWEEN ?2 AND ?3
         ORDER BY day ASC, worker_id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![project_id, format_date(start), format_date(end)],
        map_attendance,
    )?;
    Ok(collect(rows)?)
}
