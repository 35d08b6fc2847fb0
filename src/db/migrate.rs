use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// A named, run-once schema step. Applied steps are recorded in the `log`
/// table under the `migration_applied` operation.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_core_schema",
        description: "Created projects, workers, devices and attendance tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS projects (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            description TEXT
        );

        CREATE TABLE IF NOT EXISTS workers (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name       TEXT NOT NULL,
            last_name        TEXT NOT NULL,
            second_last_name TEXT NOT NULL DEFAULT '',
            category         TEXT NOT NULL DEFAULT '',
            phone            TEXT NOT NULL DEFAULT '',
            curp             TEXT,
            nss              TEXT,
            created_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS worker_projects (
            worker_id  INTEGER NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            position   INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (worker_id, project_id)
        );

        CREATE TABLE IF NOT EXISTS devices (
            id   TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS device_projects (
            device_id  TEXT NOT NULL REFERENCES devices(id) ON DELETE CASCADE,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            PRIMARY KEY (device_id, project_id)
        );

        CREATE TABLE IF NOT EXISTS attendance (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id  INTEGER NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            day        TEXT NOT NULL,
            present    INTEGER NOT NULL DEFAULT 0,
            UNIQUE (worker_id, project_id, day)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_project_day ON attendance(project_id, day);
        "#,
    },
    Migration {
        version: "20250412_0002_qr_sessions",
        description: "Added daily sessions and lateness category for QR check-in",
        sql: r#"
        CREATE TABLE IF NOT EXISTS daily_sessions (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            device_id  TEXT NOT NULL REFERENCES devices(id) ON DELETE CASCADE,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            day        TEXT NOT NULL,
            anchor     TEXT NOT NULL,
            UNIQUE (device_id, project_id, day)
        );

        ALTER TABLE attendance ADD COLUMN category TEXT
            CHECK (category IS NULL OR category IN ('puntual','retardo_leve','retardo_alto'));
        ALTER TABLE attendance ADD COLUMN source TEXT NOT NULL DEFAULT 'manual'
            CHECK (source IN ('qr','manual'));
        ALTER TABLE attendance ADD COLUMN updated_at TEXT NOT NULL DEFAULT '';
        "#,
    },
];

/// Ensure that the `log` table exists; it also tracks applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    // Schema change and its bookkeeping row commit together.
    conn.execute_batch("BEGIN IMMEDIATE;")?;

    // Another handler may have applied it while we waited for the lock.
    let outcome = is_applied(conn, m.version).and_then(|done| {
        if done {
            return Ok(false);
        }
        conn.execute_batch(m.sql)?;
        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )?;
        Ok(true)
    });

    match outcome {
        Ok(applied) => {
            conn.execute_batch("COMMIT;")?;
            if applied {
                success(format!("Migration applied: {} → {}", m.version, m.description));
            }
            Ok(())
        }
        Err(e) => {
            conn.execute_batch("ROLLBACK;").ok();
            Err(e)
        }
    }
}

/// Number of migrations not yet applied to this database.
pub fn pending_count(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;
    let mut n = 0;
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            n += 1;
        }
    }
    Ok(n)
}

/// Public entry point: run all pending migrations in order.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            apply(conn, m)?;
        }
    }

    Ok(())
}
