use crate::db::migrate::pending_count;
use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::{Connection, OptionalExtension};
use std::fs;

/// Row counts of the attendance tables.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DbCounts {
    pub projects: i64,
    pub workers: i64,
    pub devices: i64,
    pub sessions: i64,
    pub attendance: i64,
}

pub fn counts(conn: &Connection) -> rusqlite::Result<DbCounts> {
    let count = |table: &str| -> rusqlite::Result<i64> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
    };

    Ok(DbCounts {
        projects: count("projects")?,
        workers: count("workers")?,
        devices: count("devices")?,
        sessions: count("daily_sessions")?,
        attendance: count("attendance")?,
    })
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    println!(
        "{}• Pending migrations:{} {}",
        CYAN,
        RESET,
        pending_count(&pool.conn)?
    );

    //
    // 2) TOTALS
    //
    let c = counts(&pool.conn)?;
    for (label, n) in [
        ("Projects", c.projects),
        ("Workers", c.workers),
        ("Devices", c.devices),
        ("Daily sessions", c.sessions),
        ("Attendance records", c.attendance),
    ] {
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, n, RESET);
    }

    //
    // 3) DATE RANGE
    //
    let range: Option<(Option<String>, Option<String>)> = pool
        .conn
        .query_row("SELECT MIN(day), MAX(day) FROM attendance", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()?;

    let (first, last) = range.unwrap_or((None, None));
    let dash = format!("{GREY}--{RESET}");

    println!("{}• Attendance range:{}", CYAN, RESET);
    println!("    from: {}", first.unwrap_or_else(|| dash.clone()));
    println!("    to:   {}", last.unwrap_or(dash));

    println!();
    Ok(())
}
