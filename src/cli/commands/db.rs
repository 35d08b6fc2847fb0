use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::migrate::pending_count;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success};
use rusqlite::Connection;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        info: show_info,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        if *migrate {
            let pending = pending_count(&pool.conn)?;
            if pending == 0 {
                info("Schema is up to date.");
            } else {
                info(format!("Applying {} pending migration(s)…", pending));
                init_db(&pool.conn)?;
                success("Migrations completed.");
            }
        }

        if *show_info {
            stats::print_db_info(&mut pool, &cfg.database)?;
        }

        if *check && check_store(&pool.conn)? {
            success("Integrity and foreign-key checks passed.");
        }
    }

    Ok(())
}

/// Run SQLite's integrity check plus a foreign-key scan; failures are
/// reported on stderr. Returns `true` when both are clean.
fn check_store(conn: &Connection) -> AppResult<bool> {
    let integrity: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    let mut clean = integrity == "ok";
    if !clean {
        error(format!("Integrity check failed: {}", integrity));
    }

    // (table, rowid, parent table) per dangling reference
    let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
    let orphans = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<i64>>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;
    for orphan in orphans {
        let (table, rowid, parent) = orphan?;
        clean = false;
        error(format!(
            "Row {} of '{}' references a missing '{}' row",
            rowid.map(|r| r.to_string()).unwrap_or_else(|| "?".into()),
            table,
            parent
        ));
    }

    Ok(clean)
}
