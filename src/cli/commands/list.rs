use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::{list_workers, load_attendance, require_project};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, warning};
use crate::utils::date;
use crate::utils::table::Table;

/// Attendance of every worker of a project for one day.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        project,
        date: date_arg,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;
        let conn = &pool.conn;

        let day = match date_arg {
            Some(d) => date::parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
            None => date::today(),
        };

        let p = require_project(conn, *project)?;
        let workers = list_workers(conn, Some(p.id))?;
        if workers.is_empty() {
            warning(format!("Project '{}' has no workers.", p.name));
            return Ok(());
        }

        header(format!("{} - {} {}", p.name, date::weekday_abbr(&day), day));

        let mut table = Table::new(["ID", "Name", "Category", "Attendance", "Lateness", "Source"]);
        for w in workers {
            let rec = load_attendance(conn, w.id, p.id, &day)?;
            let (presence, lateness, source) = match rec {
                Some(r) => (
                    if r.present { "present" } else { "absent" },
                    r.category.map(|c| c.to_db_str()).unwrap_or("-"),
                    r.source.to_db_str(),
                ),
                None => ("--", "-", "-"),
            };
            table.add_row(vec![
                w.id.to_string(),
                w.full_name(),
                w.category.clone(),
                presence.to_string(),
                lateness.to_string(),
                source.to_string(),
            ]);
        }
        print!("{}", table.render(cfg.separator()));
    }
    Ok(())
}
