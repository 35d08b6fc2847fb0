use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::list_sessions;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use crate::utils::date;
use crate::utils::table::Table;
use crate::utils::time::format_timestamp;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sessions { date: date_arg } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        let day = match date_arg {
            Some(d) => date::parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
            None => date::today(),
        };

        let sessions = list_sessions(&pool.conn, &day)?;
        if sessions.is_empty() {
            warning(format!("No sessions for {}.", day));
            return Ok(());
        }

        let mut table = Table::new(["ID", "Device", "Project", "Anchor"]);
        for s in sessions {
            table.add_row(vec![
                s.id.to_string(),
                s.device_id,
                s.project_id.to_string(),
                format_timestamp(&s.anchor),
            ]);
        }
        print!("{}", table.render(cfg.separator()));
    }
    Ok(())
}
