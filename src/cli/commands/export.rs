use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::range::parse_range;
use crate::export::{ExportLogic, ExportRequest};
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        project,
        format,
        file,
        range,
        from,
        to,
        days,
        force,
    } = cmd
    {
        let (start, end) = match (range, from, to) {
            (Some(r), _, _) => parse_range(r)?,
            (None, Some(f), Some(t)) => (
                date::parse_date(f).ok_or_else(|| AppError::InvalidDate(f.clone()))?,
                date::parse_date(t).ok_or_else(|| AppError::InvalidDate(t.clone()))?,
            ),
            _ => {
                let today = date::today();
                (today, today)
            }
        };

        let weekdays = match days {
            Some(d) => date::parse_weekday_filter(d).map_err(AppError::InvalidDate)?,
            None => Vec::new(),
        };

        let mut pool = DbPool::new(&cfg.database)?;
        ExportLogic::export(
            &mut pool,
            &ExportRequest {
                project_id: *project,
                start,
                end,
                weekdays,
                format: *format,
                file: file.clone(),
                force: *force,
            },
        )?;
    }
    Ok(())
}
