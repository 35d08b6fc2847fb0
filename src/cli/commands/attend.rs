use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::manual::{ManualBatch, ManualEntry, ManualLogic, ManualResult};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, success, warning};
use crate::utils::date;
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Attend {
        project,
        date: date_arg,
        present,
        absent,
        form,
        json,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        //
        // 1. JSON batch (prints the report as JSON)
        //
        if let Some(file) = json {
            let content = fs::read_to_string(file)?;
            let batch: ManualBatch = serde_json::from_str(&content)?;
            let report = ManualLogic::register_batch(&pool.conn, &batch)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        let project_id = project.ok_or_else(|| AppError::Other("--project is required".into()))?;
        let day = match date_arg {
            Some(d) => date::parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
            None => date::today(),
        };

        //
        // 2. Form mode: everyone in the project gets a record
        //
        if *form {
            let summary = ManualLogic::register_form(&pool.conn, project_id, &day, present)?;
            success(format!(
                "Attendance registered for {}: {} present, {} absent.",
                day, summary.present, summary.absent
            ));
            return Ok(());
        }

        //
        // 3. Explicit lists
        //
        let entries: Vec<ManualEntry> = present
            .iter()
            .map(|id| ManualEntry {
                worker_id: *id,
                present: true,
            })
            .chain(absent.iter().map(|id| ManualEntry {
                worker_id: *id,
                present: false,
            }))
            .collect();

        if entries.is_empty() {
            warning("Nothing to register: use --present and/or --absent.");
            return Ok(());
        }

        let report = ManualLogic::register(&pool.conn, project_id, &day, &entries)?;
        for r in &report.results {
            match r {
                ManualResult::Saved {
                    worker_id,
                    created,
                    present,
                } => success(format!(
                    "Worker {}: {} ({})",
                    worker_id,
                    if *present { "present" } else { "absent" },
                    if *created { "registered" } else { "updated" }
                )),
                ManualResult::Failed { worker_id, error: e } => {
                    error(format!("Worker {}: {}", worker_id, e))
                }
            }
        }
    }
    Ok(())
}
