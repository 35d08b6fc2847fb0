//! Manual attendance registration: supervisor-entered presence lists,
//! recorded without a lateness category.

use crate::core::recorder::record_attendance_tracked;
use crate::db::log::ttlog_quiet;
use crate::db::queries::{list_workers, load_worker, require_project};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceSource;
use crate::utils::date::parse_date;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// JSON batch as sent by the field app.
#[derive(Debug, Clone, Deserialize)]
pub struct ManualBatch {
    pub project: i64,
    pub date: String,
    #[serde(default, rename = "asistencias")]
    pub entries: Vec<ManualEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManualEntry {
    #[serde(rename = "trabajador")]
    pub worker_id: i64,
    #[serde(default, rename = "presente")]
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ManualResult {
    Saved {
        #[serde(rename = "trabajador")]
        worker_id: i64,
        created: bool,
        #[serde(rename = "presente")]
        present: bool,
    },
    Failed {
        #[serde(rename = "trabajador")]
        worker_id: i64,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ManualReport {
    pub status: &'static str,
    pub results: Vec<ManualResult>,
}

/// Totals of a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormSummary {
    pub present: usize,
    pub absent: usize,
}

pub struct ManualLogic;

impl ManualLogic {
    /// Register each entry; unknown workers are reported per entry and do not
    /// stop the rest.
    pub fn register(
        conn: &Connection,
        project_id: i64,
        day: &NaiveDate,
        entries: &[ManualEntry],
    ) -> AppResult<ManualReport> {
        require_project(conn, project_id)?;

        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            if load_worker(conn, entry.worker_id)?.is_none() {
                results.push(ManualResult::Failed {
                    worker_id: entry.worker_id,
                    error: "Worker not found.".to_string(),
                });
                continue;
            }

            let (_, created) = record_attendance_tracked(
                conn,
                entry.worker_id,
                project_id,
                day,
                entry.present,
                None,
                AttendanceSource::Manual,
            )?;

            results.push(ManualResult::Saved {
                worker_id: entry.worker_id,
                created,
                present: entry.present,
            });
        }

        ttlog_quiet(
            conn,
            "manual",
            &format!("project:{}", project_id),
            &format!("{} entries registered for {}", results.len(), day),
        );

        Ok(ManualReport {
            status: "success",
            results,
        })
    }

    pub fn register_batch(conn: &Connection, batch: &ManualBatch) -> AppResult<ManualReport> {
        let day = parse_date(&batch.date).ok_or_else(|| AppError::InvalidDate(batch.date.clone()))?;
        Self::register(conn, batch.project, &day, &batch.entries)
    }

    /// Mark every worker of the project: listed ids present, everyone else absent.
    pub fn register_form(
        conn: &Connection,
        project_id: i64,
        day: &NaiveDate,
        present_ids: &[i64],
    ) -> AppResult<FormSummary> {
        require_project(conn, project_id)?;

        let mut summary = FormSummary::default();
        for worker in list_workers(conn, Some(project_id))? {
            let present = present_ids.contains(&worker.id);
            record_attendance_tracked(
                conn,
                worker.id,
                project_id,
                day,
                present,
                None,
                AttendanceSource::Manual,
            )?;
            if present {
                summary.present += 1;
            } else {
                summary.absent += 1;
            }
        }

        ttlog_quiet(
            conn,
            "manual",
            &format!("project:{}", project_id),
            &format!(
                "form for {}: {} present, {} absent",
                day, summary.present, summary.absent
            ),
        );

        Ok(summary)
    }
}
