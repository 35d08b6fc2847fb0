// src/export/logic.rs

use crate::db::pool::DbPool;
use crate::db::queries::{list_workers, load_attendance_between, require_project};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{AttendanceSheet, SheetCell, SheetRow};
use crate::export::xlsx::export_xlsx;
use crate::models::attendance::AttendanceRecord;
use crate::utils::date::{days_between, format_date, weekday_index};
use crate::utils::path::resolve_output;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Parameters of an attendance sheet export.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub project_id: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Weekdays to keep (Monday = 0); empty keeps every day.
    pub weekdays: Vec<u32>,
    pub format: ExportFormat,
    /// Output path; defaults to `asistencia_{project}_{start}_to_{end}.{ext}`
    /// in the current directory.
    pub file: Option<String>,
    pub force: bool,
}

pub struct ExportLogic;

impl ExportLogic {
    /// Build the sheet for a project: workers by surname, one cell per kept date.
    pub fn build_sheet(
        conn: &Connection,
        project_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        weekdays: &[u32],
    ) -> AppResult<AttendanceSheet> {
        if end < start {
            return Err(AppError::InvalidDate(format!(
                "end date {end} is before start date {start}"
            )));
        }

        let project = require_project(conn, project_id)?;

        let dates: Vec<NaiveDate> = days_between(start, end)
            .into_iter()
            .filter(|d| weekdays.is_empty() || weekdays.contains(&weekday_index(d)))
            .collect();

        let records: HashMap<(i64, NaiveDate), AttendanceRecord> =
            load_attendance_between(conn, project_id, &start, &end)?
                .into_iter()
                .map(|r| ((r.worker_id, r.day), r))
                .collect();

        let workers = list_workers(conn, Some(project_id))?
            .into_iter()
            .map(|w| {
                let days = dates
                    .iter()
                    .map(|d| {
                        let rec = records.get(&(w.id, *d));
                        SheetCell {
                            date: format_date(d),
                            present: rec.map(|r| r.present),
                            category: rec.and_then(|r| r.category),
                        }
                    })
                    .collect();

                SheetRow {
                    worker_id: w.id,
                    full_name: w.full_name(),
                    category: w.category.clone(),
                    curp: w.curp.clone().unwrap_or_default(),
                    nss: w.nss.clone().unwrap_or_default(),
                    days,
                }
            })
            .collect();

        Ok(AttendanceSheet {
            project,
            from: format_date(&start),
            to: format_date(&end),
            dates,
            workers,
        })
    }

    /// Build and write the sheet; returns the path written.
    pub fn export(pool: &mut DbPool, req: &ExportRequest) -> AppResult<PathBuf> {
        let sheet = Self::build_sheet(&pool.conn, req.project_id, req.start, req.end, &req.weekdays)?;

        let path = resolve_output(
            req.file.as_deref(),
            &std::env::current_dir()?,
            &sheet.default_file_name(req.format.as_str()),
        )?;

        ensure_writable(&path, req.force)?;
        write_sheet(&sheet, req.format, &path)?;

        Ok(path)
    }
}

fn write_sheet(sheet: &AttendanceSheet, format: ExportFormat, path: &Path) -> AppResult<()> {
    match format {
        ExportFormat::Csv => export_csv(sheet, path),
        ExportFormat::Json => export_json(sheet, path),
        ExportFormat::Xlsx => export_xlsx(sheet, path),
    }
}
