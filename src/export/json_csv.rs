// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::{AttendanceSheet, notify_export_success};
use crate::ui::messages::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export JSON pretty-printed, lateness categories included.
pub(crate) fn export_json(sheet: &AttendanceSheet, path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(sheet)?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

/// Export CSV: header row, then one row per worker.
pub(crate) fn export_csv(sheet: &AttendanceSheet, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let csv_err = |e: csv::Error| AppError::Export(format!("CSV write error: {e}"));

    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;

    wtr.write_record(sheet.headers()).map_err(csv_err)?;
    for row in sheet.to_table() {
        wtr.write_record(&row).map_err(csv_err)?;
    }

    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
