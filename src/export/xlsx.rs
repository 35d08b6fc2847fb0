// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::{AttendanceSheet, notify_export_success};
use crate::ui::messages::info;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const TITLE_ROW: u32 = 0;
const HEADER_ROW: u32 = 2;

/// Export XLSX: title, bold header row, auto-sized columns.
pub(crate) fn export_xlsx(sheet: &AttendanceSheet, path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Asistencia").map_err(to_app_error)?;

    let bold = Format::new().set_bold();
    let centered = Format::new().set_align(FormatAlign::Center);

    worksheet
        .write_with_format(TITLE_ROW, 0, sheet.title().as_str(), &bold)
        .map_err(to_app_error)?;

    // ---------------------------
    // Header
    // ---------------------------
    let headers = sheet.headers();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(HEADER_ROW, col as u16, header.as_str(), &bold)
            .map_err(to_app_error)?;
    }
    worksheet.set_freeze_panes(HEADER_ROW + 1, 0).ok();

    let mut col_widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();

    // ---------------------------
    // Rows
    // ---------------------------
    for (i, values) in sheet.to_table().iter().enumerate() {
        let row = HEADER_ROW + 1 + i as u32;
        for (col, v) in values.iter().enumerate() {
            write_cell(worksheet, row, col as u16, v, &centered)?;
            if let Some(w) = col_widths.get_mut(col) {
                *w = (*w).max(v.width());
            }
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_app_error)?;
    }

    workbook.save(path).map_err(to_app_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

/// Day cells (`1` / `0`) are written as numbers, everything else as text.
fn write_cell(ws: &mut Worksheet, row: u32, col: u16, s: &str, centered: &Format) -> AppResult<()> {
    if s.is_empty() {
        return Ok(());
    }
    if col >= 4
        && let Ok(n) = s.parse::<f64>()
    {
        ws.write_with_format(row, col, n, centered)
            .map_err(to_app_error)?;
        return Ok(());
    }
    ws.write(row, col, s).map_err(to_app_error)?;
    Ok(())
}

fn to_app_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
