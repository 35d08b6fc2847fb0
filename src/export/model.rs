// src/export/model.rs

use crate::models::lateness::LatenessCategory;
use crate::models::project::Project;
use crate::utils::date::sheet_header;
use chrono::NaiveDate;
use serde::Serialize;

/// One worker/day cell of the sheet.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SheetCell {
    pub date: String,
    /// `None` when no record exists for that day.
    pub present: Option<bool>,
    pub category: Option<LatenessCategory>,
}

impl SheetCell {
    /// Flat sheet value: `1` present, `0` absent, empty without a record.
    pub fn value(&self) -> &'static str {
        match self.present {
            Some(true) => "1",
            Some(false) => "0",
            None => "",
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct SheetRow {
    pub worker_id: i64,
    pub full_name: String,
    pub category: String,
    pub curp: String,
    pub nss: String,
    pub days: Vec<SheetCell>,
}

/// Attendance of every worker of a project across a set of dates.
#[derive(Serialize, Clone, Debug)]
pub struct AttendanceSheet {
    pub project: Project,
    pub from: String,
    pub to: String,
    #[serde(skip)]
    pub dates: Vec<NaiveDate>,
    pub workers: Vec<SheetRow>,
}

const FIXED_HEADERS: [&str; 4] = ["Nombre Completo", "Categoría", "CURP", "NSS"];

impl AttendanceSheet {
    pub fn title(&self) -> String {
        format!("Reporte de Asistencia - Proyecto: {}", self.project.name)
    }

    /// Header row: fixed columns then one `"{weekday} dd/mm/yy"` per date.
    pub fn headers(&self) -> Vec<String> {
        FIXED_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(self.dates.iter().map(sheet_header))
            .collect()
    }

    pub fn to_table(&self) -> Vec<Vec<String>> {
        self.workers
            .iter()
            .map(|r| {
                [
                    r.full_name.clone(),
                    r.category.clone(),
                    r.curp.clone(),
                    r.nss.clone(),
                ]
                .into_iter()
                .chain(r.days.iter().map(|c| c.value().to_string()))
                .collect()
            })
            .collect()
    }

    pub fn default_file_name(&self, ext: &str) -> String {
        format!(
            "asistencia_{}_{}_to_{}.{}",
            self.project.id, self.from, self.to, ext
        )
    }
}
