use super::lateness::LatenessCategory;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceSource {
    Qr,
    Manual,
}

impl AttendanceSource {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceSource::Qr => "qr",
            AttendanceSource::Manual => "manual",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "qr" => Some(AttendanceSource::Qr),
            "manual" => Some(AttendanceSource::Manual),
            _ => None,
        }
    }
}

/// One row per (worker, project, day). Later writes overwrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub worker_id: i64,
    pub project_id: i64,
    pub day: NaiveDate,
    pub present: bool,
    pub category: Option<LatenessCategory>,
    pub source: AttendanceSource,
    pub updated_at: String,
}
