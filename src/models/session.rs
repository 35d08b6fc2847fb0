use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Per-(device, project, day) anchor. The anchor is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySession {
    pub id: i64,
    pub device_id: String,
    pub project_id: i64,
    pub day: NaiveDate,      // ⇔ daily_sessions.day (TEXT "YYYY-MM-DD")
    pub anchor: NaiveDateTime, // ⇔ daily_sessions.anchor (TEXT "YYYY-MM-DD HH:MM:SS")
}
