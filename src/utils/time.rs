//! Time utilities: scan timestamps, elapsed minutes, formatting.

use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDateTime, Timelike};

/// Storage format for anchors and scan instants.
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local wall-clock instant, truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    let n = Local::now().naive_local();
    n.with_nanosecond(0).unwrap_or(n)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FMT).to_string()
}

/// Parse `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD HH:MM`.
pub fn parse_timestamp(s: &str) -> AppResult<NaiveDateTime> {
    let s = s.trim();
    for fmt in [TIMESTAMP_FMT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    Err(AppError::InvalidTime(s.to_string()))
}

/// Whole minutes from `start` to `end`, truncated toward zero.
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes()
}
