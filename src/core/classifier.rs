//! Lateness classification against the session anchor.

use crate::models::lateness::LatenessCategory;
use crate::utils::time::minutes_between;
use chrono::NaiveDateTime;

/// Last elapsed minute still counted as on time.
pub const PUNCTUAL_MAX_MINUTES: i64 = 10;
/// Last elapsed minute counted as a minor delay.
pub const MINOR_DELAY_MAX_MINUTES: i64 = 40;
/// Last elapsed minute accepted at all; later scans are rejected.
pub const CUTOFF_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Category(LatenessCategory),
    Rejected { elapsed_minutes: i64 },
}

/// Whole minutes from anchor to scan. A scan before the anchor counts as 0.
pub fn elapsed_minutes(anchor: &NaiveDateTime, now: &NaiveDateTime) -> i64 {
    minutes_between(*anchor, *now).max(0)
}

pub fn classify_minutes(m: i64) -> Classification {
    match m {
        m if m <= PUNCTUAL_MAX_MINUTES => Classification::Category(LatenessCategory::Puntual),
        m if m <= MINOR_DELAY_MAX_MINUTES => Classification::Category(LatenessCategory::RetardoLeve),
        m if m <= CUTOFF_MINUTES => Classification::Category(LatenessCategory::RetardoAlto),
        m => Classification::Rejected { elapsed_minutes: m },
    }
}

pub fn classify(anchor: &NaiveDateTime, now: &NaiveDateTime) -> Classification {
    classify_minutes(elapsed_minutes(anchor, now))
}
