//! Check-in orchestrator: one scan event through authorization, session
//! resolution, classification and recording.

use crate::core::authorize::{ProjectResolutionPolicy, authorize};
use crate::core::classifier::{Classification, classify, elapsed_minutes};
use crate::core::recorder::record_attendance;
use crate::core::session::resolve_session;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceSource;
use crate::models::lateness::LatenessCategory;
use crate::utils::time::format_timestamp;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;

/// A single check-in attempt: who, at which station, when.
#[derive(Debug, Clone)]
pub struct ScanEvent {
    pub worker_id: i64,
    pub device_id: String,
    pub at: NaiveDateTime,
}

/// Where a scan stopped. `Recorded` and `Rejected` are terminal; an error
/// leaves the scan at the stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStage {
    Unauthorized,
    SessionPending,
    Classified,
    Rejected,
    Recorded,
}

impl CheckInStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInStage::Unauthorized => "unauthorized",
            CheckInStage::SessionPending => "session_pending",
            CheckInStage::Classified => "classified",
            CheckInStage::Rejected => "rejected",
            CheckInStage::Recorded => "recorded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInOutcome {
    pub worker_id: i64,
    pub project_id: i64,
    pub device_id: String,
    pub category: LatenessCategory,
    pub anchor: NaiveDateTime,
    pub elapsed_minutes: i64,
    pub session_created: bool,
}

pub struct CheckInLogic;

impl CheckInLogic {
    /// Run a scan event. Stages short-circuit on the first failure; a
    /// session created before a late rejection stays in place.
    pub fn scan(
        conn: &Connection,
        event: &ScanEvent,
        policy: &dyn ProjectResolutionPolicy,
    ) -> AppResult<CheckInOutcome> {
        let mut stage = CheckInStage::Unauthorized;
        let result = Self::run(conn, event, policy, &mut stage);

        let target = format!("worker:{}", event.worker_id);
        match &result {
            Ok(out) => ttlog_quiet(
                conn,
                "checkin",
                &target,
                &format!(
                    "device '{}' project {} at {}: {} ({} min since {}, policy {})",
                    out.device_id,
                    out.project_id,
                    format_timestamp(&event.at),
                    out.category.to_db_str(),
                    out.elapsed_minutes,
                    format_timestamp(&out.anchor),
                    policy.name(),
                ),
            ),
            Err(e) if !e.is_transient() => ttlog_quiet(
                conn,
                "checkin_rejected",
                &target,
                &format!(
                    "device '{}' at {} stopped at {}: {}",
                    event.device_id,
                    format_timestamp(&event.at),
                    stage.as_str(),
                    e
                ),
            ),
            // The store is failing; writing to it again would only fail too.
            Err(_) => {}
        }

        result
    }

    fn run(
        conn: &Connection,
        event: &ScanEvent,
        policy: &dyn ProjectResolutionPolicy,
        stage: &mut CheckInStage,
    ) -> AppResult<CheckInOutcome> {
        // 1️⃣ Authorize: no state touched on failure
        let auth = authorize(conn, &event.device_id, event.worker_id, policy)?;
        *stage = CheckInStage::SessionPending;

        // 2️⃣ Resolve the day's anchor (may create it)
        let day = event.at.date();
        let (session, created) =
            resolve_session(conn, &auth.device.id, auth.project.id, &day, &event.at)?;

        if created {
            ttlog_quiet(
                conn,
                "session_created",
                &format!("device:{}", auth.device.id),
                &format!(
                    "project {} on {} anchored at {}",
                    auth.project.id,
                    day,
                    format_timestamp(&session.anchor)
                ),
            );
        }

        // 3️⃣ Classify against the anchor
        let elapsed = elapsed_minutes(&session.anchor, &event.at);
        let category = match classify(&session.anchor, &event.at) {
            Classification::Category(c) => c,
            Classification::Rejected { elapsed_minutes } => {
                *stage = CheckInStage::Rejected;
                return Err(AppError::TimeExceeded { elapsed_minutes });
            }
        };
        *stage = CheckInStage::Classified;

        // 4️⃣ Record presence with the category
        record_attendance(
            conn,
            event.worker_id,
            auth.project.id,
            &day,
            true,
            Some(category),
            AttendanceSource::Qr,
        )?;
        *stage = CheckInStage::Recorded;

        Ok(CheckInOutcome {
            worker_id: event.worker_id,
            project_id: auth.project.id,
            device_id: auth.device.id,
            category,
            anchor: session.anchor,
            elapsed_minutes: elapsed,
            session_created: created,
        })
    }
}
