//! The check-in boundary: request validation and the status/body contract
//! handed to whatever transport sits in front (CLI, HTTP).

use crate::core::authorize::ProjectResolutionPolicy;
use crate::core::checkin::{CheckInLogic, CheckInOutcome, ScanEvent};
use crate::errors::{AppError, AppResult};
use crate::models::lateness::LatenessCategory;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;

/// Raw check-in request as received from a scanning station.
#[derive(Debug, Clone)]
pub struct CheckInRequest {
    pub worker_id: i64,
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CheckInBody {
    Recorded {
        outcome: &'static str,
        category: LatenessCategory,
        #[serde(rename = "workerId")]
        worker_id: i64,
    },
    Error {
        error: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInResponse {
    pub status: u16,
    pub body: CheckInBody,
}

impl CheckInResponse {
    pub fn from_result(result: &AppResult<CheckInOutcome>) -> Self {
        match result {
            Ok(out) => Self {
                status: 200,
                body: CheckInBody::Recorded {
                    outcome: "recorded",
                    category: out.category,
                    worker_id: out.worker_id,
                },
            },
            Err(e) => Self {
                status: status_for(e),
                body: CheckInBody::Error { error: e.code() },
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn to_json(&self, pretty: bool) -> AppResult<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(&self.body)?
        } else {
            serde_json::to_string(&self.body)?
        })
    }
}

fn status_for(e: &AppError) -> u16 {
    match e {
        AppError::DeviceNotFound(_) | AppError::DeviceNotAuthorized { .. } => 403,
        AppError::WorkerNotFound(_) | AppError::ProjectNotFound(_) => 404,
        AppError::DeviceIdRequired
        | AppError::WorkerIdRequired
        | AppError::NoProjectAssigned(_)
        | AppError::TimeExceeded { .. }
        | AppError::InvalidQrPayload(_) => 400,
        e if e.is_transient() => 503,
        _ => 500,
    }
}

/// Validate the request and run the scan at `at`.
pub fn check_in(
    conn: &Connection,
    request: &CheckInRequest,
    policy: &dyn ProjectResolutionPolicy,
    at: NaiveDateTime,
) -> AppResult<CheckInOutcome> {
    match request.device_id.as_deref().map(str::trim) {
        Some(device_id) if !device_id.is_empty() => {
            let event = ScanEvent {
                worker_id: request.worker_id,
                device_id: device_id.to_string(),
                at,
            };
            CheckInLogic::scan(conn, &event, policy)
        }
        _ => Err(AppError::DeviceIdRequired),
    }
}
