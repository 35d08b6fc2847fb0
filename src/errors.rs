//! Unified application error type.
//! All modules (db, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.

use rusqlite::ErrorCode;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid lateness category: {0}")]
    InvalidCategory(String),

    #[error("Invalid QR payload: {0}")]
    InvalidQrPayload(String),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Check-in outcomes
    // ---------------------------
    #[error("A device id is required to register a scan")]
    DeviceIdRequired,

    #[error("A worker id or QR payload is required to register a scan")]
    WorkerIdRequired,

    #[error("Device '{0}' is not registered")]
    DeviceNotFound(String),

    #[error("Device '{device_id}' is not authorized for project {project_id}")]
    DeviceNotAuthorized { device_id: String, project_id: i64 },

    #[error("Worker {0} is not assigned to any project")]
    NoProjectAssigned(i64),

    #[error("Check-in window exceeded: {elapsed_minutes} minutes since the session anchor")]
    TimeExceeded { elapsed_minutes: i64 },

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Worker {0} not found")]
    WorkerNotFound(i64),

    #[error("Project {0} not found")]
    ProjectNotFound(i64),

    #[error("Device '{0}' already exists")]
    DeviceExists(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Store and filesystem failures a caller may retry: a locked or busy
    /// database, or one that cannot be opened or written right now. Schema
    /// and constraint failures are final.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Io(_) => true,
            AppError::Db(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::CannotOpen
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::DiskFull
            ),
            _ => false,
        }
    }

    /// Stable machine-readable code, used in JSON responses and log lines.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DeviceIdRequired => "device_id_required",
            AppError::WorkerIdRequired => "worker_id_required",
            AppError::DeviceNotFound(_) | AppError::DeviceNotAuthorized { .. } => {
                "device_not_authorized"
            }
            AppError::NoProjectAssigned(_) => "no_project_assigned",
            AppError::TimeExceeded { .. } => "time_exceeded",
            AppError::WorkerNotFound(_) => "worker_not_found",
            AppError::ProjectNotFound(_) => "project_not_found",
            AppError::InvalidQrPayload(_) => "invalid_qr_payload",
            e if e.is_transient() => "store_unavailable",
            _ => "internal_error",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
