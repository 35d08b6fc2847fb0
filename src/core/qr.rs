//! QR payload contract. A worker's QR encodes only the worker id; the
//! scanning station supplies its own device id.

use crate::errors::{AppError, AppResult};

const QR_PATH: &str = "/api/registrar-qr/";

/// Payload printed on a worker's credential.
pub fn encode(base_url: &str, worker_id: i64) -> String {
    format!("{}{}{}/", base_url.trim_end_matches('/'), QR_PATH, worker_id)
}

/// Extract the worker id from a scanned payload.
///
/// Accepted forms:
/// - `http://host/api/registrar-qr/<id>/`
/// - `<id>-<first name> <last name>` (printed credentials)
/// - `<id>`
pub fn decode(payload: &str) -> AppResult<i64> {
    let p = payload.trim();
    let invalid = || AppError::InvalidQrPayload(p.to_string());

    let candidate = if let Some((_, rest)) = p.split_once(QR_PATH) {
        rest.split('/').next().unwrap_or("")
    } else if let Some((id, _name)) = p.split_once('-') {
        id
    } else {
        p
    };

    if candidate.is_empty() || !candidate.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    candidate.parse::<i64>().map_err(|_| invalid())
}
