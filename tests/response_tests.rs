mod common;
use common::{seed_site, setup_test_db, ts};

use rasistencia::core::authorize::FirstAssociation;
use rasistencia::core::response::{CheckInBody, CheckInRequest, CheckInResponse, check_in};
use rasistencia::db::pool::open_connection;
use rasistencia::errors::{AppError, AppResult};
use std::path::Path;
use rasistencia::core::checkin::CheckInOutcome;

fn respond(result: AppResult<CheckInOutcome>) -> (u16, String) {
    let response = CheckInResponse::from_result(&result);
    (response.status, response.to_json(false).unwrap())
}

#[test]
fn test_recorded_body() {
    let site = seed_site("response_recorded");
    let request = CheckInRequest {
        worker_id: site.worker,
        device_id: Some("D1".into()),
    };

    let result = check_in(&site.conn, &request, &FirstAssociation, ts("2025-06-02 09:00:00"));
    let response = CheckInResponse::from_result(&result);

    assert!(response.is_success());
    assert_eq!(response.status, 200);
    assert_eq!(
        response.to_json(false).unwrap(),
        format!(
            r#"{{"outcome":"recorded","category":"puntual","workerId":{}}}"#,
            site.worker
        )
    );
}

#[test]
fn test_missing_or_blank_device_id() {
    let site = seed_site("response_no_device");

    for device_id in [None, Some(String::new()), Some("   ".to_string())] {
        let request = CheckInRequest {
            worker_id: site.worker,
            device_id,
        };
        let result = check_in(&site.conn, &request, &FirstAssociation, ts("2025-06-02 09:00:00"));
        assert!(matches!(result, Err(AppError::DeviceIdRequired)));
        assert_eq!(respond(result), (400, r#"{"error":"device_id_required"}"#.to_string()));
    }
}

#[test]
fn test_rejections_map_to_status_codes() {
    let site = seed_site("response_rejections");
    let at = ts("2025-06-02 09:00:00");

    let req = |worker_id: i64, device: &str| CheckInRequest {
        worker_id,
        device_id: Some(device.to_string()),
    };

    let unknown_device = check_in(&site.conn, &req(site.worker, "XX"), &FirstAssociation, at);
    assert_eq!(
        respond(unknown_device),
        (403, r#"{"error":"device_not_authorized"}"#.to_string())
    );

    let foreign_device = check_in(&site.conn, &req(site.worker, "D2"), &FirstAssociation, at);
    assert_eq!(
        respond(foreign_device),
        (403, r#"{"error":"device_not_authorized"}"#.to_string())
    );

    let unknown_worker = check_in(&site.conn, &req(4242, "D1"), &FirstAssociation, at);
    assert_eq!(
        respond(unknown_worker),
        (404, r#"{"error":"worker_not_found"}"#.to_string())
    );

    check_in(&site.conn, &req(site.worker, "D1"), &FirstAssociation, at).unwrap();
    let late = check_in(
        &site.conn,
        &req(site.worker2, "D1"),
        &FirstAssociation,
        ts("2025-06-02 10:01:00"),
    );
    assert_eq!(respond(late), (400, r#"{"error":"time_exceeded"}"#.to_string()));
}

#[test]
fn test_store_failures_are_transient() {
    let busy = AppError::Db(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
        None,
    ));
    assert!(busy.is_transient());
    assert_eq!(respond(Err(busy)), (503, r#"{"error":"store_unavailable"}"#.to_string()));

    let err = AppError::Db(rusqlite::Error::QueryReturnedNoRows);
    assert!(!err.is_transient());
    assert_eq!(respond(Err(err)), (500, r#"{"error":"internal_error"}"#.to_string()));

    let err = AppError::Other("boom".into());
    assert!(!err.is_transient());
    assert_eq!(respond(Err(err)), (500, r#"{"error":"internal_error"}"#.to_string()));
}

#[test]
fn test_invalid_qr_payload_is_bad_request() {
    let (status, body) = respond(Err(AppError::InvalidQrPayload("garbage".into())));
    assert_eq!(status, 400);
    assert_eq!(body, r#"{"error":"invalid_qr_payload"}"#);
}

#[test]
fn test_pretty_body_keeps_fields() {
    let response = CheckInResponse {
        status: 200,
        body: CheckInBody::Error {
            error: "time_exceeded",
        },
    };
    let pretty = response.to_json(true).unwrap();
    assert!(pretty.contains('\n'));
    assert!(pretty.contains(r#""error": "time_exceeded""#));
}

#[test]
fn test_store_without_schema_is_not_retryable() {
    let path = setup_test_db("response_no_schema");
    let conn = open_connection(Path::new(&path)).unwrap();
    let request = CheckInRequest {
        worker_id: 1,
        device_id: Some("D1".into()),
    };

    let result = check_in(&conn, &request, &FirstAssociation, ts("2025-06-02 09:00:00"));
    assert!(matches!(&result, Err(e) if !e.is_transient()));
    assert_eq!(respond(result), (500, r#"{"error":"internal_error"}"#.to_string()));
}

#[test]
fn test_missing_worker_id_is_bad_request() {
    assert_eq!(
        respond(Err(AppError::WorkerIdRequired)),
        (400, r#"{"error":"worker_id_required"}"#.to_string())
    );
}
