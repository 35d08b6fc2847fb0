mod common;
use common::{new_worker, seed_site, ts};

use rasistencia::core::admin::AdminLogic;
use rasistencia::core::authorize::{DeviceIntersection, FirstAssociation, ProjectPolicyKind};
use rasistencia::core::checkin::{CheckInLogic, ScanEvent};
use rasistencia::db::log::load_log;
use rasistencia::db::queries::{list_sessions, load_attendance, load_session};
use rasistencia::errors::AppError;
use rasistencia::models::attendance::AttendanceSource;
use rasistencia::models::lateness::LatenessCategory;
use rusqlite::Connection;

fn scan(worker_id: i64, device: &str, at: &str) -> ScanEvent {
    ScanEvent {
        worker_id,
        device_id: device.to_string(),
        at: ts(at),
    }
}

fn attendance_rows(conn: &Connection, worker_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM attendance WHERE worker_id = ?1",
        [worker_id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn test_first_scan_anchors_session_and_is_punctual() {
    let site = seed_site("checkin_first_scan");

    let out = CheckInLogic::scan(
        &site.conn,
        &scan(site.worker, "D1", "2025-06-02 09:00:00"),
        &FirstAssociation,
    )
    .unwrap();

    assert_eq!(out.category, LatenessCategory::Puntual);
    assert_eq!(out.project_id, site.project);
    assert_eq!(out.anchor, ts("2025-06-02 09:00:00"));
    assert_eq!(out.elapsed_minutes, 0);
    assert!(out.session_created);

    let rec = load_attendance(&site.conn, site.worker, site.project, &out.anchor.date())
        .unwrap()
        .expect("attendance recorded");
    assert!(rec.present);
    assert_eq!(rec.category, Some(LatenessCategory::Puntual));
    assert_eq!(rec.source, AttendanceSource::Qr);
}

#[test]
fn test_second_scan_uses_existing_anchor() {
    let site = seed_site("checkin_second_scan");

    CheckInLogic::scan(
        &site.conn,
        &scan(site.worker, "D1", "2025-06-02 09:00:00"),
        &FirstAssociation,
    )
    .unwrap();

    let out = CheckInLogic::scan(
        &site.conn,
        &scan(site.worker2, "D1", "2025-06-02 09:25:00"),
        &FirstAssociation,
    )
    .unwrap();

    assert_eq!(out.category, LatenessCategory::RetardoLeve);
    assert_eq!(out.elapsed_minutes, 25);
    assert_eq!(out.anchor, ts("2025-06-02 09:00:00"));
    assert!(!out.session_created);
}

#[test]
fn test_late_scan_is_rejected_without_side_effects() {
    let site = seed_site("checkin_late_scan");
    let day = ts("2025-06-02 09:00:00").date();

    CheckInLogic::scan(
        &site.conn,
        &scan(site.worker, "D1", "2025-06-02 09:00:00"),
        &FirstAssociation,
    )
    .unwrap();

    let err = CheckInLogic::scan(
        &site.conn,
        &scan(site.worker2, "D1", "2025-06-02 10:05:00"),
        &FirstAssociation,
    )
    .unwrap_err();

    assert!(matches!(err, AppError::TimeExceeded { elapsed_minutes: 65 }));
    assert!(
        load_attendance(&site.conn, site.worker2, site.project, &day)
            .unwrap()
            .is_none()
    );

    let session = load_session(&site.conn, "D1", site.project, &day)
        .unwrap()
        .expect("session kept");
    assert_eq!(session.anchor, ts("2025-06-02 09:00:00"));
    assert_eq!(list_sessions(&site.conn, &day).unwrap().len(), 1);

    let rejected = load_log(&site.conn, Some("checkin_rejected")).unwrap();
    assert_eq!(rejected.len(), 1);
    assert!(rejected[0].message.contains("rejected"));
}

#[test]
fn test_device_outside_project_is_not_authorized() {
    let site = seed_site("checkin_foreign_device");

    let err = CheckInLogic::scan(
        &site.conn,
        &scan(site.worker, "D2", "2025-06-02 09:00:00"),
        &FirstAssociation,
    )
    .unwrap_err();

    match err {
        AppError::DeviceNotAuthorized {
            device_id,
            project_id,
        } => {
            assert_eq!(device_id, "D2");
            assert_eq!(project_id, site.project);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Authorization failures touch nothing.
    let day = ts("2025-06-02 09:00:00").date();
    assert!(list_sessions(&site.conn, &day).unwrap().is_empty());
    assert_eq!(attendance_rows(&site.conn, site.worker), 0);
}

#[test]
fn test_unknown_device_and_worker() {
    let site = seed_site("checkin_unknown");

    let err = CheckInLogic::scan(
        &site.conn,
        &scan(site.worker, "NOPE", "2025-06-02 09:00:00"),
        &FirstAssociation,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::DeviceNotFound(ref d) if d == "NOPE"));

    let err = CheckInLogic::scan(
        &site.conn,
        &scan(9999, "D1", "2025-06-02 09:00:00"),
        &FirstAssociation,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::WorkerNotFound(9999)));
}

#[test]
fn test_worker_without_project() {
    let site = seed_site("checkin_no_project");
    let loner = AdminLogic::add_worker(&site.conn, &new_worker("Ana", "Lopez"), &[]).unwrap();

    let err = CheckInLogic::scan(
        &site.conn,
        &scan(loner, "D1", "2025-06-02 09:00:00"),
        &FirstAssociation,
    )
    .unwrap_err();

    assert!(matches!(err, AppError::NoProjectAssigned(id) if id == loner));
}

#[test]
fn test_repeated_scans_keep_one_record() {
    let site = seed_site("checkin_repeat");

    CheckInLogic::scan(
        &site.conn,
        &scan(site.worker, "D1", "2025-06-02 09:00:00"),
        &FirstAssociation,
    )
    .unwrap();
    let out = CheckInLogic::scan(
        &site.conn,
        &scan(site.worker, "D1", "2025-06-02 09:15:00"),
        &FirstAssociation,
    )
    .unwrap();

    assert_eq!(out.category, LatenessCategory::RetardoLeve);
    assert_eq!(attendance_rows(&site.conn, site.worker), 1);

    let rec = load_attendance(&site.conn, site.worker, site.project, &out.anchor.date())
        .unwrap()
        .unwrap();
    assert_eq!(rec.category, Some(LatenessCategory::RetardoLeve));
}

#[test]
fn test_identical_scan_is_idempotent() {
    let site = seed_site("checkin_identical");
    let event = scan(site.worker, "D1", "2025-06-02 09:12:00");

    let a = CheckInLogic::scan(&site.conn, &event, &FirstAssociation).unwrap();
    let first = load_attendance(&site.conn, site.worker, site.project, &a.anchor.date())
        .unwrap()
        .unwrap();

    let b = CheckInLogic::scan(&site.conn, &event, &FirstAssociation).unwrap();
    let second = load_attendance(&site.conn, site.worker, site.project, &b.anchor.date())
        .unwrap()
        .unwrap();

    assert!(a.session_created && !b.session_created);
    assert_eq!(a.anchor, b.anchor);
    assert_eq!(a.category, b.category);
    assert_eq!(first.id, second.id);
    assert_eq!(first.present, second.present);
    assert_eq!(first.category, second.category);
    assert_eq!(second.category, Some(LatenessCategory::Puntual));
    assert_eq!(attendance_rows(&site.conn, site.worker), 1);
}

#[test]
fn test_each_day_gets_its_own_anchor() {
    let site = seed_site("checkin_two_days");

    CheckInLogic::scan(
        &site.conn,
        &scan(site.worker, "D1", "2025-06-02 07:00:00"),
        &FirstAssociation,
    )
    .unwrap();
    let out = CheckInLogic::scan(
        &site.conn,
        &scan(site.worker, "D1", "2025-06-03 10:30:00"),
        &FirstAssociation,
    )
    .unwrap();

    assert!(out.session_created);
    assert_eq!(out.category, LatenessCategory::Puntual);
    assert_eq!(attendance_rows(&site.conn, site.worker), 2);
}

#[test]
fn test_device_intersection_policy_picks_authorized_project() {
    let site = seed_site("checkin_policy");

    // First association is the project D1 cannot report for.
    let w = AdminLogic::add_worker(
        &site.conn,
        &new_worker("Rosa", "Diaz"),
        &[site.other_project, site.project],
    )
    .unwrap();

    let err = CheckInLogic::scan(
        &site.conn,
        &scan(w, "D1", "2025-06-02 09:00:00"),
        ProjectPolicyKind::First.policy(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::DeviceNotAuthorized { project_id, .. } if project_id == site.other_project
    ));

    let out = CheckInLogic::scan(
        &site.conn,
        &scan(w, "D1", "2025-06-02 09:00:00"),
        &DeviceIntersection,
    )
    .unwrap();
    assert_eq!(out.project_id, site.project);
}

#[test]
fn test_successful_scan_is_logged() {
    let site = seed_site("checkin_logged");

    CheckInLogic::scan(
        &site.conn,
        &scan(site.worker, "D1", "2025-06-02 09:00:00"),
        &FirstAssociation,
    )
    .unwrap();

    let checkins = load_log(&site.conn, Some("checkin")).unwrap();
    assert_eq!(checkins.len(), 1);
    assert!(checkins[0].message.contains("puntual"));
    assert_eq!(load_log(&site.conn, Some("session_created")).unwrap().len(), 1);
}
