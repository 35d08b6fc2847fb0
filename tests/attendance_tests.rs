mod common;
use common::{seed_site, ts};

use chrono::NaiveDate;
use rasistencia::core::authorize::FirstAssociation;
use rasistencia::core::checkin::{CheckInLogic, ScanEvent};
use rasistencia::core::manual::{FormSummary, ManualBatch, ManualEntry, ManualLogic, ManualResult};
use rasistencia::core::recorder::{record_attendance, record_attendance_tracked};
use rasistencia::db::queries::load_attendance;
use rasistencia::errors::AppError;
use rasistencia::models::attendance::AttendanceSource;
use rasistencia::models::lateness::LatenessCategory;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

#[test]
fn test_recorder_upserts_by_worker_project_day() {
    let site = seed_site("attendance_upsert");

    let (first, created) = record_attendance_tracked(
        &site.conn,
        site.worker,
        site.project,
        &day(),
        true,
        Some(LatenessCategory::RetardoAlto),
        AttendanceSource::Qr,
    )
    .unwrap();
    assert!(created);

    let (second, created) = record_attendance_tracked(
        &site.conn,
        site.worker,
        site.project,
        &day(),
        true,
        Some(LatenessCategory::Puntual),
        AttendanceSource::Qr,
    )
    .unwrap();
    assert!(!created);
    assert_eq!(first.id, second.id);
    assert_eq!(second.category, Some(LatenessCategory::Puntual));
}

#[test]
fn test_manual_entry_overrides_qr_record() {
    let site = seed_site("attendance_override");

    CheckInLogic::scan(
        &site.conn,
        &ScanEvent {
            worker_id: site.worker,
            device_id: "D1".into(),
            at: ts("2025-06-02 09:30:00"),
        },
        &FirstAssociation,
    )
    .unwrap();

    record_attendance(
        &site.conn,
        site.worker,
        site.project,
        &day(),
        false,
        None,
        AttendanceSource::Manual,
    )
    .unwrap();

    let rec = load_attendance(&site.conn, site.worker, site.project, &day())
        .unwrap()
        .unwrap();
    assert!(!rec.present);
    assert_eq!(rec.category, None);
    assert_eq!(rec.source, AttendanceSource::Manual);
}

#[test]
fn test_manual_register_reports_unknown_workers() {
    let site = seed_site("attendance_manual_unknown");

    let entries = [
        ManualEntry {
            worker_id: site.worker,
            present: true,
        },
        ManualEntry {
            worker_id: 777,
            present: true,
        },
        ManualEntry {
            worker_id: site.worker2,
            present: false,
        },
    ];

    let report = ManualLogic::register(&site.conn, site.project, &day(), &entries).unwrap();
    assert_eq!(report.status, "success");
    assert_eq!(report.results.len(), 3);
    assert_eq!(
        report.results[1],
        ManualResult::Failed {
            worker_id: 777,
            error: "Worker not found.".into()
        }
    );

    let json = serde_json::to_string(&report).unwrap();
    assert_eq!(
        json,
        format!(
            concat!(
                r#"{{"status":"success","results":["#,
                r#"{{"trabajador":{},"created":true,"presente":true}},"#,
                r#"{{"trabajador":777,"error":"Worker not found."}},"#,
                r#"{{"trabajador":{},"created":true,"presente":false}}]}}"#
            ),
            site.worker, site.worker2
        )
    );

    let absent = load_attendance(&site.conn, site.worker2, site.project, &day())
        .unwrap()
        .unwrap();
    assert!(!absent.present);
}

#[test]
fn test_manual_batch_from_json() {
    let site = seed_site("attendance_batch");

    let payload = format!(
        r#"{{"project": {}, "date": "2025-06-02",
            "asistencias": [{{"trabajador": {}, "presente": true}}]}}"#,
        site.project, site.worker
    );
    let batch: ManualBatch = serde_json::from_str(&payload).unwrap();

    let report = ManualLogic::register_batch(&site.conn, &batch).unwrap();
    assert!(matches!(
        report.results[0],
        ManualResult::Saved { created: true, present: true, .. }
    ));

    // Resubmitting updates instead of duplicating.
    let report = ManualLogic::register_batch(&site.conn, &batch).unwrap();
    assert!(matches!(
        report.results[0],
        ManualResult::Saved { created: false, .. }
    ));
}

#[test]
fn test_manual_batch_rejects_bad_input() {
    let site = seed_site("attendance_batch_bad");

    let batch = ManualBatch {
        project: site.project,
        date: "02/06/2025".into(),
        entries: vec![],
    };
    assert!(matches!(
        ManualLogic::register_batch(&site.conn, &batch),
        Err(AppError::InvalidDate(_))
    ));

    let batch = ManualBatch {
        project: 999,
        date: "2025-06-02".into(),
        entries: vec![],
    };
    assert!(matches!(
        ManualLogic::register_batch(&site.conn, &batch),
        Err(AppError::ProjectNotFound(999))
    ));
}

#[test]
fn test_form_marks_everyone_in_project() {
    let site = seed_site("attendance_form");

    let summary = ManualLogic::register_form(&site.conn, site.project, &day(), &[site.worker2]).unwrap();
    assert_eq!(
        summary,
        FormSummary {
            present: 1,
            absent: 1
        }
    );

    let w1 = load_attendance(&site.conn, site.worker, site.project, &day())
        .unwrap()
        .unwrap();
    let w2 = load_attendance(&site.conn, site.worker2, site.project, &day())
        .unwrap()
        .unwrap();
    assert!(!w1.present);
    assert!(w2.present);
}
