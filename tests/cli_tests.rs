use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_cli_site, rta, setup_test_db, temp_out};

fn checkin(db_path: &str, worker: &str, device: &str, at: &str) -> assert_cmd::assert::Assert {
    rta()
        .args([
            "--db", db_path, "checkin", "--worker", worker, "--device", device, "--at", at,
        ])
        .assert()
}

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("cli_init");

    rta()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    rta()
        .args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Pending migrations:").and(contains("Daily sessions")));
}

#[test]
fn test_checkin_prints_recorded_body() {
    let db_path = setup_test_db("cli_checkin_recorded");
    init_cli_site(&db_path);

    checkin(&db_path, "1", "D1", "2025-06-02 09:00:00")
        .success()
        .stdout(contains(
            r#"{"outcome":"recorded","category":"puntual","workerId":1}"#,
        ));

    checkin(&db_path, "1", "D1", "2025-06-02 09:30:00")
        .success()
        .stdout(contains(r#""category":"retardo_leve""#));
}

#[test]
fn test_checkin_rejections_exit_with_error() {
    let db_path = setup_test_db("cli_checkin_rejected");
    init_cli_site(&db_path);

    checkin(&db_path, "1", "D1", "2025-06-02 09:00:00").success();

    rta()
        .args([
            "--db", &db_path, "checkin", "--worker", "1", "--device", "D1", "--at",
            "2025-06-02 10:05:00", "--status",
        ])
        .assert()
        .failure()
        .stdout(contains("400").and(contains(r#"{"error":"time_exceeded"}"#)));

    checkin(&db_path, "1", "D9", "2025-06-02 09:05:00")
        .failure()
        .stdout(contains(r#"{"error":"device_not_authorized"}"#));

    checkin(&db_path, "42", "D1", "2025-06-02 09:05:00")
        .failure()
        .stdout(contains(r#"{"error":"worker_not_found"}"#));
}

#[test]
fn test_checkin_from_qr_payload() {
    let db_path = setup_test_db("cli_checkin_qr");
    init_cli_site(&db_path);

    rta()
        .args(["--db", &db_path, "worker", "qr", "1"])
        .assert()
        .success()
        .stdout(contains("/api/registrar-qr/1/"));

    rta()
        .args([
            "--db",
            &db_path,
            "checkin",
            "--qr",
            "http://127.0.0.1:8000/api/registrar-qr/1/",
            "--device",
            "D1",
            "--at",
            "2025-06-02 09:00:00",
        ])
        .assert()
        .success()
        .stdout(contains(r#""workerId":1"#));

    rta()
        .args(["--db", &db_path, "checkin", "--qr", "not-a-qr", "--device", "D1"])
        .assert()
        .failure()
        .stdout(contains(r#"{"error":"invalid_qr_payload"}"#));
}

#[test]
fn test_list_and_sessions_show_checkins() {
    let db_path = setup_test_db("cli_list_sessions");
    init_cli_site(&db_path);

    checkin(&db_path, "1", "D1", "2025-06-02 07:45:00").success();

    rta()
        .args(["--db", &db_path, "list", "--project", "1", "--date", "2025-06-02"])
        .assert()
        .success()
        .stdout(contains("Juan Perez").and(contains("present")).and(contains("puntual")));

    rta()
        .args(["--db", &db_path, "sessions", "--date", "2025-06-02"])
        .assert()
        .success()
        .stdout(contains("D1").and(contains("2025-06-02 07:45:00")));

    rta()
        .args(["--db", &db_path, "sessions", "--date", "2025-06-03"])
        .assert()
        .success()
        .stderr(contains("No sessions for 2025-06-03"));
}

#[test]
fn test_attend_manual_lists_and_json() {
    let db_path = setup_test_db("cli_attend");
    let batch = temp_out("cli_attend_batch", "json");
    init_cli_site(&db_path);

    rta()
        .args([
            "--db", &db_path, "attend", "--project", "1", "--date", "2025-06-03", "--absent", "1",
        ])
        .assert()
        .success()
        .stdout(contains("Worker 1: absent (registered)"));

    fs::write(
        &batch,
        r#"{"project": 1, "date": "2025-06-03",
            "asistencias": [{"trabajador": 1, "presente": true}, {"trabajador": 5, "presente": true}]}"#,
    )
    .unwrap();

    rta()
        .args(["--db", &db_path, "attend", "--json", &batch])
        .assert()
        .success()
        .stdout(
            contains(r#""status": "success""#)
                .and(contains(r#""created": false"#))
                .and(contains("Worker not found.")),
        );

    rta()
        .args(["--db", &db_path, "list", "--project", "1", "--date", "2025-06-03"])
        .assert()
        .success()
        .stdout(contains("present").and(contains("manual")));
}

#[test]
fn test_admin_commands() {
    let db_path = setup_test_db("cli_admin");
    init_cli_site(&db_path);

    rta()
        .args(["--db", &db_path, "project", "add", "Bodega Sur", "--description", "Fase 2"])
        .assert()
        .success()
        .stdout(contains("Project 2 created: Bodega Sur"));

    rta()
        .args(["--db", &db_path, "worker", "assign", "1", "2"])
        .assert()
        .success()
        .stdout(contains("Worker 1 assigned to project 2."));

    rta()
        .args(["--db", &db_path, "device", "authorize", "D1", "2"])
        .assert()
        .success();

    rta()
        .args(["--db", &db_path, "device", "list"])
        .assert()
        .success()
        .stdout(contains("D1").and(contains("Caseta")));

    rta()
        .args(["--db", &db_path, "device", "add", "D1", "--name", "Otra"])
        .assert()
        .failure()
        .stderr(contains("Device 'D1' already exists"));

    rta()
        .args(["--db", &db_path, "worker", "list", "--project", "2"])
        .assert()
        .success()
        .stdout(contains("Juan").and(contains("Perez")));
}

#[test]
fn test_log_records_checkins() {
    let db_path = setup_test_db("cli_log");
    init_cli_site(&db_path);

    checkin(&db_path, "1", "D1", "2025-06-02 09:00:00").success();
    checkin(&db_path, "1", "D1", "2025-06-02 11:00:00").failure();

    rta()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(
            contains("session_created")
                .and(contains("checkin_rejected"))
                .and(contains("migration_applied")),
        );

    rta()
        .args(["--db", &db_path, "log", "--print", "--op", "checkin_rejected"])
        .assert()
        .success()
        .stdout(contains("checkin_rejected").and(contains("session_created").not()));
}

#[test]
fn test_checkin_requires_worker_or_qr() {
    let db_path = setup_test_db("cli_checkin_no_worker");
    init_cli_site(&db_path);

    rta()
        .args(["--db", &db_path, "checkin", "--device", "D1"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("--worker"));
}
