#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDateTime;
use rasistencia::core::admin::AdminLogic;
use rasistencia::db::initialize::init_db;
use rasistencia::db::pool::open_connection;
use rasistencia::models::worker::NewWorker;
use rusqlite::Connection;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub fn rta() -> Command {
    cargo_bin_cmd!("rasistencia")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rasistencia.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    for suffix in ["", "-wal", "-shm"] {
        fs::remove_file(format!("{db_path}{suffix}")).ok();
    }
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("timestamp")
}

/// Fresh migrated database opened through the library.
pub fn open_db(name: &str) -> (String, Connection) {
    let path = setup_test_db(name);
    let conn = open_connection(Path::new(&path)).expect("open db");
    init_db(&conn).expect("init db");
    (path, conn)
}

pub fn new_worker(first: &str, last: &str) -> NewWorker {
    NewWorker {
        first_name: first.to_string(),
        last_name: last.to_string(),
        second_last_name: "Ruiz".to_string(),
        category: "Albañil".to_string(),
        ..Default::default()
    }
}

/// A site with two projects. `worker` and `worker2` belong to `project`;
/// device `D1` is authorized for `project`, `D2` only for `other_project`.
pub struct Site {
    pub path: String,
    pub conn: Connection,
    pub project: i64,
    pub other_project: i64,
    pub worker: i64,
    pub worker2: i64,
}

pub fn seed_site(name: &str) -> Site {
    let (path, conn) = open_db(name);
    let project = AdminLogic::add_project(&conn, "Torre Norte", None).expect("project");
    let other_project = AdminLogic::add_project(&conn, "Bodega Sur", None).expect("project");
    let worker = AdminLogic::add_worker(&conn, &new_worker("Juan", "Perez"), &[project]).expect("worker");
    let worker2 =
        AdminLogic::add_worker(&conn, &new_worker("Luis", "Gomez"), &[project]).expect("worker");
    AdminLogic::add_device(&conn, "D1", "Caseta norte", &[project]).expect("device");
    AdminLogic::add_device(&conn, "D2", "Caseta sur", &[other_project]).expect("device");
    Site {
        path,
        conn,
        project,
        other_project,
        worker,
        worker2,
    }
}

/// Initialize a DB through the CLI and register project 1, worker 1 and device D1.
pub fn init_cli_site(db_path: &str) {
    rta()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rta()
        .args(["--db", db_path, "project", "add", "Torre Norte"])
        .assert()
        .success();

    rta()
        .args([
            "--db",
            db_path,
            "worker",
            "add",
            "--name",
            "Juan",
            "--last-name",
            "Perez",
            "--category",
            "Albañil",
            "--curp",
            "PERJ800101HDFRRN09",
            "--project",
            "1",
        ])
        .assert()
        .success();

    rta()
        .args([
            "--db", db_path, "device", "add", "D1", "--name", "Caseta", "--project", "1",
        ])
        .assert()
        .success();
}
