//! Administrative operations on projects, workers and devices.

use crate::db::log::ttlog_quiet;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::worker::NewWorker;
use rusqlite::Connection;

pub struct AdminLogic;

impl AdminLogic {
    pub fn add_project(conn: &Connection, name: &str, description: Option<&str>) -> AppResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Other("Project name cannot be empty".into()));
        }
        let id = queries::insert_project(conn, name, description)?;
        ttlog_quiet(conn, "project_add", &format!("project:{id}"), name);
        Ok(id)
    }

    /// Create a worker and associate it with `project_ids`, in the given order.
    pub fn add_worker(conn: &Connection, worker: &NewWorker, project_ids: &[i64]) -> AppResult<i64> {
        if worker.first_name.trim().is_empty() || worker.last_name.trim().is_empty() {
            return Err(AppError::Other("Worker first and last name are required".into()));
        }
        for p in project_ids {
            queries::require_project(conn, *p)?;
        }

        let tx = conn.unchecked_transaction()?;
        let id = queries::insert_worker(&tx, worker)?;
        for p in project_ids {
            queries::assign_worker_project(&tx, id, *p)?;
        }
        tx.commit()?;

        ttlog_quiet(
            conn,
            "worker_add",
            &format!("worker:{id}"),
            &format!(
                "{} {} {} (projects: {:?})",
                worker.first_name, worker.last_name, worker.second_last_name, project_ids
            ),
        );
        Ok(id)
    }

    pub fn assign_worker(conn: &Connection, worker_id: i64, project_id: i64) -> AppResult<bool> {
        queries::require_worker(conn, worker_id)?;
        queries::require_project(conn, project_id)?;
        let added = queries::assign_worker_project(conn, worker_id, project_id)?;
        if added {
            ttlog_quiet(
                conn,
                "worker_assign",
                &format!("worker:{worker_id}"),
                &format!("assigned to project {project_id}"),
            );
        }
        Ok(added)
    }

    pub fn unassign_worker(conn: &Connection, worker_id: i64, project_id: i64) -> AppResult<bool> {
        let removed = queries::unassign_worker_project(conn, worker_id, project_id)?;
        if removed {
            ttlog_quiet(
                conn,
                "worker_unassign",
                &format!("worker:{worker_id}"),
                &format!("removed from project {project_id}"),
            );
        }
        Ok(removed)
    }

    pub fn add_device(conn: &Connection, id: &str, name: &str, project_ids: &[i64]) -> AppResult<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::DeviceIdRequired);
        }
        for p in project_ids {
            queries::require_project(conn, *p)?;
        }

        let tx = conn.unchecked_transaction()?;
        queries::insert_device(&tx, id, name)?;
        for p in project_ids {
            queries::authorize_device_project(&tx, id, *p)?;
        }
        tx.commit()?;

        ttlog_quiet(
            conn,
            "device_add",
            &format!("device:{id}"),
            &format!("{name} (projects: {:?})", project_ids),
        );
        Ok(())
    }

    pub fn authorize_device(conn: &Connection, device_id: &str, project_id: i64) -> AppResult<bool> {
        if queries::load_device(conn, device_id)?.is_none() {
            return Err(AppError::DeviceNotFound(device_id.to_string()));
        }
        queries::require_project(conn, project_id)?;
        let added = queries::authorize_device_project(conn, device_id, project_id)?;
        if added {
            ttlog_quiet(
                conn,
                "device_authorize",
                &format!("device:{device_id}"),
                &format!("authorized for project {project_id}"),
            );
        }
        Ok(added)
    }

    pub fn revoke_device(conn: &Connection, device_id: &str, project_id: i64) -> AppResult<bool> {
        let removed = queries::revoke_device_project(conn, device_id, project_id)?;
        if removed {
            ttlog_quiet(
                conn,
                "device_revoke",
                &format!("device:{device_id}"),
                &format!("revoked for project {project_id}"),
            );
        }
        Ok(removed)
    }
}
