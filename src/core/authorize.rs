//! Device authorization gate: which project a scan belongs to, and whether
//! the scanning device may report for it.

use crate::db::queries::{load_device, require_project, require_worker, worker_project_ids};
use crate::errors::{AppError, AppResult};
use crate::models::device::Device;
use crate::models::project::Project;
use clap::ValueEnum;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// Chooses the project a worker's scan is classified against.
///
/// `worker_projects` is the worker's project set in association order. An
/// empty set must yield `None`.
pub trait ProjectResolutionPolicy {
    fn name(&self) -> &'static str;

    fn resolve(&self, worker_projects: &[i64], device: &Device) -> Option<i64>;
}

/// The worker's first associated project, whatever device scanned.
pub struct FirstAssociation;

impl ProjectResolutionPolicy for FirstAssociation {
    fn name(&self) -> &'static str {
        "first"
    }

    fn resolve(&self, worker_projects: &[i64], _device: &Device) -> Option<i64> {
        worker_projects.first().copied()
    }
}

/// The first of the worker's projects the device is authorized for. Falls back
/// to the first association so an unrelated device is still reported as
/// not authorized.
pub struct DeviceIntersection;

impl ProjectResolutionPolicy for DeviceIntersection {
    fn name(&self) -> &'static str {
        "device"
    }

    fn resolve(&self, worker_projects: &[i64], device: &Device) -> Option<i64> {
        worker_projects
            .iter()
            .copied()
            .find(|p| device.is_authorized_for(*p))
            .or_else(|| worker_projects.first().copied())
    }
}

/// Configurable selector for the resolution policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProjectPolicyKind {
    #[default]
    First,
    Device,
}

impl ProjectPolicyKind {
    pub fn policy(&self) -> &'static dyn ProjectResolutionPolicy {
        match self {
            ProjectPolicyKind::First => &FirstAssociation,
            ProjectPolicyKind::Device => &DeviceIntersection,
        }
    }
}

/// Result of a successful authorization.
#[derive(Debug, Clone)]
pub struct Authorized {
    pub device: Device,
    pub project: Project,
}

/// Validate that `device_id` is registered and permitted for the worker's
/// project. Read-only.
pub fn authorize(
    conn: &Connection,
    device_id: &str,
    worker_id: i64,
    policy: &dyn ProjectResolutionPolicy,
) -> AppResult<Authorized> {
    let device =
        load_device(conn, device_id)?.ok_or_else(|| AppError::DeviceNotFound(device_id.to_string()))?;

    require_worker(conn, worker_id)?;
    let projects = worker_project_ids(conn, worker_id)?;

    let project_id = policy
        .resolve(&projects, &device)
        .ok_or(AppError::NoProjectAssigned(worker_id))?;

    if !device.is_authorized_for(project_id) {
        return Err(AppError::DeviceNotAuthorized {
            device_id: device.id,
            project_id,
        });
    }

    let project = require_project(conn, project_id)?;
    Ok(Authorized { device, project })
}
