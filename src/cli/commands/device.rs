use crate::cli::parser::{Commands, DeviceAction};
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::db::pool::DbPool;
use crate::db::queries::list_devices;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Device { action } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let conn = &pool.conn;

        match action {
            DeviceAction::Add { id, name, projects } => {
                AdminLogic::add_device(conn, id, name, projects)?;
                success(format!("Device '{}' registered.", id.trim()));
            }
            DeviceAction::List => {
                let devices = list_devices(conn)?;
                if devices.is_empty() {
                    warning("No devices registered.");
                    return Ok(());
                }

                let mut table = Table::new(["ID", "Name", "Authorized projects"]);
                for d in devices {
                    let projects = d
                        .project_ids
                        .iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(",");
                    table.add_row(vec![d.id, d.name, projects]);
                }
                print!("{}", table.render(cfg.separator()));
            }
            DeviceAction::Authorize { device, project } => {
                if AdminLogic::authorize_device(conn, device, *project)? {
                    success(format!("Device '{}' authorized for project {}.", device, project));
                } else {
                    info(format!("Device '{}' already authorized for project {}.", device, project));
                }
            }
            DeviceAction::Revoke { device, project } => {
                if AdminLogic::revoke_device(conn, device, *project)? {
                    success(format!("Device '{}' revoked for project {}.", device, project));
                } else {
                    warning(format!("Device '{}' was not authorized for project {}.", device, project));
                }
            }
        }
    }
    Ok(())
}
