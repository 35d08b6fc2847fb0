use crate::cli::parser::{Commands, WorkerAction};
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::core::qr;
use crate::db::pool::DbPool;
use crate::db::queries::{list_workers, require_worker, worker_project_ids};
use crate::errors::AppResult;
use crate::models::worker::NewWorker;
use crate::ui::messages::{info, success, warning};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Worker { action } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let conn = &pool.conn;

        match action {
            WorkerAction::Add {
                first_name,
                last_name,
                second_last_name,
                category,
                phone,
                curp,
                nss,
                projects,
            } => {
                let new = NewWorker {
                    first_name: first_name.trim().to_string(),
                    last_name: last_name.trim().to_string(),
                    second_last_name: second_last_name.trim().to_string(),
                    category: category.trim().to_string(),
                    phone: phone.trim().to_string(),
                    curp: curp.clone(),
                    nss: nss.clone(),
                };
                let id = AdminLogic::add_worker(conn, &new, projects)?;
                success(format!("Worker {} registered.", id));
                info(format!("QR payload: {}", qr::encode(&cfg.qr_base_url, id)));
            }
            WorkerAction::List { project } => {
                let workers = list_workers(conn, *project)?;
                if workers.is_empty() {
                    warning("No workers found.");
                    return Ok(());
                }

                let mut table = Table::new(["ID", "Name", "Category", "Phone", "Projects"]);
                for w in workers {
                    let projects = worker_project_ids(conn, w.id)?
                        .iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(",");
                    table.add_row(vec![
                        w.id.to_string(),
                        w.full_name(),
                        w.category,
                        w.phone,
                        projects,
                    ]);
                }
                print!("{}", table.render(cfg.separator()));
            }
            WorkerAction::Assign { worker, project } => {
                if AdminLogic::assign_worker(conn, *worker, *project)? {
                    success(format!("Worker {} assigned to project {}.", worker, project));
                } else {
                    info(format!("Worker {} already in project {}.", worker, project));
                }
            }
            WorkerAction::Unassign { worker, project } => {
                if AdminLogic::unassign_worker(conn, *worker, *project)? {
                    success(format!("Worker {} removed from project {}.", worker, project));
                } else {
                    warning(format!("Worker {} was not in project {}.", worker, project));
                }
            }
            WorkerAction::Qr { worker } => {
                let w = require_worker(conn, *worker)?;
                println!("{}", qr::encode(&cfg.qr_base_url, w.id));
            }
        }
    }
    Ok(())
}
