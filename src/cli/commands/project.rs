use crate::cli::parser::{Commands, ProjectAction};
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::db::pool::DbPool;
use crate::db::queries::list_projects;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Project { action } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        match action {
            ProjectAction::Add { name, description } => {
                let id = AdminLogic::add_project(&pool.conn, name, description.as_deref())?;
                success(format!("Project {} created: {}", id, name.trim()));
            }
            ProjectAction::List => {
                let projects = list_projects(&pool.conn)?;
                if projects.is_empty() {
                    warning("No projects registered.");
                    return Ok(());
                }

                let mut table = Table::new(["ID", "Name", "Description"]);
                for p in projects {
                    table.add_row(vec![
                        p.id.to_string(),
                        p.name,
                        p.description.unwrap_or_default(),
                    ]);
                }
                print!("{}", table.render(cfg.separator()));
            }
        }
    }
    Ok(())
}
