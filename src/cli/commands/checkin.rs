use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::qr;
use crate::core::response::{CheckInRequest, CheckInResponse, check_in};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::time;

/// Register a scan and print the response body as JSON.
/// A non-200 response becomes the command's error (non-zero exit).
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin {
        worker,
        qr: payload,
        device,
        at,
        policy,
        pretty,
        status,
    } = cmd
    {
        let at = match at {
            Some(s) => time::parse_timestamp(s)?,
            None => time::now(),
        };
        let policy = policy.unwrap_or(cfg.project_policy).policy();

        let result = resolve_worker(*worker, payload.as_deref()).and_then(|worker_id| {
            let request = CheckInRequest {
                worker_id,
                device_id: device.clone().or_else(|| cfg.device_id.clone()),
            };
            let pool = DbPool::new(&cfg.database)?;
            check_in(&pool.conn, &request, policy, at)
        });

        let response = CheckInResponse::from_result(&result);
        if *status {
            println!("{}", response.status);
        }
        println!("{}", response.to_json(*pretty)?);

        result?;
    }
    Ok(())
}

fn resolve_worker(worker: Option<i64>, payload: Option<&str>) -> AppResult<i64> {
    match (worker, payload) {
        (Some(id), _) => Ok(id),
        (None, Some(p)) => qr::decode(p),
        (None, None) => Err(AppError::WorkerIdRequired),
    }
}
