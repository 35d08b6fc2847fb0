//! Path handling for the database override and export targets.

use crate::errors::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Replace a leading `~` with the home directory, when there is one.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/").zip(dirs::home_dir()) {
        Some((rest, home)) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Resolve an export target: an explicit path is taken as given (after `~`
/// expansion) and must be absolute; otherwise `default_name` in `cwd`.
pub fn resolve_output(file: Option<&str>, cwd: &Path, default_name: &str) -> AppResult<PathBuf> {
    let path = match file {
        Some(f) => expand_tilde(f),
        None => cwd.join(default_name),
    };
    if !path.is_absolute() {
        return Err(AppError::Export(format!(
            "Output file path must be absolute: {}",
            path.display()
        )));
    }
    Ok(path)
}
