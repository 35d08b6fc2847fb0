//! Export target checks: the sheet is only written where the supervisor meant it.

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Whether the export may write `path`: the parent directory must exist, and
/// an existing sheet is only replaced with `force` or an explicit "y".
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    let stdin = io::stdin();
    check_target(path, force, &mut stdin.lock(), &mut io::stderr())
}

fn check_target<R: BufRead, W: Write>(
    path: &Path,
    force: bool,
    input: &mut R,
    prompt: &mut W,
) -> AppResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty())
        && !dir.is_dir()
    {
        return Err(AppError::Export(format!(
            "Output directory does not exist: {}",
            dir.display()
        )));
    }

    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The sheet '{}' already exists.", path.display()));
    write!(prompt, "Overwrite? [y/N]: ")?;
    prompt.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "s" | "si" | "sí" => {
            info("Existing sheet will be overwritten.");
            Ok(())
        }
        _ => Err(AppError::Export(
            "export cancelled: existing file not overwritten".into(),
        )),
    }
}
