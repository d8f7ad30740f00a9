//! Dataset root resolution.
//!
//! An explicitly passed root always wins. Without one, the root is the
//! top-level directory of the enclosing git working tree.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use quotebook_shared::{QuotebookError, Result};

/// Ask git for the top-level directory of the current working tree.
pub fn locate_repository_root() -> Result<PathBuf> {
    locate_repository_root_from(Path::new("."))
}

/// Ask git for the top-level directory of the working tree containing `dir`.
pub fn locate_repository_root_from(dir: &Path) -> Result<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(dir)
        .output()
        .map_err(|e| QuotebookError::repository_root(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(QuotebookError::repository_root(format!(
            "git rev-parse exited with status {}: {}",
            output.status.code().unwrap_or(-1),
            stderr.trim()
        )));
    }

    let root = parse_toplevel(&output.stdout)?;
    debug!(root = %root.display(), "located repository root via git");
    Ok(root)
}

/// Take the first stdout line, trimmed, as the root path.
fn parse_toplevel(stdout: &[u8]) -> Result<PathBuf> {
    let text = String::from_utf8(stdout.to_vec()).map_err(|_| {
        QuotebookError::repository_root("git printed a non UTF-8 path")
    })?;

    match text.lines().next().map(str::trim) {
        Some(line) if !line.is_empty() => Ok(PathBuf::from(line)),
        _ => Err(QuotebookError::repository_root(
            "git rev-parse printed no path",
        )),
    }
}

/// Pick the dataset root: the explicit path if given, git otherwise.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let Some(path) = explicit else {
        return locate_repository_root();
    };

    if !path.is_dir() {
        return Err(QuotebookError::repository_root(format!(
            "dataset root {} is not a directory",
            path.display()
        )));
    }

    info!(root = %path.display(), "using explicit dataset root");
    Ok(path.to_path_buf())
}
