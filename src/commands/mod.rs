//! Command handlers
//!
//! Thin wrappers that translate parsed CLI arguments into workflow
//! options, run the pipeline, and print user-facing summaries.

pub mod add;
pub mod init;
pub mod install;
pub mod list;
pub mod remove;
pub mod update;
pub mod verify;

use std::path::PathBuf;

use crate::error::Result;

/// Whether the `CI` environment variable is truthy.
///
/// CI mode forces strict behavior and forbids `--allow-unknown`.
pub fn ci_mode() -> bool {
    match std::env::var("CI") {
        Ok(value) => {
            let value = value.trim().to_ascii_lowercase();
            !value.is_empty() && !matches!(value.as_str(), "0" | "false" | "no" | "off")
        }
        Err(_) => false,
    }
}

/// Resolve the workspace directory: explicit flag or current directory
pub fn workspace_dir(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(dir) => Ok(dir),
        None => std::env::current_dir()
            .map_err(|e| crate::error::fs::io_error(format!("getting current directory: {e}"))),
    }
}

/// Reject `--allow-unknown` when running under CI
pub fn forbid_allow_unknown_in_ci(allow_unknown: bool) -> Result<()> {
    if allow_unknown && ci_mode() {
        return Err(crate::error::config::invalid(
            "--allow-unknown is not permitted in CI mode",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_dir_explicit() {
        let dir = workspace_dir(Some(PathBuf::from("/tmp/ws"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/ws"));
    }
}
