//! `verify` command handler

use std::path::PathBuf;

use console::style;

use crate::cli::VerifyArgs;
use crate::error::Result;
use crate::workflow::{InstallOptions, Installer};

pub fn run(workspace: Option<PathBuf>, args: VerifyArgs) -> Result<()> {
    super::forbid_allow_unknown_in_ci(args.allow_unknown)?;

    // Verification never mutates: strict, and served from the cache only
    let options = InstallOptions {
        workspace_dir: super::workspace_dir(workspace)?,
        strict: true,
        verify_only: true,
        offline: true,
        cache_dir: args.cache_dir,
        allow_unknown: args.allow_unknown,
    };

    Installer::new(options).execute()?;
    println!("{} Verification passed", style("✓").green().bold());
    Ok(())
}
