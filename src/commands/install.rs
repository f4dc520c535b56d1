//! `install` and `ci-install` command handlers

use std::path::PathBuf;

use console::style;

use crate::cli::{CiInstallArgs, InstallArgs};
use crate::error::Result;
use crate::workflow::{InstallOptions, Installer};

pub fn run(workspace: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    super::forbid_allow_unknown_in_ci(args.allow_unknown)?;
    let strict = args.strict || args.yes || super::ci_mode();

    let options = InstallOptions {
        workspace_dir: super::workspace_dir(workspace)?,
        strict,
        verify_only: false,
        offline: args.offline,
        cache_dir: args.cache_dir,
        allow_unknown: args.allow_unknown,
    };
    execute(options)
}

pub fn run_ci(workspace: Option<PathBuf>, args: CiInstallArgs) -> Result<()> {
    let options = InstallOptions {
        workspace_dir: super::workspace_dir(workspace)?,
        strict: true,
        verify_only: false,
        offline: args.offline,
        cache_dir: args.cache_dir,
        allow_unknown: false,
    };
    execute(options)
}

fn execute(options: InstallOptions) -> Result<()> {
    let report = Installer::new(options).execute()?;
    println!(
        "{} Installation complete ({} file(s) from {} source(s))",
        style("✓").green().bold(),
        report.files_written,
        report.sources
    );
    if !report.warnings.is_empty() {
        println!("  {} warning(s), see above", report.warnings.len());
    }
    Ok(())
}
