//! `update` command handler

use std::path::PathBuf;

use console::style;

use crate::cli::UpdateArgs;
use crate::config;
use crate::error::Result;
use crate::workflow::{self, InstallOptions, Installer, UpdateOptions};

pub fn run(workspace: Option<PathBuf>, args: UpdateArgs) -> Result<()> {
    super::forbid_allow_unknown_in_ci(args.allow_unknown)?;
    let workspace_dir = super::workspace_dir(workspace)?;
    let strict = args.strict || super::ci_mode();

    let cfg = config::load(&workspace_dir)?;

    let plan = workflow::plan_updates(
        &cfg,
        &UpdateOptions {
            workspace_dir: workspace_dir.clone(),
            targets: args.sources.clone(),
            force: args.force,
            offline: args.offline,
            cache_dir: args.cache_dir.clone(),
        },
    )?;

    if plan.is_empty() {
        println!("{} All sources are up to date", style("✓").green().bold());
        return Ok(());
    }

    println!("Available updates:");
    for entry in &plan {
        let current = entry
            .locked_commit
            .as_deref()
            .map(short_commit)
            .unwrap_or("none");
        let pinned_note = if entry.pinned { " (pinned, forced)" } else { "" };
        println!(
            "  {} {} -> {}{}",
            entry.spec,
            current,
            short_commit(&entry.remote_commit),
            pinned_note
        );
    }

    if args.dry_run {
        println!("\nDry run mode - no changes made");
        return Ok(());
    }

    println!("\nApplying updates...");
    Installer::new(InstallOptions {
        workspace_dir,
        strict,
        verify_only: false,
        offline: args.offline,
        cache_dir: args.cache_dir,
        allow_unknown: args.allow_unknown,
    })
    .execute()?;

    println!("{} Updated {} source(s)", style("✓").green().bold(), plan.len());
    Ok(())
}

fn short_commit(commit: &str) -> &str {
    if commit.len() >= 8 { &commit[..8] } else { commit }
}
