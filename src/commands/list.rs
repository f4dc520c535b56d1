//! `list` command handler

use std::path::PathBuf;

use console::style;

use crate::config;
use crate::error::Result;
use crate::lock::LockStore;

pub fn run(workspace: Option<PathBuf>) -> Result<()> {
    let workspace_dir = super::workspace_dir(workspace)?;
    let cfg = config::load(&workspace_dir)?;
    let lockfile = LockStore::new(&workspace_dir).read()?;

    if cfg.sources.is_empty() && cfg.overlays.is_empty() {
        println!("No sources configured");
        return Ok(());
    }

    println!("Sources:");
    for source in &cfg.sources {
        let pin = if source.spec.is_pinned() {
            style(" (pinned)").yellow().to_string()
        } else {
            String::new()
        };
        let locked = lockfile
            .as_ref()
            .and_then(|lock| {
                let commit = lock.commit_for(&source.spec.url)?;
                let files = lock.files_by_source(&source.spec.url)?.len();
                Some(format!(" [{} | {} file(s)]", &commit[..commit.len().min(8)], files))
            })
            .unwrap_or_default();
        println!("  {}{pin}{locked}", source.spec);
    }

    for overlay in &cfg.overlays {
        println!("  {} (overlay: {})", overlay.spec, overlay.scope);
    }

    Ok(())
}
