//! `remove` command handler

use std::path::{Path, PathBuf};

use console::style;

use crate::cli::RemoveArgs;
use crate::config;
use crate::error::{Result, source as source_err};
use crate::lock::LockStore;
use crate::source::SourceSpec;
use crate::workflow::{InstallOptions, Installer};

pub fn run(workspace: Option<PathBuf>, args: RemoveArgs) -> Result<()> {
    let workspace_dir = super::workspace_dir(workspace)?;
    let spec = SourceSpec::parse(&args.source)?;

    let manifest_path = config::find_promptsfile(&workspace_dir)?;
    let mut doc = config::load_manifest_doc(&manifest_path)?;

    let before = doc.sources.len();
    doc.sources.retain(|entry| {
        SourceSpec::parse(entry.repo())
            .map(|s| !s.same_repo(&spec))
            .unwrap_or(true)
    });
    if doc.sources.len() == before {
        return Err(source_err::not_found(&args.source));
    }
    config::save_manifest_doc(&manifest_path, &doc)?;

    if !args.keep_files {
        delete_recorded_files(&workspace_dir, &spec)?;
    }

    println!("{} Removed source: {}", style("✓").green().bold(), args.source);

    if args.no_install {
        return Ok(());
    }

    // Rerun install so the lock and the ignore block drop the source
    Installer::new(InstallOptions {
        workspace_dir,
        strict: super::ci_mode(),
        verify_only: false,
        offline: false,
        cache_dir: None,
        allow_unknown: false,
    })
    .execute()?;
    Ok(())
}

/// Delete the files the lock records for the removed source.
///
/// Missing files are fine; other deletion failures only warn. Emptied
/// parent directories are removed best-effort.
fn delete_recorded_files(workspace_dir: &Path, spec: &SourceSpec) -> Result<()> {
    let Some(lockfile) = LockStore::new(workspace_dir).read()? else {
        return Ok(());
    };
    let Some(files) = lockfile.files_by_source(&spec.url) else {
        return Ok(());
    };

    let mut parents = Vec::new();
    for file in files {
        let full_path = workspace_dir.join(&file.path);
        match std::fs::remove_file(&full_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => eprintln!(
                "{} could not remove {}: {e}",
                style("warning:").yellow().bold(),
                file.path
            ),
        }
        if let Some(parent) = full_path.parent() {
            parents.push(parent.to_path_buf());
        }
    }

    parents.sort();
    parents.dedup();
    for parent in parents {
        let _ = std::fs::remove_dir(parent);
    }
    Ok(())
}
