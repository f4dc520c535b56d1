//! Update planning: a real remote-vs-lock comparison
//!
//! For every candidate source the planner resolves the remote head of
//! the source's ref and compares it against the commit recorded in the
//! lock. Remote URLs are probed with `git ls-remote`; local repositories
//! fall back to the cache-backed fetcher, whose fetch observes the same
//! movement. Pinned sources only participate when forced.

use std::path::PathBuf;

use crate::config::{Config, ManifestSource};
use crate::error::{PromptSyncError, Result, source as source_err};
use crate::git::{self, FetchOptions};
use crate::lock::LockStore;
use crate::source::SourceSpec;

/// Options for update planning
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub workspace_dir: PathBuf,
    /// Specific sources to update; empty means every unpinned source
    pub targets: Vec<String>,
    /// Include pinned sources (and plan targets even when up to date)
    pub force: bool,
    pub offline: bool,
    pub cache_dir: Option<PathBuf>,
}

/// One source with an update available (or forced)
#[derive(Debug, Clone)]
pub struct UpdatePlanEntry {
    pub spec: SourceSpec,
    pub locked_commit: Option<String>,
    pub remote_commit: String,
    pub pinned: bool,
}

/// Compute which sources would move if installed now.
///
/// Requires an existing lock: without one there is nothing to compare
/// against and `install` is the right command.
pub fn plan_updates(cfg: &Config, opts: &UpdateOptions) -> Result<Vec<UpdatePlanEntry>> {
    let store = LockStore::new(&opts.workspace_dir);
    let Some(lockfile) = store.read()? else {
        return Err(PromptSyncError::LockMissing);
    };

    let candidates = select_candidates(&cfg.sources, &opts.targets, opts.force)?;

    let mut plan = Vec::new();
    for source in candidates {
        let remote_commit = resolve_remote_commit(&source.spec, opts)?;
        let locked_commit = lockfile.commit_for(&source.spec.url).map(String::from);

        let moved = locked_commit.as_deref() != Some(remote_commit.as_str());
        let forced_target = opts.force && !opts.targets.is_empty();
        if moved || forced_target {
            plan.push(UpdatePlanEntry {
                spec: source.spec.clone(),
                locked_commit,
                remote_commit,
                pinned: source.spec.is_pinned(),
            });
        }
    }
    Ok(plan)
}

/// Select which configured sources participate in the update.
///
/// No targets: every source, skipping pinned ones unless forced.
/// Explicit targets: matched by repository (ref ignored); naming a
/// pinned source without `--force` is an error.
fn select_candidates<'a>(
    sources: &'a [ManifestSource],
    targets: &[String],
    force: bool,
) -> Result<Vec<&'a ManifestSource>> {
    if targets.is_empty() {
        return Ok(sources
            .iter()
            .filter(|s| force || !s.spec.is_pinned())
            .collect());
    }

    let mut selected = Vec::with_capacity(targets.len());
    for target in targets {
        let target_spec = SourceSpec::parse(target)?;
        let found = sources.iter().find(|s| s.spec.same_repo(&target_spec));
        let Some(source) = found else {
            return Err(source_err::not_found(target));
        };
        if source.spec.is_pinned() && !force {
            return Err(source_err::pinned(source.spec.to_string()));
        }
        selected.push(source);
    }
    Ok(selected)
}

/// Resolve the commit the source's ref currently points at on the remote
fn resolve_remote_commit(spec: &SourceSpec, opts: &UpdateOptions) -> Result<String> {
    if !spec.url.is_local() {
        if let Ok(commit) = git::refs::ls_remote(&spec.url, spec.git_ref.as_deref()) {
            return Ok(commit);
        }
    }
    // Local repositories (and hosts without a reachable git CLI) go
    // through the fetcher, whose fetch tracks the same remote movement.
    let fetcher = git::new_fetcher(FetchOptions::new(opts.cache_dir.clone(), opts.offline));
    let (_, commit) = fetcher.clone_or_update(&spec.url, spec.git_ref.as_deref())?;
    Ok(commit)
}
