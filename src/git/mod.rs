//! Git fetcher capability
//!
//! The pipeline depends on the [`Fetcher`] trait only. Two backends ship:
//! [`libgit::LibGitFetcher`] (libgit2 via the `git2` crate, the default)
//! and [`exec::ExecFetcher`] (system `git` binary), selected with the
//! `PROMPT_SYNC_GIT_BACKEND` environment variable.
//!
//! Repositories are cached one directory per repository under the cache
//! root, keyed by a short hash of the canonical URL with a human-readable
//! tail. Writers hold an advisory lock per repository directory so
//! concurrent invocations on the same host do not corrupt each other's
//! checkouts.

pub mod exec;
pub mod libgit;
pub mod refs;
pub mod url;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use fs4::FileExt;
use sha2::{Digest, Sha256};

use crate::error::{Result, fs as fs_err};
use crate::source::{RepoUrl, SourceSpec};

/// A repository checked out at a resolved commit, valid for one run
#[derive(Debug, Clone)]
pub struct FetchedSource {
    pub spec: SourceSpec,
    pub local_path: PathBuf,
    pub commit: String,
}

/// Fetcher configuration
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Base directory for the repository cache
    pub cache_dir: PathBuf,
    /// When true, never touch the network; uncached repos fail
    pub offline: bool,
}

impl FetchOptions {
    pub fn new(cache_dir: Option<PathBuf>, offline: bool) -> Self {
        Self {
            cache_dir: resolve_cache_dir(cache_dir),
            offline,
        }
    }
}

/// Git repository operations the pipeline needs
pub trait Fetcher {
    /// Clone or update a repository at the requested ref.
    ///
    /// Returns the local working tree path and the full commit id.
    /// Idempotent: repeated calls with the same arguments yield the same
    /// commit unless the remote has moved and offline mode is disabled.
    fn clone_or_update(&self, url: &RepoUrl, git_ref: Option<&str>) -> Result<(PathBuf, String)>;

    /// Non-mutating probe for an existing cache entry
    fn cached_path(&self, url: &RepoUrl, git_ref: Option<&str>) -> Option<PathBuf>;
}

/// Create a fetcher, honoring the `PROMPT_SYNC_GIT_BACKEND` override
/// (`exec` or `libgit2`).
pub fn new_fetcher(options: FetchOptions) -> Box<dyn Fetcher> {
    match std::env::var("PROMPT_SYNC_GIT_BACKEND").as_deref() {
        Ok("exec") => Box::new(exec::ExecFetcher::new(options)),
        _ => Box::new(libgit::LibGitFetcher::new(options)),
    }
}

/// Fetch one source, pairing the spec with its resolved checkout
pub fn fetch_source(fetcher: &dyn Fetcher, spec: &SourceSpec) -> Result<FetchedSource> {
    let (local_path, commit) = fetcher.clone_or_update(&spec.url, spec.git_ref.as_deref())?;
    Ok(FetchedSource {
        spec: spec.clone(),
        local_path,
        commit,
    })
}

/// Resolve the cache directory: explicit arg, `$PROMPT_SYNC_CACHE_DIR`,
/// then `~/.prompt-sync/repos`.
pub fn resolve_cache_dir(cache_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = cache_dir {
        return dir;
    }
    if let Ok(env_dir) = std::env::var("PROMPT_SYNC_CACHE_DIR") {
        if !env_dir.is_empty() {
            return PathBuf::from(env_dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".prompt-sync")
        .join("repos")
}

/// Deterministic cache entry path for a repository.
///
/// The directory name combines a readable `owner-repo` tail with the
/// first 12 hex chars of the canonical URL's sha256, so two distinct
/// URLs never collide while entries stay debuggable.
pub fn repo_cache_path(cache_dir: &Path, url: &RepoUrl) -> PathBuf {
    let canonical = url.canonical();
    let digest = Sha256::digest(canonical.as_bytes());
    let short_hash = format!("{digest:x}")[..12].to_string();

    let trimmed = canonical.trim_end_matches(".git");
    let parts: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    let name = if parts.len() >= 2 {
        format!("{}-{}", parts[parts.len() - 2], parts[parts.len() - 1])
    } else {
        trimmed.to_string()
    };
    let name = name.replace([':', '@'], "-");

    cache_dir.join(format!("{name}-{short_hash}"))
}

/// Advisory lock scoped to one cache repository directory.
///
/// Held for the duration of a clone/fetch/checkout; released on drop.
/// Readers (`cached_path`) do not take the lock and must tolerate a
/// stale but well-formed checkout.
pub struct CacheLock {
    file: std::fs::File,
}

impl CacheLock {
    pub fn acquire(entry_path: &Path) -> Result<Self> {
        let lock_path = lock_path_for(entry_path);
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| fs_err::write_failed(parent.display().to_string(), e.to_string()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| fs_err::write_failed(lock_path.display().to_string(), e.to_string()))?;
        file.lock_exclusive()
            .map_err(|e| fs_err::io_error(format!("lock {}: {e}", lock_path.display())))?;
        Ok(Self { file })
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn lock_path_for(entry_path: &Path) -> PathBuf {
    let name = entry_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "repo".to_string());
    entry_path.with_file_name(format!("{name}.lock"))
}
