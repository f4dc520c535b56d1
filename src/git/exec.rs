//! Fetcher backend shelling out to the system git binary
//!
//! Useful for very large repositories and for environments where the
//! system git carries credential helpers libgit2 cannot reach. Semantics
//! match the libgit2 backend; only the transport differs.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, git as git_err};
use crate::source::RepoUrl;

use super::{CacheLock, FetchOptions, Fetcher, refs, repo_cache_path};

pub struct ExecFetcher {
    options: FetchOptions,
}

impl ExecFetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    fn ensure_cloned(&self, url: &RepoUrl, entry: &Path) -> Result<()> {
        if refs::is_repository(entry) {
            if !self.options.offline {
                // Advance local head refs as well; the checkout is detached
                // and ref resolution reads local branches first
                let _ = run_git(
                    Some(entry),
                    &[
                        "fetch",
                        "--update-head-ok",
                        "--tags",
                        "origin",
                        "+refs/heads/*:refs/heads/*",
                    ],
                );
            }
            return Ok(());
        }

        if self.options.offline {
            return Err(git_err::offline_miss(url.raw()));
        }

        std::fs::create_dir_all(&self.options.cache_dir).map_err(|e| {
            crate::error::fs::write_failed(
                self.options.cache_dir.display().to_string(),
                e.to_string(),
            )
        })?;

        let fetch_url = url.fetch_url();
        let target = entry.to_string_lossy().to_string();
        if let Err(reason) = run_git(None, &["clone", fetch_url.as_str(), target.as_str()]) {
            let _ = std::fs::remove_dir_all(entry);
            return Err(git_err::fetch_failed(url.raw(), reason));
        }
        let _ = run_git(Some(entry), &["fetch", "--tags"]);
        Ok(())
    }

    fn checkout(&self, url: &RepoUrl, entry: &Path, git_ref: Option<&str>) -> Result<()> {
        let Some(r) = git_ref else {
            // Fresh clones already sit on the default branch; cached
            // entries may be detached at an older commit.
            if let Ok(head) = run_git(Some(entry), &["symbolic-ref", "--short", "refs/remotes/origin/HEAD"])
            {
                let _ = run_git(Some(entry), &["checkout", "--detach", head.trim()]);
            }
            return Ok(());
        };

        if run_git(Some(entry), &["checkout", "--detach", r]).is_ok() {
            return Ok(());
        }
        if !self.options.offline {
            let _ = run_git(Some(entry), &["fetch", "origin", r]);
            if run_git(Some(entry), &["checkout", "--detach", r]).is_ok() {
                return Ok(());
            }
        }
        Err(git_err::ref_not_found(r, url.raw()))
    }
}

impl Fetcher for ExecFetcher {
    fn clone_or_update(&self, url: &RepoUrl, git_ref: Option<&str>) -> Result<(PathBuf, String)> {
        let entry = repo_cache_path(&self.options.cache_dir, url);
        let _lock = CacheLock::acquire(&entry)?;

        self.ensure_cloned(url, &entry)?;
        self.checkout(url, &entry, git_ref)?;

        let commit = run_git(Some(&entry), &["rev-parse", "HEAD"])
            .map_err(|reason| git_err::corrupt_cache(entry.display().to_string(), reason))?;
        Ok((entry, commit.trim().to_string()))
    }

    fn cached_path(&self, url: &RepoUrl, _git_ref: Option<&str>) -> Option<PathBuf> {
        let entry = repo_cache_path(&self.options.cache_dir, url);
        refs::is_repository(&entry).then_some(entry)
    }
}

/// Run a git command, returning trimmed stdout or the stderr text
fn run_git(dir: Option<&Path>, args: &[&str]) -> std::result::Result<String, String> {
    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    let output = cmd
        .output()
        .map_err(|e| format!("git {}: {e}", args.join(" ")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("git {}: {}", args.join(" "), stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
