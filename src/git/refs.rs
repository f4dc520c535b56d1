//! Git reference resolution
//!
//! Resolves refs to commits inside an open repository, and probes remote
//! heads with `git ls-remote` without cloning (used by update planning).

use std::path::Path;
use std::process::Command;

use git2::Repository;

use crate::error::{Result, git as git_err};
use crate::source::RepoUrl;

/// Resolve a ref name to a commit, trying in order: tag, local branch,
/// remote-tracking branch, then commit id (full or prefix).
pub fn resolve_commit<'r>(repo: &'r Repository, git_ref: &str) -> Option<git2::Commit<'r>> {
    let candidates = [
        format!("refs/tags/{git_ref}"),
        format!("refs/heads/{git_ref}"),
        format!("refs/remotes/origin/{git_ref}"),
    ];
    for candidate in &candidates {
        if let Ok(reference) = repo.find_reference(candidate) {
            if let Ok(commit) = reference.peel_to_commit() {
                return Some(commit);
            }
        }
    }

    if let Ok(obj) = repo.revparse_single(git_ref) {
        if let Ok(commit) = obj.peel_to_commit() {
            return Some(commit);
        }
    }

    None
}

/// Resolve the default branch head of a repository.
///
/// Prefers the remote HEAD, then the conventional branch names, then
/// whatever HEAD points at (covers freshly cloned repositories).
pub fn resolve_default<'r>(repo: &'r Repository) -> Option<git2::Commit<'r>> {
    let candidates = [
        "refs/remotes/origin/HEAD",
        "refs/remotes/origin/main",
        "refs/remotes/origin/master",
        "refs/heads/main",
        "refs/heads/master",
    ];
    for candidate in &candidates {
        if let Ok(reference) = repo.find_reference(candidate) {
            if let Ok(commit) = reference.peel_to_commit() {
                return Some(commit);
            }
        }
    }
    repo.head().ok()?.peel_to_commit().ok()
}

/// Probe a remote ref head via `git ls-remote` without cloning.
///
/// Local URLs are rejected so callers fall back to the cache-backed
/// fetcher; the same applies when the git CLI is unavailable. The ref
/// defaults to `HEAD` when absent.
pub fn ls_remote(url: &RepoUrl, git_ref: Option<&str>) -> Result<String> {
    let ref_arg = git_ref.unwrap_or("HEAD");
    if url.is_local() {
        return Err(git_err::ref_not_found(ref_arg, url.raw()));
    }

    let fetch_url = url.fetch_url();
    let output = Command::new("git")
        .args(["ls-remote", "--exit-code", fetch_url.as_str(), ref_arg])
        .output()
        .map_err(|e| git_err::fetch_failed(url.raw(), format!("git ls-remote failed: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(git_err::ref_not_found(
            ref_arg,
            format!("{} ({})", url.raw(), stderr.trim()),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_ls_remote_line(&stdout)
        .ok_or_else(|| git_err::fetch_failed(url.raw(), "could not parse ls-remote output"))
}

fn parse_ls_remote_line(stdout: &str) -> Option<String> {
    let sha = stdout.lines().next()?.split_whitespace().next()?;
    if sha.len() == 40 && sha.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(sha.to_string())
    } else {
        None
    }
}

/// Whether a path contains a git repository (cache probe helper)
pub fn is_repository(path: &Path) -> bool {
    path.join(".git").exists()
}
