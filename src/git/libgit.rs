//! libgit2-backed fetcher (the default backend)

use std::path::PathBuf;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::Repository;

use crate::error::{Result, git as git_err};
use crate::source::RepoUrl;

use super::{CacheLock, FetchOptions, Fetcher, refs, repo_cache_path, url as git_url};

// Local head refs are updated too: the cache checkout is always detached,
// and ref resolution prefers local branches, so they must track the remote.
const FETCH_REFSPECS: [&str; 3] = [
    "+refs/heads/*:refs/heads/*",
    "+refs/heads/*:refs/remotes/origin/*",
    "+refs/tags/*:refs/tags/*",
];

pub struct LibGitFetcher {
    options: FetchOptions,
}

impl LibGitFetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    fn open_or_clone(&self, url: &RepoUrl, entry: &PathBuf) -> Result<Repository> {
        if refs::is_repository(entry) {
            let repo = Repository::open(entry).map_err(|e| {
                git_err::corrupt_cache(entry.display().to_string(), e.message().to_string())
            })?;
            if !self.options.offline {
                // Best effort: stale local refs still satisfy pinned sources
                let _ = fetch_origin(&repo);
            }
            return Ok(repo);
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

        let clone_url = git_url::to_clone_url(&url.fetch_url());
        match RepoBuilder::new().clone(&clone_url, entry) {
            Ok(repo) => {
                let _ = fetch_origin(&repo);
                Ok(repo)
            }
            Err(e) => {
                let _ = std::fs::remove_dir_all(entry);
                Err(git_err::fetch_failed(url.raw(), e.message().to_string()))
            }
        }
    }

    fn resolve_and_checkout(
        &self,
        repo: &Repository,
        url: &RepoUrl,
        git_ref: Option<&str>,
    ) -> Result<String> {
        let oid = match git_ref {
            Some(r) => {
                let commit = match refs::resolve_commit(repo, r) {
                    Some(c) => Some(c),
                    None if !self.options.offline => {
                        let _ = fetch_origin(repo);
                        refs::resolve_commit(repo, r)
                    }
                    None => None,
                };
                commit
                    .ok_or_else(|| git_err::ref_not_found(r, url.raw()))?
                    .id()
            }
            None => refs::resolve_default(repo)
                .ok_or_else(|| git_err::ref_not_found("HEAD", url.raw()))?
                .id(),
        };

        let object = repo
            .find_object(oid, None)
            .map_err(|e| git_err::corrupt_cache(url.raw(), e.message().to_string()))?;
        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        repo.checkout_tree(&object, Some(&mut checkout))
            .map_err(|e| git_err::corrupt_cache(url.raw(), e.message().to_string()))?;
        repo.set_head_detached(oid)
            .map_err(|e| git_err::corrupt_cache(url.raw(), e.message().to_string()))?;

        Ok(oid.to_string())
    }
}

impl Fetcher for LibGitFetcher {
    fn clone_or_update(&self, url: &RepoUrl, git_ref: Option<&str>) -> Result<(PathBuf, String)> {
        let entry = repo_cache_path(&self.options.cache_dir, url);
        let _lock = CacheLock::acquire(&entry)?;

        let repo = self.open_or_clone(url, &entry)?;
        let commit = self.resolve_and_checkout(&repo, url, git_ref)?;

        Ok((entry, commit))
    }

    fn cached_path(&self, url: &RepoUrl, _git_ref: Option<&str>) -> Option<PathBuf> {
        let entry = repo_cache_path(&self.options.cache_dir, url);
        refs::is_repository(&entry).then_some(entry)
    }
}

fn fetch_origin(repo: &Repository) -> std::result::Result<(), git2::Error> {
    let mut remote = repo.find_remote("origin")?;
    remote.fetch(&FETCH_REFSPECS, None, None)
}
