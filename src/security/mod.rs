//! Trust enforcement for repository sources
//!
//! A repository may only be fetched when it is covered by the named trust
//! layer of the configuration. Matching is by canonical URL, exact or via
//! a trailing-`*` wildcard (prefix match), so organisations can approve a
//! whole namespace with one entry like `github.com:acme/*`.

use crate::config::Config;
use crate::error::{Result, source};
use crate::source::RepoUrl;

/// Returns an error unless `url` is covered by the trust layer or
/// `allow_unknown` is set.
pub fn ensure_trusted(url: &RepoUrl, config: &Config, allow_unknown: bool) -> Result<()> {
    if is_trusted(url, config) || allow_unknown {
        return Ok(());
    }
    Err(source::untrusted(url.raw()))
}

/// Whether a repository URL matches any trust entry
pub fn is_trusted(url: &RepoUrl, config: &Config) -> bool {
    let canon = url.canonical();
    config
        .trusted
        .iter()
        .any(|entry| matches_pattern(canon, RepoUrl::new(entry.repo.clone()).canonical()))
}

/// Exact match, or prefix match when the pattern ends in `*`
fn matches_pattern(canonical_url: &str, pattern: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => canonical_url.starts_with(prefix),
        None => canonical_url == pattern,
    }
}
