//! Source references: repository URLs, refs, scopes
//!
//! A source is written as `<url>` or `<url>#<ref>`. URLs are compared by
//! canonical form so `https://github.com/org/repo.git` and
//! `github.com:org/repo` identify the same repository everywhere: trust
//! checks, the fetch cache, and lock file queries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, source};

/// Branch names that track a moving tip and therefore never pin a source
const UNPINNED_REFS: &[&str] = &["main", "master", "develop", "dev"];

/// An opaque, canonicalized reference to a git repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoUrl {
    raw: String,
    canonical: String,
}

impl RepoUrl {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let canonical = canonicalize(&raw);
        Self { raw, canonical }
    }

    /// The URL exactly as the user wrote it
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The canonical comparison form
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Whether this URL refers to a repository on the local filesystem
    pub fn is_local(&self) -> bool {
        self.raw.starts_with("file://") || std::path::Path::new(&self.raw).is_absolute()
    }

    /// A URL git itself can fetch from
    ///
    /// Shorthand forms like `github.com/org/repo` and the scp-like
    /// `github.com:org/repo` become https URLs; local paths, `git@` and
    /// scheme-qualified URLs pass through unchanged.
    pub fn fetch_url(&self) -> String {
        let raw = self.raw.as_str();
        if self.is_local() || raw.contains("://") || raw.starts_with("git@") {
            return raw.to_string();
        }
        if let Some((host, path)) = raw.split_once(':') {
            return format!("https://{host}/{path}");
        }
        format!("https://{raw}")
    }

    /// Human-readable repository name: the last path segment without `.git`
    pub fn repo_name(&self) -> String {
        let trimmed = self.canonical.trim_end_matches('/');
        let tail = trimmed
            .rsplit(['/', ':'])
            .next()
            .unwrap_or(trimmed)
            .trim_end_matches(".git");
        tail.to_string()
    }
}

impl fmt::Display for RepoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Normalize a git URL so semantically identical addresses compare equal.
///
/// Strips the `git@` / `https://` / `ssh://` transport prefixes, rewrites
/// the first `github.com/` to the scp-like `github.com:`, and trims a
/// trailing `.git`. `file://` URLs are left untouched.
fn canonicalize(url: &str) -> String {
    if url.starts_with("file://") {
        return url.to_string();
    }

    let mut u = url;
    for prefix in ["git@", "https://", "ssh://"] {
        if let Some(rest) = u.strip_prefix(prefix) {
            u = rest;
            break;
        }
    }

    let mut u = u.to_string();
    if let Some(rest) = u.strip_prefix("github.com/") {
        u = format!("github.com:{rest}");
    }
    u.trim_end_matches(".git").to_string()
}

/// A repository plus an optional ref (branch, tag, or commit id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub url: RepoUrl,
    pub git_ref: Option<String>,
}

impl SourceSpec {
    pub fn new(url: impl Into<String>, git_ref: Option<String>) -> Self {
        Self {
            url: RepoUrl::new(url),
            git_ref,
        }
    }

    /// Parse the textual `<url>[#<ref>]` form
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(source::parse_failed(input, "source cannot be empty"));
        }

        let (url, git_ref) = match input.split_once('#') {
            Some((_, r)) if r.is_empty() => {
                return Err(source::parse_failed(input, "ref after '#' is empty"));
            }
            Some((url, r)) => (url, Some(r.to_string())),
            None => (input, None),
        };

        if url.is_empty() {
            return Err(source::parse_failed(input, "repository URL is empty"));
        }

        Ok(Self::new(url, git_ref))
    }

    /// A source is pinned when its ref names a fixed version rather than a
    /// moving branch tip.
    pub fn is_pinned(&self) -> bool {
        match &self.git_ref {
            Some(r) => !UNPINNED_REFS.contains(&r.as_str()),
            None => false,
        }
    }

    /// Whether two specs refer to the same repository (ref ignored)
    pub fn same_repo(&self, other: &SourceSpec) -> bool {
        self.url.canonical() == other.url.canonical()
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.git_ref {
            Some(r) => write!(f, "{}#{}", self.url, r),
            None => write!(f, "{}", self.url),
        }
    }
}

/// Overlay scope, ordered by precedence (org lowest, personal highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Org,
    Project,
    Personal,
}

impl Scope {
    /// Numeric precedence rank; higher wins on output-path collisions
    pub fn rank(self) -> u8 {
        match self {
            Scope::Org => 0,
            Scope::Project => 1,
            Scope::Personal => 2,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Org => "org",
            Scope::Project => "project",
            Scope::Personal => "personal",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_https_equals_scp() {
        let a = RepoUrl::new("https://github.com/org/repo");
        let b = RepoUrl::new("github.com:org/repo");
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn test_canonical_strips_git_suffix() {
        let a = RepoUrl::new("https://github.com/org/repo.git");
        assert_eq!(a.canonical(), "github.com:org/repo");
    }

    #[test]
    fn test_canonical_strips_ssh_forms() {
        let a = RepoUrl::new("git@github.com:org/repo.git");
        let b = RepoUrl::new("ssh://github.com/org/repo");
        assert_eq!(a.canonical(), "github.com:org/repo");
        assert_eq!(b.canonical(), "github.com:org/repo");
    }

    #[test]
    fn test_canonical_file_url_untouched() {
        let a = RepoUrl::new("file:///tmp/repo.git");
        assert_eq!(a.canonical(), "file:///tmp/repo.git");
    }

    #[test]
    fn test_canonical_other_host_keeps_slash() {
        let a = RepoUrl::new("https://gitlab.com/org/repo.git");
        assert_eq!(a.canonical(), "gitlab.com/org/repo");
    }

    #[test]
    fn test_fetch_url_forms() {
        assert_eq!(
            RepoUrl::new("github.com/org/repo").fetch_url(),
            "https://github.com/org/repo"
        );
        assert_eq!(
            RepoUrl::new("github.com:org/repo").fetch_url(),
            "https://github.com/org/repo"
        );
        assert_eq!(RepoUrl::new("/tmp/repo").fetch_url(), "/tmp/repo");
        assert_eq!(
            RepoUrl::new("git@github.com:org/repo.git").fetch_url(),
            "git@github.com:org/repo.git"
        );
        assert_eq!(
            RepoUrl::new("https://gitlab.com/org/repo").fetch_url(),
            "https://gitlab.com/org/repo"
        );
    }

    #[test]
    fn test_repo_name() {
        assert_eq!(RepoUrl::new("github.com/org/MyPrompts").repo_name(), "MyPrompts");
        assert_eq!(RepoUrl::new("github.com:org/repo.git").repo_name(), "repo");
        assert_eq!(RepoUrl::new("/tmp/packs/company-prompts").repo_name(), "company-prompts");
    }

    #[test]
    fn test_parse_with_ref() {
        let spec = SourceSpec::parse("github.com/org/repo#v1.0.0").unwrap();
        assert_eq!(spec.url.raw(), "github.com/org/repo");
        assert_eq!(spec.git_ref.as_deref(), Some("v1.0.0"));
        assert_eq!(spec.to_string(), "github.com/org/repo#v1.0.0");
    }

    #[test]
    fn test_parse_without_ref() {
        let spec = SourceSpec::parse("github.com/org/repo").unwrap();
        assert_eq!(spec.git_ref, None);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(SourceSpec::parse("").is_err());
        assert!(SourceSpec::parse("github.com/org/repo#").is_err());
        assert!(SourceSpec::parse("#main").is_err());
    }

    #[test]
    fn test_pinning() {
        assert!(SourceSpec::parse("a.com/r#v1.0.0").unwrap().is_pinned());
        assert!(SourceSpec::parse("a.com/r#abc1234def").unwrap().is_pinned());
        assert!(!SourceSpec::parse("a.com/r#main").unwrap().is_pinned());
        assert!(!SourceSpec::parse("a.com/r#master").unwrap().is_pinned());
        assert!(!SourceSpec::parse("a.com/r#develop").unwrap().is_pinned());
        assert!(!SourceSpec::parse("a.com/r#dev").unwrap().is_pinned());
        assert!(!SourceSpec::parse("a.com/r").unwrap().is_pinned());
    }

    #[test]
    fn test_same_repo_ignores_ref_and_form() {
        let a = SourceSpec::parse("https://github.com/org/repo.git#v1").unwrap();
        let b = SourceSpec::parse("github.com:org/repo#main").unwrap();
        assert!(a.same_repo(&b));
    }

    #[test]
    fn test_scope_rank_order() {
        assert!(Scope::Personal.rank() > Scope::Project.rank());
        assert!(Scope::Project.rank() > Scope::Org.rank());
    }
}
