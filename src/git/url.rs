//! URL normalization for libgit2
//!
//! libgit2 rejects some URL shapes git itself accepts: SCP-style SSH
//! addresses and under-slashed `file://` URLs. Normalize both before
//! handing a URL to the clone builder.

use std::borrow::Cow;

/// Rewrite an SCP-style `git@host:path` address to explicit `ssh://` form
pub fn to_ssh_url(url: &str) -> Cow<'_, str> {
    if !url.starts_with("git@") || url.starts_with("ssh://") {
        return Cow::Borrowed(url);
    }
    let Some((host, path)) = url.split_once(':') else {
        return Cow::Borrowed(url);
    };
    let path = path.strip_prefix('/').unwrap_or(path);
    Cow::Owned(format!("ssh://{host}/{path}"))
}

/// Ensure a `file://` URL carries an absolute path component
pub fn to_file_url(url: &str) -> Cow<'_, str> {
    let Some(after) = url.strip_prefix("file://") else {
        return Cow::Borrowed(url);
    };
    if after.is_empty() || after.starts_with('/') {
        return Cow::Borrowed(url);
    }
    Cow::Owned(format!("file:///{after}"))
}

/// Full normalization chain applied before cloning
pub fn to_clone_url(url: &str) -> String {
    let url = to_ssh_url(url);
    to_file_url(&url).into_owned()
}
