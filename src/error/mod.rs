//! Error types and handling for Prompt-Sync
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`config`]: Configuration errors
//! - [`source`]: Source parsing and trust errors
//! - [`git`]: Fetcher errors
//! - [`adapter`]: Adapter errors
//! - [`conflict`]: Conflict and drift errors
//! - [`lock`]: Lock file errors
//! - [`fs`]: File system errors

#![allow(dead_code)]

pub mod adapter;
pub mod config;
pub mod conflict;
pub mod fs;
pub mod git;
pub mod lock;
pub mod source;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Prompt-Sync operations
#[derive(Error, Diagnostic, Debug)]
pub enum PromptSyncError {
    // Configuration errors
    #[error("Promptsfile not found (searched: {searched})")]
    #[diagnostic(
        code(prompt_sync::config::not_found),
        help("Run 'prompt-sync init' to create a Promptsfile")
    )]
    ConfigNotFound { searched: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(prompt_sync::config::parse_failed))]
    ConfigParse { path: String, reason: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(prompt_sync::config::read_failed))]
    ConfigRead { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(prompt_sync::config::invalid))]
    ConfigInvalid { message: String },

    // Source errors
    #[error("Failed to parse source '{input}': {reason}")]
    #[diagnostic(
        code(prompt_sync::source::parse_failed),
        help("Valid forms: host.com/owner/repo, host.com/owner/repo#ref, /local/path#ref")
    )]
    SourceParse { input: String, reason: String },

    #[error("untrusted source: {url}")]
    #[diagnostic(
        code(prompt_sync::source::untrusted),
        help(
            "Add the repository to your trusted sources (~/.prompt-sync/config.yaml) or pass --allow-unknown"
        )
    )]
    UntrustedSource { url: String },

    #[error("Source '{url}' is already present in Promptsfile")]
    #[diagnostic(code(prompt_sync::source::duplicate))]
    DuplicateSource { url: String },

    #[error("Source '{url}' not found in Promptsfile")]
    #[diagnostic(code(prompt_sync::source::not_found))]
    SourceNotFound { url: String },

    #[error("Source '{url}' is pinned to a specific version")]
    #[diagnostic(
        code(prompt_sync::source::pinned),
        help("Use --force to update a pinned source")
    )]
    SourcePinned { url: String },

    // Fetcher errors
    #[error("Failed to fetch repository {url}: {reason}")]
    #[diagnostic(
        code(prompt_sync::git::fetch_failed),
        help("Check that the URL is correct and you have access to the repository")
    )]
    FetchNetwork { url: String, reason: String },

    #[error("Ref '{git_ref}' not found in repository {url}")]
    #[diagnostic(code(prompt_sync::git::ref_not_found))]
    RefNotFound { git_ref: String, url: String },

    #[error("offline mode: repository {url} is not cached")]
    #[diagnostic(
        code(prompt_sync::git::offline_miss),
        help("Run once without --offline to populate the cache")
    )]
    OfflineMiss { url: String },

    #[error("Corrupt cache entry at {path}: {reason}")]
    #[diagnostic(
        code(prompt_sync::git::corrupt_cache),
        help("Delete the cache entry and re-run the command")
    )]
    CorruptCache { path: String, reason: String },

    // Adapter errors
    #[error("Adapter '{adapter}' failed to discover files: {reason}")]
    #[diagnostic(code(prompt_sync::adapter::discovery_failed))]
    AdapterDiscovery { adapter: String, reason: String },

    #[error("Adapter '{adapter}' failed to render {path}: {reason}")]
    #[diagnostic(code(prompt_sync::adapter::render_failed))]
    AdapterRender {
        adapter: String,
        path: String,
        reason: String,
    },

    // Conflict errors
    #[error("conflict: duplicate output path {path}: {details}")]
    #[diagnostic(
        code(prompt_sync::conflict::duplicate),
        help("Rename one of the colliding files in its source repository")
    )]
    ConflictDuplicate { path: String, details: String },

    #[error("drift detected: {details}")]
    #[diagnostic(
        code(prompt_sync::conflict::drift),
        help("Run 'prompt-sync install' to restore the rendered files")
    )]
    ConflictDrift { details: String },

    #[error("rendered file missing: {path}")]
    #[diagnostic(code(prompt_sync::conflict::missing))]
    ConflictMissing { path: String },

    // Lock file errors
    #[error("Failed to parse lock file: {reason}")]
    #[diagnostic(code(prompt_sync::lock::parse_failed))]
    LockParse { reason: String },

    #[error("Failed to write lock file: {reason}")]
    #[diagnostic(code(prompt_sync::lock::write_failed))]
    LockWrite { reason: String },

    #[error("lock file not found, run install first")]
    #[diagnostic(
        code(prompt_sync::lock::missing),
        help("Run 'prompt-sync install' to generate Promptsfile.lock")
    )]
    LockMissing,

    // Ignore block errors
    #[error("Managed ignore block is malformed in {path}")]
    #[diagnostic(
        code(prompt_sync::ignore::corrupt),
        help("Remove the stray marker lines from the file and re-run install")
    )]
    IgnoreBlockCorrupt { path: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(prompt_sync::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(prompt_sync::fs::read_failed))]
    FileRead { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(prompt_sync::fs::write_failed))]
    FileWrite { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(prompt_sync::fs::io_error))]
    Io { message: String },
}

impl From<std::io::Error> for PromptSyncError {
    fn from(err: std::io::Error) -> Self {
        PromptSyncError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for PromptSyncError {
    fn from(err: serde_yaml::Error) -> Self {
        PromptSyncError::ConfigParse {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for PromptSyncError {
    fn from(err: git2::Error) -> Self {
        PromptSyncError::Io {
            message: err.message().to_string(),
        }
    }
}

/// Result type alias for Prompt-Sync operations
pub type Result<T> = miette::Result<T, PromptSyncError>;
