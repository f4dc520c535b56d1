//! Fetcher error constructors

use super::PromptSyncError;

/// Creates a fetch/clone network error
pub fn fetch_failed(url: impl Into<String>, reason: impl Into<String>) -> PromptSyncError {
    PromptSyncError::FetchNetwork {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates a ref-not-found error
pub fn ref_not_found(git_ref: impl Into<String>, url: impl Into<String>) -> PromptSyncError {
    PromptSyncError::RefNotFound {
        git_ref: git_ref.into(),
        url: url.into(),
    }
}

/// Creates an offline cache-miss error
pub fn offline_miss(url: impl Into<String>) -> PromptSyncError {
    PromptSyncError::OfflineMiss { url: url.into() }
}

/// Creates a corrupt-cache error
pub fn corrupt_cache(path: impl Into<String>, reason: impl Into<String>) -> PromptSyncError {
    PromptSyncError::CorruptCache {
        path: path.into(),
        reason: reason.into(),
    }
}
