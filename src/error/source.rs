//! Source parsing and trust error constructors

use super::PromptSyncError;

/// Creates a source parse error
pub fn parse_failed(input: impl Into<String>, reason: impl Into<String>) -> PromptSyncError {
    PromptSyncError::SourceParse {
        input: input.into(),
        reason: reason.into(),
    }
}

/// Creates an untrusted-source error
pub fn untrusted(url: impl Into<String>) -> PromptSyncError {
    PromptSyncError::UntrustedSource { url: url.into() }
}

/// Creates a duplicate-source error
pub fn duplicate(url: impl Into<String>) -> PromptSyncError {
    PromptSyncError::DuplicateSource { url: url.into() }
}

/// Creates a source-not-found error
pub fn not_found(url: impl Into<String>) -> PromptSyncError {
    PromptSyncError::SourceNotFound { url: url.into() }
}

/// Creates a pinned-source error
pub fn pinned(url: impl Into<String>) -> PromptSyncError {
    PromptSyncError::SourcePinned { url: url.into() }
}
