//! Conflict and drift error constructors

use super::PromptSyncError;

/// Creates a duplicate output-path conflict error
pub fn duplicate(path: impl Into<String>, details: impl Into<String>) -> PromptSyncError {
    PromptSyncError::ConflictDuplicate {
        path: path.into(),
        details: details.into(),
    }
}

/// Creates a drift-detected error
pub fn drift(details: impl Into<String>) -> PromptSyncError {
    PromptSyncError::ConflictDrift {
        details: details.into(),
    }
}

/// Creates a missing-output error
pub fn missing(path: impl Into<String>) -> PromptSyncError {
    PromptSyncError::ConflictMissing { path: path.into() }
}
