//! Lock file error constructors

use super::PromptSyncError;

/// Creates a lock parse error
pub fn parse_failed(reason: impl Into<String>) -> PromptSyncError {
    PromptSyncError::LockParse {
        reason: reason.into(),
    }
}

/// Creates a lock write error
pub fn write_failed(reason: impl Into<String>) -> PromptSyncError {
    PromptSyncError::LockWrite {
        reason: reason.into(),
    }
}

/// Creates a lock-missing error
pub fn missing() -> PromptSyncError {
    PromptSyncError::LockMissing
}
