//! File system error constructors

use super::PromptSyncError;

/// Creates a file-not-found error
pub fn not_found(path: impl Into<String>) -> PromptSyncError {
    PromptSyncError::FileNotFound { path: path.into() }
}

/// Creates a file read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> PromptSyncError {
    PromptSyncError::FileRead {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> PromptSyncError {
    PromptSyncError::FileWrite {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a generic IO error
pub fn io_error(message: impl Into<String>) -> PromptSyncError {
    PromptSyncError::Io {
        message: message.into(),
    }
}
