//! Configuration error constructors

use super::PromptSyncError;

/// Creates a Promptsfile-not-found error from the searched locations
pub fn not_found(searched: impl Into<String>) -> PromptSyncError {
    PromptSyncError::ConfigNotFound {
        searched: searched.into(),
    }
}

/// Creates a configuration parse error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> PromptSyncError {
    PromptSyncError::ConfigParse {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a configuration read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> PromptSyncError {
    PromptSyncError::ConfigRead {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid-configuration error
pub fn invalid(message: impl Into<String>) -> PromptSyncError {
    PromptSyncError::ConfigInvalid {
        message: message.into(),
    }
}
