//! Adapter error constructors

use super::PromptSyncError;

/// Creates an adapter discovery error
pub fn discovery_failed(adapter: impl Into<String>, reason: impl Into<String>) -> PromptSyncError {
    PromptSyncError::AdapterDiscovery {
        adapter: adapter.into(),
        reason: reason.into(),
    }
}

/// Creates an adapter render error
pub fn render_failed(
    adapter: impl Into<String>,
    path: impl Into<String>,
    reason: impl Into<String>,
) -> PromptSyncError {
    PromptSyncError::AdapterRender {
        adapter: adapter.into(),
        path: path.into(),
        reason: reason.into(),
    }
}
