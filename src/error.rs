/*
 * Error types for the tab shell core. The core performs no I/O of its own, so
 * the taxonomy is narrow: lookups that miss, invalid configuration, and native
 * resources that could not be created. Collaborator failures (persistence,
 * request execution) have their own error enums next to their traits.
 *
 * Invariant violations are reported through `invariant_violation`, which logs
 * and fails loudly in debug builds while degrading to a no-op in release.
 */

use crate::collaborators::PersistenceError;
use crate::types::{PanelGroupId, TabId};

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("operation failed: {0}")]
    OperationFailed(String),
    #[error("invalid handle: {0}")]
    InvalidHandle(String),
    #[error("panel group {0:?} is not registered")]
    UnknownPanelGroup(PanelGroupId),
    #[error("panel group {0:?} is already registered")]
    DuplicatePanelGroup(PanelGroupId),
    #[error("tab {0:?} does not exist")]
    UnknownTab(TabId),
    #[error("could not create drawing resource: {0}")]
    ResourceCreation(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[cfg(target_os = "windows")]
    #[error("win32 error: {0}")]
    Win32(#[from] windows::core::Error),
}

pub type Result<T> = std::result::Result<T, ShellError>;

/*
 * Reports a programmer error. Debug builds panic so the bug surfaces in tests
 * and during development; release builds log and let the caller skip the
 * operation.
 */
#[track_caller]
pub(crate) fn invariant_violation(message: &str) {
    log::error!("[Invariant] {message}");
    debug_assert!(false, "invariant violation: {message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_their_subject() {
        let err = ShellError::UnknownPanelGroup(PanelGroupId::Settings);
        assert_eq!(err.to_string(), "panel group Settings is not registered");

        let err = ShellError::UnknownTab(TabId(7));
        assert!(err.to_string().contains("TabId(7)"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invariant violation")]
    fn invariant_violation_panics_in_debug_builds() {
        invariant_violation("activate on a missing tab");
    }
}
