//! Error types for the admin controller

use crate::view::ViewMode;
use gova_resource::{Label, ResourceError};
use gova_store::StoreError;

/// Main controller error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    /// Label is not in the registry
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Controller settings rejected
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Registry holds no resources
    #[error("resource registry is empty")]
    EmptyRegistry,

    /// View transition not allowed from the current mode
    #[error("cannot switch view from {from} to {to}")]
    InvalidTransition {
        /// Current mode
        from: ViewMode,
        /// Requested mode
        to: ViewMode,
    },

    /// Operation needs an open create form
    #[error("no create form is open")]
    NoOpenForm,

    /// A save for this resource is still running
    #[error("a save for {0} is already in progress")]
    SaveInProgress(Label),

    /// Form edit rejected
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Background task was aborted before finishing
    #[error("operation cancelled")]
    Cancelled,

    /// Background task panicked
    #[error("background task failed: {0}")]
    TaskFailed(String),
}

impl ControllerError {
    /// Check if the user can retry after this error
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Cancelled | Self::SaveInProgress(_) | Self::Resource(_)
        )
    }

    /// Underlying store error, if any
    #[inline]
    #[must_use]
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}
