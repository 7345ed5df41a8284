//! View-mode state machine
//!
//! The admin panel is always in exactly one of two modes. `List` may be
//! re-entered (selecting a resource) or left for `Create`; `Create` only
//! returns to `List`, either after a successful save or on cancel.

use crate::error::ControllerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current view of the admin panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Table of fetched records for the current resource
    #[default]
    List,
    /// Blank create form for the current resource
    Create,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Create => "create",
        })
    }
}

/// Modes reachable from `from`
#[must_use]
pub fn allowed_transitions(from: ViewMode) -> &'static [ViewMode] {
    match from {
        ViewMode::List => &[ViewMode::List, ViewMode::Create],
        ViewMode::Create => &[ViewMode::List],
    }
}

/// Validates a view transition
///
/// # Errors
/// [`ControllerError::InvalidTransition`] if `to` is not reachable from `from`
pub fn validate_transition(from: ViewMode, to: ViewMode) -> Result<(), ControllerError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(ControllerError::InvalidTransition { from, to })
    }
}
