//! Application state read by the host

use crate::tasks::Operation;
use crate::view::ViewMode;
use chrono::{DateTime, Utc};
use gova_resource::{CreateForm, Label};
use gova_store::{Record, StoreError};
use std::sync::Arc;

/// Store failure kept for display
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedError {
    /// Operation that failed
    pub operation: Operation,
    /// Resource it ran against
    pub resource: Label,
    /// What the store said
    pub error: StoreError,
    /// When it was recorded
    pub at: DateTime<Utc>,
}

impl ReportedError {
    /// Record a failure now
    #[inline]
    #[must_use]
    pub fn new(operation: Operation, resource: Label, error: StoreError) -> Self {
        Self {
            operation,
            resource,
            error,
            at: Utc::now(),
        }
    }
}

/// Snapshot of everything the host renders
///
/// `records` is swapped as a whole on every committed fetch, so a snapshot
/// always holds one complete result set.
#[derive(Debug, Clone)]
pub struct AdminState {
    /// Selected resource; always a registry member
    pub current: Label,
    /// Current view
    pub view: ViewMode,
    /// Last committed fetch result
    pub records: Arc<[Record]>,
    /// Resource `records` belongs to; `None` before the first fetch after a selection
    pub records_for: Option<Label>,
    /// When `records` was committed
    pub fetched_at: Option<DateTime<Utc>>,
    /// A fetch for `current` is in flight
    pub loading: bool,
    /// A save is in flight
    pub saving: bool,
    /// Most recent store failure, cleared by the next success of the same operation
    pub last_error: Option<ReportedError>,
    /// Open create form, present only in [`ViewMode::Create`]
    pub form: Option<CreateForm>,
    /// Number of create forms opened so far; identifies the open one
    pub form_session: u64,
}

impl AdminState {
    /// Initial state with `current` selected and nothing fetched
    #[must_use]
    pub fn new(current: Label) -> Self {
        Self {
            current,
            view: ViewMode::List,
            records: Arc::from(Vec::new()),
            records_for: None,
            fetched_at: None,
            loading: false,
            saving: false,
            last_error: None,
            form: None,
            form_session: 0,
        }
    }

    /// Records of the selected resource, empty while none are committed
    #[must_use]
    pub fn current_records(&self) -> &[Record] {
        if self.records_for.as_ref() == Some(&self.current) {
            &self.records
        } else {
            &[]
        }
    }

    /// Error of `operation`, if the last failure was one
    #[must_use]
    pub fn error_for(&self, operation: Operation) -> Option<&ReportedError> {
        self.last_error.as_ref().filter(|e| e.operation == operation)
    }

    pub(crate) fn clear_error(&mut self, operation: Operation) {
        if self.error_for(operation).is_some() {
            self.last_error = None;
        }
    }
}
