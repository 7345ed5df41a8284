//! The store adapter boundary

use crate::error::StoreError;
use crate::record::Record;
use async_trait::async_trait;
use gova_resource::{Label, Properties};

/// Fetch-list and create-record against a labelled graph store
///
/// Implementations must not reorder or rewrite submitted properties, and an
/// empty result is `Ok(vec![])`, never an error.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Up to `limit` records carrying `label`, in store default order
    ///
    /// # Errors
    /// Any [`StoreError`] raised by the backing store
    async fn fetch_list(&self, label: &Label, limit: usize) -> Result<Vec<Record>, StoreError>;

    /// Create one record carrying `label` with exactly `properties`
    ///
    /// # Errors
    /// Any [`StoreError`] raised by the backing store; nothing is retried
    async fn create_record(&self, label: &Label, properties: Properties)
        -> Result<(), StoreError>;
}
