//! Gova Store - graph store adapters
//!
//! The [`GraphStore`] trait is the boundary between the admin controller and
//! the database. It has exactly two operations:
//! - [`GraphStore::fetch_list`]: up to `limit` nodes carrying a label
//! - [`GraphStore::create_record`]: one new node with a property map
//!
//! Two adapters ship with the crate:
//! - [`Neo4jStore`]: Bolt connection through `neo4rs`
//! - [`MemoryStore`]: in-process store for tests and offline demos
//!
//! # Example
//!
//! ```rust
//! use gova_resource::{Label, Properties};
//! use gova_store::{GraphStore, MemoryStore};
//!
//! # async fn example() -> Result<(), gova_store::StoreError> {
//! let store = MemoryStore::new();
//! let user = Label::new("User").unwrap();
//!
//! let mut props = Properties::new();
//! props.insert("name".to_string(), "Ada".into());
//! store.create_record(&user, props).await?;
//!
//! let rows = store.fetch_list(&user, 25).await?;
//! assert_eq!(rows.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod cypher;
pub mod error;
pub mod memory;
pub mod neo4j;
pub mod record;
pub mod store;

pub use cypher::Statement;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use neo4j::{Neo4jSettings, Neo4jStore};
pub use record::Record;
pub use store::GraphStore;

#[cfg(any(test, feature = "mock"))]
pub use store::MockGraphStore;

/// Default number of records fetched for a list view
pub const DEFAULT_FETCH_LIMIT: usize = 25;
