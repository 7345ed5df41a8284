//! Gova Admin - controller for a graph-database admin panel
//!
//! The crate ties the resource model (`gova-resource`) to a store adapter
//! (`gova-store`) and keeps the state a host renders: which resource is
//! selected, whether the list or the create form is shown, the last fetched
//! records and the last store error.
//!
//! # Example
//!
//! ```rust,no_run
//! use gova_core::prelude::*;
//! use gova_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), ControllerError> {
//! let config = AdminConfig::new();
//! let admin = AdminController::from_config(&config, Arc::new(MemoryStore::new()))?;
//! admin.start().wait().await??;
//!
//! admin.open_create_form()?;
//! admin.set_field("name", "Ada")?;
//! admin.set_field("email", "a@x.com")?;
//! admin.save().await?;
//!
//! admin.refresh().await?;
//! assert_eq!(admin.rows(), vec!["Ada".to_string()]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod tasks;
pub mod view;

pub use config::{AdminConfig, ConfigError, Rgba, Theme, WindowConfig};
pub use controller::{AdminController, FetchHandle, FetchOutcome, SaveHandle};
pub use error::ControllerError;
pub use state::{AdminState, ReportedError};
pub use tasks::{Operation, TaskHandle, TaskId, TaskKey, TaskRegistry};
pub use view::ViewMode;

/// Version of gova-core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        AdminConfig, AdminController, AdminState, ControllerError, FetchOutcome, Operation,
        ViewMode,
    };
    pub use gova_resource::{CreateForm, Label, Properties, Resource, ResourceRegistry};
    pub use gova_store::{GraphStore, Record, StoreError};
}
