//! Gova Resource - typed resource and field definitions
//!
//! A [`Resource`] names one node label of the backing graph store and the
//! ordered [`FieldDef`]s a create form shows for it. Everything here is plain
//! data; nothing talks to the store.
//!
//! - [`Label`]: validated store identifier, safe to interpolate into queries
//! - [`FieldDef`] / [`Field`]: static field definition and its editable instance
//! - [`ResourceRegistry`]: ordered set of resources known at startup
//! - [`CreateForm`]: one create-form session holding stable field instances
//!
//! # Example
//!
//! ```rust
//! use gova_resource::{CreateForm, ResourceRegistry};
//!
//! let registry = ResourceRegistry::with_defaults();
//! let user = registry.get("User").unwrap();
//!
//! let mut form = CreateForm::new(user);
//! form.set("name", "Ada").unwrap();
//! form.set("email", "a@x.com").unwrap();
//!
//! let props = form.properties();
//! assert_eq!(props["name"], "Ada");
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod field;
pub mod form;
pub mod label;
pub mod registry;
pub mod resource;

pub use error::ResourceError;
pub use field::{Field, FieldDef, FieldKind, Properties};
pub use form::CreateForm;
pub use label::Label;
pub use registry::ResourceRegistry;
pub use resource::Resource;

/// Common imports for working with resources
pub mod prelude {
    pub use crate::{
        CreateForm, Field, FieldDef, FieldKind, Label, Properties, Resource, ResourceError,
        ResourceRegistry,
    };
}
