//! Resource definitions

use crate::error::ResourceError;
use crate::field::FieldDef;
use crate::label::Label;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A node type shown in the admin panel
///
/// Holds its label and an ordered, non-empty list of fields whose attribute
/// keys are pairwise distinct. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResourceSpec", into = "ResourceSpec")]
pub struct Resource {
    label: Label,
    fields: Vec<FieldDef>,
}

impl Resource {
    /// Build a resource, checking its field list
    ///
    /// # Errors
    /// - [`ResourceError::EmptyFields`] if `fields` is empty
    /// - [`ResourceError::EmptyAttribute`] if a field has an empty attribute
    /// - [`ResourceError::DuplicateAttribute`] if two fields share an attribute
    pub fn new(label: Label, fields: Vec<FieldDef>) -> Result<Self, ResourceError> {
        if fields.is_empty() {
            return Err(ResourceError::EmptyFields(label.to_string()));
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if field.attribute().is_empty() {
                return Err(ResourceError::EmptyAttribute(label.to_string()));
            }
            if !seen.insert(field.attribute()) {
                return Err(ResourceError::DuplicateAttribute {
                    resource: label.to_string(),
                    attribute: field.attribute().to_string(),
                });
            }
        }

        Ok(Self { label, fields })
    }

    /// The built-in `User` resource
    #[must_use]
    pub fn user() -> Self {
        Self {
            label: Label::trusted("User"),
            fields: vec![
                FieldDef::text("Full Name", "name"),
                FieldDef::text("Email Address", "email"),
            ],
        }
    }

    /// Node label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Field definitions, in display order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by attribute
    #[must_use]
    pub fn field(&self, attribute: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.attribute() == attribute)
    }

    /// Attribute keys, in display order
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDef::attribute)
    }
}

/// Serialized shape of a resource, as written in configuration files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Node label
    pub label: String,
    /// Field definitions
    pub fields: Vec<FieldDef>,
}

impl TryFrom<ResourceSpec> for Resource {
    type Error = ResourceError;

    fn try_from(spec: ResourceSpec) -> Result<Self, Self::Error> {
        Self::new(Label::new(spec.label)?, spec.fields)
    }
}

impl From<Resource> for ResourceSpec {
    fn from(resource: Resource) -> Self {
        Self {
            label: resource.label.into(),
            fields: resource.fields,
        }
    }
}
