//! Error types for resource definitions

/// Errors raised while defining resources or editing a create form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// Label is not a usable store identifier
    #[error("invalid label `{label}`: {reason}")]
    InvalidLabel {
        /// The rejected label
        label: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Resource declares no fields
    #[error("resource `{0}` declares no fields")]
    EmptyFields(String),

    /// Field with an empty attribute key
    #[error("resource `{0}` has a field with an empty attribute")]
    EmptyAttribute(String),

    /// Two fields share a storage attribute
    #[error("duplicate attribute `{attribute}` in resource `{resource}`")]
    DuplicateAttribute {
        /// Owning resource label
        resource: String,
        /// Repeated attribute key
        attribute: String,
    },

    /// Label registered twice
    #[error("resource `{0}` is already registered")]
    DuplicateResource(String),

    /// Attribute not declared by the resource
    #[error("unknown field `{attribute}` on resource `{resource}`")]
    UnknownField {
        /// Owning resource label
        resource: String,
        /// Requested attribute key
        attribute: String,
    },
}

impl ResourceError {
    /// Build an unknown-field error
    #[inline]
    pub fn unknown_field(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::UnknownField {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }
}
