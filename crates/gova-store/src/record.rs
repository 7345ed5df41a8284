//! Fetched records

use gova_resource::{Properties, Resource};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Row text used when a record holds none of its resource's attributes
pub const UNNAMED_ROW: &str = "Node";

/// One fetched node: an opaque property mapping keyed by attribute
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned node id, when the adapter exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    properties: Properties,
}

impl Record {
    /// Create record from properties
    #[inline]
    #[must_use]
    pub fn new(properties: Properties) -> Self {
        Self {
            id: None,
            properties,
        }
    }

    /// With store-assigned id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Store-assigned id
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// All properties
    #[inline]
    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Raw property value
    #[inline]
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.properties.get(attribute)
    }

    /// Property rendered as text; strings unquoted, nulls absent
    #[must_use]
    pub fn display_value(&self, attribute: &str) -> Option<String> {
        match self.properties.get(attribute)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Table text for this record
    ///
    /// The value of the first field of `resource` present on the record, or
    /// [`UNNAMED_ROW`].
    #[must_use]
    pub fn summary(&self, resource: &Resource) -> String {
        resource
            .attributes()
            .find_map(|attr| self.display_value(attr))
            .unwrap_or_else(|| UNNAMED_ROW.to_string())
    }
}

impl From<Properties> for Record {
    fn from(properties: Properties) -> Self {
        Self::new(properties)
    }
}
