//! Cypher statements for the two store operations
//!
//! Only a [`Label`] is ever placed into query text, back-tick quoted. Every
//! other value travels as a parameter.

use gova_resource::{Label, Properties};
use serde_json::Value;
use std::collections::BTreeMap;

/// Query text plus its parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Cypher text
    pub text: String,
    /// Named parameters
    pub params: BTreeMap<String, Value>,
}

impl Statement {
    /// Statement with no parameters
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter
    #[inline]
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Up to `limit` nodes with `label`, bound as `n`
#[must_use]
pub fn fetch_list(label: &Label, limit: usize) -> Statement {
    Statement::new(format!("MATCH (n:{}) RETURN n LIMIT $limit", label.quoted()))
        .param("limit", limit)
}

/// One new node with `label` whose properties are exactly `properties`
#[must_use]
pub fn create_record(label: &Label, properties: &Properties) -> Statement {
    let props: serde_json::Map<String, Value> = properties
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Statement::new(format!("CREATE (n:{}) SET n = $props", label.quoted()))
        .param("props", Value::Object(props))
}

/// Connectivity probe run once at startup
#[must_use]
pub fn ping() -> Statement {
    Statement::new("RETURN 1")
}
