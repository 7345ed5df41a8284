//! Field definitions and editable field instances
//!
//! A [`FieldDef`] is the static half: label, storage attribute and kind.
//! A [`Field`] is one editable instance of it, created per create-form session.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Property mapping written to or read from the store, keyed by attribute
pub type Properties = BTreeMap<String, Value>;

/// Closed set of field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text, stored as a string
    #[default]
    Text,
    /// Numeric input, stored as a number when the text parses as one
    Number,
    /// One of a fixed list of options, stored as a string
    Select,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Select => "select",
        })
    }
}

/// Static field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    label: String,
    attribute: String,
    #[serde(default)]
    kind: FieldKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
}

impl FieldDef {
    /// Text field definition
    #[inline]
    #[must_use]
    pub fn text(label: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            attribute: attribute.into(),
            kind: FieldKind::Text,
            options: Vec::new(),
        }
    }

    /// Number field definition
    #[inline]
    #[must_use]
    pub fn number(label: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Number,
            ..Self::text(label, attribute)
        }
    }

    /// Select field definition
    #[must_use]
    pub fn select<I, S>(label: impl Into<String>, attribute: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: FieldKind::Select,
            options: options.into_iter().map(Into::into).collect(),
            ..Self::text(label, attribute)
        }
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.label
    }

    /// Storage attribute key
    #[inline]
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Field kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Options offered by a select field (empty for other kinds)
    #[inline]
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Create a blank editable instance
    #[inline]
    #[must_use]
    pub fn instantiate(&self) -> Field {
        Field {
            def: self.clone(),
            value: String::new(),
        }
    }
}

/// Editable field instance
///
/// Accepts any text, empty included. Nothing is validated here or at save time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    def: FieldDef,
    value: String,
}

impl Field {
    /// Display label
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.def.name()
    }

    /// Storage attribute key
    #[inline]
    #[must_use]
    pub fn attribute(&self) -> &str {
        self.def.attribute()
    }

    /// Field kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.def.kind()
    }

    /// Definition this instance was created from
    #[inline]
    #[must_use]
    pub fn definition(&self) -> &FieldDef {
        &self.def
    }

    /// Current content
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Overwrite the content
    #[inline]
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.value = text.into();
    }

    /// Reset to blank
    #[inline]
    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Store value for the current content
    ///
    /// Number fields become JSON numbers when the text parses; anything else
    /// is kept as the raw string.
    #[must_use]
    pub fn property_value(&self) -> Value {
        match self.def.kind {
            FieldKind::Text | FieldKind::Select => Value::String(self.value.clone()),
            FieldKind::Number => parse_number(&self.value)
                .unwrap_or_else(|| Value::String(self.value.clone())),
        }
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::from(int));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}
