//! Validated node labels
//!
//! Labels are the only piece of a query that is interpolated into query text,
//! so a [`Label`] can only hold a plain identifier.

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Maximum accepted label length
pub const MAX_LABEL_LEN: usize = 64;

/// A node label that is a valid query identifier
///
/// Accepted form: `[A-Za-z_][A-Za-z0-9_]*`, at most [`MAX_LABEL_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Validate and wrap a label
    ///
    /// # Errors
    /// Returns [`ResourceError::InvalidLabel`] if the text is not a plain identifier
    pub fn new(label: impl Into<String>) -> Result<Self, ResourceError> {
        let label = label.into();
        check_identifier(&label).map_err(|reason| ResourceError::InvalidLabel {
            label: label.clone(),
            reason,
        })?;
        Ok(Self(label))
    }

    /// Wrap a compiled-in label without returning a `Result`
    pub(crate) fn trusted(label: &'static str) -> Self {
        debug_assert!(check_identifier(label).is_ok(), "invalid built-in label {label}");
        Self(label.to_string())
    }

    /// Label text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Back-tick quoted form for query text
    #[inline]
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("`{}`", self.0)
    }
}

fn check_identifier(s: &str) -> Result<(), &'static str> {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return Err("label is empty");
    };
    if s.len() > MAX_LABEL_LEN {
        return Err("label is too long");
    }
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err("label must start with a letter or underscore");
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("label may only contain letters, digits and underscores");
    }
    Ok(())
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Label {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Label {
    type Error = ResourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}
