//! Admin configuration
//!
//! Everything the controller and host need at startup: store connection,
//! fetch limit, theme, window geometry and the resource registry. Loaded from
//! TOML and then overridden from the environment.

use gova_resource::{Resource, ResourceError, ResourceRegistry};
use gova_store::{Neo4jSettings, DEFAULT_FETCH_LIMIT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable overriding the store URI
pub const ENV_URI: &str = "GOVA_NEO4J_URI";
/// Environment variable overriding the store user
pub const ENV_USER: &str = "GOVA_NEO4J_USER";
/// Environment variable overriding the store password
pub const ENV_PASSWORD: &str = "GOVA_NEO4J_PASSWORD";
/// Environment variable overriding the fetch limit
pub const ENV_FETCH_LIMIT: &str = "GOVA_FETCH_LIMIT";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Resource definitions are inconsistent
    #[error("invalid resource definition: {0}")]
    Resource(#[from] ResourceError),

    /// A value is out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level admin configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Store connection
    pub store: Neo4jSettings,
    /// Records fetched per list view
    pub fetch_limit: usize,
    /// Colors of the host UI
    pub theme: Theme,
    /// Host window geometry
    pub window: WindowConfig,
    /// Resource definitions; the built-in registry when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

impl AdminConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With fetch limit
    #[inline]
    #[must_use]
    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit;
        self
    }

    /// With store settings
    #[inline]
    #[must_use]
    pub fn with_store(mut self, store: Neo4jSettings) -> Self {
        self.store = store;
        self
    }

    /// With resource definitions
    #[inline]
    #[must_use]
    pub fn with_resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = resources;
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed input, or any [`AdminConfig::validate`] error
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as [`AdminConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Apply `GOVA_*` overrides from the process environment
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] if an override does not parse
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `GOVA_*` overrides from `lookup`
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] if an override does not parse
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup(ENV_URI) {
            self.store.uri = uri;
        }
        if let Some(user) = lookup(ENV_USER) {
            self.store.user = user;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.store.password = password;
        }
        if let Some(limit) = lookup(ENV_FETCH_LIMIT) {
            self.fetch_limit = limit.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{ENV_FETCH_LIMIT} must be a positive integer, got `{limit}`"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges and the resource definitions
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] or [`ConfigError::Resource`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_limit == 0 {
            return Err(ConfigError::Invalid("fetch_limit must be at least 1".into()));
        }
        if self.store.uri.trim().is_empty() {
            return Err(ConfigError::Invalid("store.uri must not be empty".into()));
        }
        self.registry()?;
        Ok(())
    }

    /// Resource registry described by this configuration
    ///
    /// # Errors
    /// [`ConfigError::Resource`] if two resources share a label
    pub fn registry(&self) -> Result<ResourceRegistry, ConfigError> {
        if self.resources.is_empty() {
            return Ok(ResourceRegistry::with_defaults());
        }
        Ok(ResourceRegistry::from_resources(self.resources.iter().cloned())?)
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            store: Neo4jSettings::default(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            theme: Theme::default(),
            window: WindowConfig::default(),
            resources: Vec::new(),
        }
    }
}

/// Host window geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Width in device-independent pixels
    pub width: u32,
    /// Height in device-independent pixels
    pub height: u32,
    /// Sidebar width
    pub sidebar_width: u32,
    /// Create-form card width
    pub form_width: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Gova Admin".to_string(),
            width: 1024,
            height: 768,
            sidebar_width: 250,
            form_width: 400,
        }
    }
}

/// Colors of the host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Page background
    pub background: Rgba,
    /// Sidebar background
    pub sidebar: Rgba,
    /// Sidebar text of unselected resources
    pub sidebar_text: Rgba,
    /// Card background
    pub card: Rgba,
    /// Buttons and the selected resource
    pub accent: Rgba,
    /// Body text
    pub text: Rgba,
    /// Card and input borders
    pub border: Rgba,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(243, 244, 246),
            sidebar: Rgba::rgb(30, 41, 59),
            sidebar_text: Rgba::rgb(200, 200, 200),
            card: Rgba::rgb(255, 255, 255),
            accent: Rgba::rgb(64, 153, 222),
            text: Rgba::rgb(55, 65, 81),
            border: Rgba::rgb(229, 231, 235),
        }
    }
}

/// 8-bit RGBA color, written as `#RRGGBB` or `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba {
    /// Opaque color
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl FromStr for Rgba {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::Invalid(format!("`{s}` is not a #RRGGBB or #RRGGBBAA color"));
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 255 },
        })
    }
}

impl TryFrom<String> for Rgba {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}
