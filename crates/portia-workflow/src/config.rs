//! Editor configuration
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! base_url = "http://localhost:9001"
//!
//! [rename]
//! api_root = "api"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default backend address of the editor server
pub const DEFAULT_BASE_URL: &str = "http://localhost:9001";

/// Content type of the confirming request
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Settings for the rename endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Path prefix of the project API, relative to the base URL
    pub api_root: String,
    /// Content type sent with the request body
    pub content_type: String,
}

impl RenameConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With API root
    #[inline]
    #[must_use]
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    /// Relative URL of the rename endpoint for one spider
    #[must_use]
    pub fn rename_url(&self, project_id: &str, spider_id: &str) -> String {
        format!(
            "{}/projects/{project_id}/spiders/{spider_id}/rename",
            self.api_root.trim_end_matches('/')
        )
    }
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            api_root: "api".to_owned(),
            content_type: JSON_CONTENT_TYPE.to_owned(),
        }
    }
}

/// Top-level editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Editor server address
    pub base_url: String,
    /// Rename endpoint settings
    pub rename: RenameConfig,
}

impl EditorConfig {
    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on malformed TOML or wrong value types
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_owned(),
            source,
        })
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns `ConfigError::Read` if the file cannot be read, or
    /// `ConfigError::Parse` if it is not valid configuration
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded editor config");
        Ok(config)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            rename: RenameConfig::default(),
        }
    }
}
