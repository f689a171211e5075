//! Configuration service implementation.
//!
//! Resolves the client configuration from, highest priority first:
//! explicit overrides (CLI flags, then environment), the config file
//! (`~/.config/propassist/config.toml` unless another path is given), and
//! built-in defaults.

use crate::dto::ConfigFileV1;
use crate::paths::PropAssistPaths;
use propassist_core::config::ClientConfig;
use propassist_core::error::{PropAssistError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the backend base URL.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";
/// Environment variable overriding the property id.
pub const PROPERTY_ID_ENV: &str = "PROPERTY_ID";

/// Backend location values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub property_id: Option<String>,
}

impl ConfigOverrides {
    /// Reads `API_BASE_URL` and `PROPERTY_ID` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds overrides from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            api_base_url: read(API_BASE_URL_ENV),
            property_id: read(PROPERTY_ID_ENV),
        }
    }

    /// Keeps every value already set on `self`, filling gaps from `lower`.
    pub fn or(self, lower: ConfigOverrides) -> Self {
        Self {
            api_base_url: self.api_base_url.or(lower.api_base_url),
            property_id: self.property_id.or(lower.property_id),
        }
    }

    fn apply_to(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.api_base_url {
            config.backend.api_base_url = url.clone();
        }
        if let Some(property_id) = &self.property_id {
            config.backend.property_id = property_id.clone();
        }
    }
}

/// Loads [`ClientConfig`] from a config file plus overrides.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// A required file that is missing is an error rather than defaults.
    required: bool,
}

impl ConfigService {
    /// Uses an explicitly chosen file, which must exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            required: true,
        }
    }

    /// Uses a file that may be absent.
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            required: false,
        }
    }

    /// Uses the default location, falling back to defaults only when the
    /// platform has no config directory.
    pub fn discover() -> Self {
        match PropAssistPaths::config_file() {
            Ok(path) => Self::optional(path),
            Err(err) => {
                tracing::warn!(error = %err, "No config directory; using built-in defaults");
                Self {
                    path: None,
                    required: false,
                }
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reads and parses the config file. `Ok(None)` when there is no file to read.
    pub fn load_file(&self) -> Result<Option<ConfigFileV1>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };

        if !path.exists() {
            if self.required {
                return Err(PropAssistError::config(format!(
                    "Config file not found at {}",
                    path.display()
                )));
            }
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|err| {
            PropAssistError::config(format!(
                "Failed to read config file at {}: {err}",
                path.display()
            ))
        })?;
        let file = ConfigFileV1::parse(&content).map_err(|err| {
            PropAssistError::config(format!(
                "Failed to parse config file at {}: {err}",
                path.display()
            ))
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(Some(file))
    }

    /// Resolves the full client configuration.
    pub fn load(&self, overrides: &ConfigOverrides) -> Result<ClientConfig> {
        let mut config = ClientConfig::default();
        if let Some(file) = self.load_file()? {
            file.apply_to(&mut config)?;
        }
        overrides.apply_to(&mut config);

        tracing::info!(
            api_base_url = %config.backend.api_base_url,
            property_id = %config.backend.property_id,
            "Resolved client configuration"
        );
        Ok(config)
    }
}
