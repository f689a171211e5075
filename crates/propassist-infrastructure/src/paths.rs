//! Path management for propassist configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/propassist/        # Config directory (platform config dir)
//! └── config.toml              # Client configuration
//! ```

use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "propassist";
const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur during path resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The platform config directory could not be determined.
    #[error("Cannot find the user configuration directory")]
    ConfigDirNotFound,
}

pub struct PropAssistPaths;

impl PropAssistPaths {
    /// Returns the propassist configuration directory (e.g. `~/.config/propassist/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
