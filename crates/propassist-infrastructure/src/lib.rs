//! Configuration discovery and loading for the Property Assistant client.

pub mod config_service;
pub mod dto;
pub mod paths;

pub use crate::config_service::{ConfigOverrides, ConfigService};
pub use crate::paths::{PathError, PropAssistPaths};
