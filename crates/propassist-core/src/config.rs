//! Resolved client configuration.

use crate::state::ChatSettings;
use std::time::Duration;

/// Local development backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PROPERTY_ID: &str = "default";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Where and how to reach the chat backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub api_base_url: String,
    pub property_id: String,
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            property_id: DEFAULT_PROPERTY_ID.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Backend location plus the initial operator settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub settings: ChatSettings,
}
