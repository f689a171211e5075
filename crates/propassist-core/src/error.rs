//! Error types for the Property Assistant client.

use thiserror::Error;

/// Shared error type for configuration, storage and input validation.
///
/// Turn failures have their own taxonomy in [`ChatTurnError`] because the
/// thread runtime reports them to the user differently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropAssistError {
    /// Configuration error (bad base URL, unreadable config file, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Operator input rejected by a settings store
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PropAssistError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is an invalid input error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<std::io::Error> for PropAssistError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PropAssistError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PropAssistError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PropAssistError>`.
pub type Result<T> = std::result::Result<T, PropAssistError>;

/// Placeholder used when a failed response body cannot be read.
pub const UNREADABLE_BODY: &str = "Unknown error";

/// Why a single chat turn did not produce an assistant reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatTurnError {
    /// The caller broke the turn contract (e.g. last message is not from the user).
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Transport failure or non-2xx response from the backend.
    ///
    /// `status` is `None` when no HTTP response was received at all.
    #[error("{}", backend_failure_message(.status, .body))]
    BackendRequestFailed { status: Option<u16>, body: String },

    /// The turn was aborted through its cancellation token.
    #[error("Turn cancelled")]
    Cancelled,

    /// The backend answered 2xx but the body is not a usable response.
    #[error("Failed to decode backend response: {0}")]
    ResponseDecodeError(String),
}

fn backend_failure_message(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(code) => format!("API request failed with status: {code} - {body}"),
        None => format!("API request failed: {body}"),
    }
}

impl ChatTurnError {
    /// Creates a BackendRequestFailed error for an HTTP status.
    pub fn backend(status: u16, body: impl Into<String>) -> Self {
        Self::BackendRequestFailed {
            status: Some(status),
            body: body.into(),
        }
    }

    /// Creates a BackendRequestFailed error for a request that never got a response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::BackendRequestFailed {
            status: None,
            body: message.into(),
        }
    }

    /// Creates a ResponseDecodeError
    pub fn decode(message: impl Into<String>) -> Self {
        Self::ResponseDecodeError(message.into())
    }

    /// Check if the turn was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// HTTP status carried by a backend failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BackendRequestFailed { status, .. } => *status,
            _ => None,
        }
    }
}
