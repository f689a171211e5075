pub mod chat_api;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod knowledge_source;
pub mod message;
pub mod state;

// Re-export common error types
pub use error::{ChatTurnError, PropAssistError};
