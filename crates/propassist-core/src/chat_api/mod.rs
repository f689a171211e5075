//! Wire contract with the property chat backend.
//!
//! - `request`: `ChatRequest` and `ConversationHistoryEntry`
//! - `response`: `ChatResponse` decoding and read-model normalization

mod request;
mod response;

pub use request::{ChatRequest, ConversationHistoryEntry};
pub use response::{
    ChatResponse, NO_RESPONSE_FALLBACK, THINKING_END_MARKER, THINKING_START_MARKER, split_thinking,
};
