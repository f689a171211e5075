//! Chat message domain module.
//!
//! - `content`: structured content (`MessageContent`, `ContentPart`) and text extraction
//! - `model`: `ChatMessage` and `MessageRole`

mod content;
mod model;

pub use content::{ContentPart, MessageContent, extract_text_content};
pub use model::{ChatMessage, MessageRole};
