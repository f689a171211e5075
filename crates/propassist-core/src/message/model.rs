//! Chat message types.

use super::content::{MessageContent, extract_text_content};
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
    /// System-generated message.
    System,
}

/// A single message in the chat thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// A user message with plain string content.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, MessageContent::Text(text.into()))
    }

    /// An assistant message whose content is exactly one text part.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, MessageContent::single_text(text))
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    /// Plain text of this message, see [`extract_text_content`].
    pub fn text(&self) -> String {
        extract_text_content(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ContentPart;
    use serde_json::json;

    #[test]
    fn test_assistant_message_has_single_text_part() {
        let message = ChatMessage::assistant("Hello");
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.content, MessageContent::Parts(vec![ContentPart::Text("Hello".into())]));
        assert_eq!(message.text(), "Hello");
    }

    #[test]
    fn test_message_deserializes_from_ui_shape() {
        let message: ChatMessage = serde_json::from_value(json!({
            "role": "user",
            "content": [{ "type": "text", "text": "What is the NOI?" }]
        }))
        .unwrap();
        assert!(message.is_user());
        assert_eq!(message.text(), "What is the NOI?");
    }
}
