//! Outbound request envelope.

use crate::error::ChatTurnError;
use crate::message::{ChatMessage, MessageRole};
use crate::state::ChatSettings;
use serde::{Deserialize, Serialize};

/// One prior message as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistoryEntry {
    pub content: String,
    pub is_user: bool,
}

impl From<&ChatMessage> for ConversationHistoryEntry {
    fn from(message: &ChatMessage) -> Self {
        Self {
            content: message.text(),
            is_user: message.is_user(),
        }
    }
}

/// Body of `POST /chat/property/{id}/message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ConversationHistoryEntry>,
    pub chat_model: String,
    pub chat_system_prompt: String,
    pub selection_model: String,
    pub selection_system_prompt: String,
    pub search_model: String,
    pub search_system_prompt: String,
    pub refinement_model: String,
    pub refinement_system_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_evaluation_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_evaluation_system_prompt: Option<String>,
    pub knowledge_sources: Vec<String>,
    pub exclude_web: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_full_text: Option<bool>,
}

impl ChatRequest {
    /// Builds the request for a turn from the thread so far and the current settings.
    ///
    /// `messages` must end with the newly submitted user message; every
    /// earlier message becomes a history entry, in order.
    pub fn from_messages(
        messages: &[ChatMessage],
        settings: &ChatSettings,
    ) -> Result<Self, ChatTurnError> {
        let Some((latest, earlier)) = messages.split_last() else {
            return Err(ChatTurnError::InvariantViolation(
                "No user message found: the message list is empty".into(),
            ));
        };
        if latest.role != MessageRole::User {
            return Err(ChatTurnError::InvariantViolation(format!(
                "No user message found: last message has role {:?}",
                latest.role
            )));
        }

        let models = &settings.models;
        let (bias_evaluation_model, bias_evaluation_system_prompt) =
            if settings.bias_evaluation_enabled {
                (
                    Some(models.bias_evaluation.model.clone()),
                    Some(models.bias_evaluation.system_prompt.clone()),
                )
            } else {
                (None, None)
            };

        Ok(Self {
            message: latest.text(),
            history: earlier.iter().map(ConversationHistoryEntry::from).collect(),
            chat_model: models.chat.model.clone(),
            chat_system_prompt: models.chat.system_prompt.clone(),
            selection_model: models.selection.model.clone(),
            selection_system_prompt: models.selection.system_prompt.clone(),
            search_model: models.search.model.clone(),
            search_system_prompt: models.search.system_prompt.clone(),
            refinement_model: models.refinement.model.clone(),
            refinement_system_prompt: models.refinement.system_prompt.clone(),
            bias_evaluation_model,
            bias_evaluation_system_prompt,
            knowledge_sources: settings.knowledge_sources.to_request_list(),
            exclude_web: settings.web_search.exclude_web(),
            use_full_text: settings.use_full_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_source::KnowledgeSource;
    use crate::message::{ContentPart, MessageContent};
    use crate::state::DEFAULT_CHAT_MODEL;
    use serde_json::json;

    fn thread() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("What is the asking price?"),
            ChatMessage::assistant("$1.2M"),
            ChatMessage::new(
                MessageRole::User,
                MessageContent::Parts(vec![
                    ContentPart::Other(json!({ "type": "image", "image": "..." })),
                    ContentPart::text("And the cap rate?"),
                ]),
            ),
        ]
    }

    #[test]
    fn test_history_excludes_latest_and_keeps_order() {
        let request = ChatRequest::from_messages(&thread(), &ChatSettings::default()).unwrap();

        assert_eq!(request.message, "And the cap rate?");
        assert_eq!(
            request.history,
            vec![
                ConversationHistoryEntry {
                    content: "What is the asking price?".into(),
                    is_user: true
                },
                ConversationHistoryEntry {
                    content: "$1.2M".into(),
                    is_user: false
                },
            ]
        );
        assert_eq!(request.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(request.knowledge_sources, vec!["all".to_string()]);
        assert!(request.exclude_web);
    }

    #[test]
    fn test_last_message_must_be_user() {
        let mut messages = thread();
        messages.push(ChatMessage::assistant("12%"));
        let err = ChatRequest::from_messages(&messages, &ChatSettings::default()).unwrap_err();
        assert!(matches!(err, ChatTurnError::InvariantViolation(_)));

        let err = ChatRequest::from_messages(&[], &ChatSettings::default()).unwrap_err();
        assert!(matches!(err, ChatTurnError::InvariantViolation(_)));
    }

    #[test]
    fn test_concrete_sources_and_web_toggle() {
        let mut settings = ChatSettings::default();
        settings
            .knowledge_sources
            .set([KnowledgeSource::Zillow, KnowledgeSource::OfferingMemorandum])
            .unwrap();
        settings.web_search.set_include_web_search(true);

        let request = ChatRequest::from_messages(&thread(), &settings).unwrap();
        assert_eq!(
            request.knowledge_sources,
            vec!["zillow".to_string(), "offering_memorandum".to_string()]
        );
        assert!(!request.exclude_web);
    }

    #[test]
    fn test_optional_fields_are_omitted_when_unset() {
        let settings = ChatSettings {
            bias_evaluation_enabled: false,
            ..ChatSettings::default()
        };
        let request = ChatRequest::from_messages(&thread(), &settings).unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("bias_evaluation_model").is_none());
        assert!(value.get("bias_evaluation_system_prompt").is_none());
        assert!(value.get("use_full_text").is_none());
        assert_eq!(value["exclude_web"], json!(true));
    }

    #[test]
    fn test_request_json_round_trip() {
        let settings = ChatSettings {
            use_full_text: Some(true),
            ..ChatSettings::default()
        };
        let request = ChatRequest::from_messages(&thread(), &settings).unwrap();
        let encoded = serde_json::to_string(&request).unwrap();
        let decoded: ChatRequest = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, request);
    }
}
