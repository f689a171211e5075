//! Chat runtime adapter: one backend exchange per submitted user turn.

use crate::backend::ChatBackend;
use async_trait::async_trait;
use propassist_core::chat_api::{ChatRequest, ChatResponse};
use propassist_core::error::ChatTurnError;
use propassist_core::message::ChatMessage;
use propassist_core::state::{ResponseState, SettingsHandle};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs a single chat turn.
///
/// `messages` is the whole thread so far and must end with the newly
/// submitted user message. The returned message is the assistant reply.
#[async_trait]
pub trait ChatModelAdapter: Send + Sync {
    async fn run(
        &self,
        messages: &[ChatMessage],
        cancel: &CancellationToken,
    ) -> Result<ChatMessage, ChatTurnError>;
}

/// Adapter for the property chat backend.
///
/// Reads the operator settings when a turn starts and, once a response is
/// decoded, overwrites the shared [`ResponseState`] with that turn's
/// read-models. Failed or cancelled turns leave the state untouched.
pub struct PropertyChatAdapter {
    backend: Arc<dyn ChatBackend>,
    settings: SettingsHandle,
    response_state: ResponseState,
}

impl PropertyChatAdapter {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        settings: SettingsHandle,
        response_state: ResponseState,
    ) -> Self {
        Self {
            backend,
            settings,
            response_state,
        }
    }

    pub fn response_state(&self) -> &ResponseState {
        &self.response_state
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }
}

#[async_trait]
impl ChatModelAdapter for PropertyChatAdapter {
    async fn run(
        &self,
        messages: &[ChatMessage],
        cancel: &CancellationToken,
    ) -> Result<ChatMessage, ChatTurnError> {
        let settings = self.settings.snapshot().await;
        let request = ChatRequest::from_messages(messages, &settings)?;
        tracing::info!(
            history_len = request.history.len(),
            knowledge_sources = ?request.knowledge_sources,
            exclude_web = request.exclude_web,
            chat_model = %request.chat_model,
            "Starting chat turn"
        );

        // Dropping the backend future on cancellation aborts the HTTP request.
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Chat turn cancelled before the backend answered");
                return Err(ChatTurnError::Cancelled);
            }
            result = self.backend.post_message(&request) => result?,
        };

        let response = ChatResponse::from_json_str(&body)?;
        let read_model = response.to_read_model();

        if cancel.is_cancelled() {
            tracing::info!("Discarding response of a cancelled chat turn");
            return Err(ChatTurnError::Cancelled);
        }
        self.response_state.replace(read_model);

        tracing::info!(
            sources = response.knowledge_source_details.as_ref().map_or(0, Vec::len),
            has_bias_evaluation = response.bias_evaluation.is_some(),
            has_guardrails = response.guardrails_evaluation.is_some(),
            "Chat turn completed"
        );
        Ok(ChatMessage::assistant(response.reply_text()))
    }
}
