//! The chat thread: ordered entries plus the single in-flight turn.

use propassist_core::error::ChatTurnError;
use propassist_core::message::ChatMessage;
use propassist_interaction::ChatModelAdapter;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

/// One visible entry of the thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadEntry {
    User(ChatMessage),
    Assistant(ChatMessage),
    /// Display message of a failed turn. Never sent to the backend.
    Error(String),
}

impl ThreadEntry {
    fn as_message(&self) -> Option<&ChatMessage> {
        match self {
            Self::User(message) | Self::Assistant(message) => Some(message),
            Self::Error(_) => None,
        }
    }
}

/// Submissions the thread refuses before any request is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThreadError {
    #[error("Message must not be empty")]
    EmptyMessage,
    #[error("A chat turn is already in progress")]
    TurnInProgress,
}

/// How a submitted turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Completed(ChatMessage),
    Failed(ChatTurnError),
    Cancelled,
}

/// Owns the conversation and runs turns through a [`ChatModelAdapter`].
pub struct ChatThread {
    adapter: Arc<dyn ChatModelAdapter>,
    entries: RwLock<Vec<ThreadEntry>>,
    /// Token of the in-flight turn, `None` when idle.
    active: Mutex<Option<CancellationToken>>,
}

impl ChatThread {
    pub fn new(adapter: Arc<dyn ChatModelAdapter>) -> Self {
        Self {
            adapter,
            entries: RwLock::new(Vec::new()),
            active: Mutex::new(None),
        }
    }

    /// Appends `text` as a user message and runs one turn.
    ///
    /// The adapter sees every user and assistant message so far, ending with
    /// the new one. A failure is recorded as an error entry; a cancellation
    /// records nothing beyond the user message.
    pub async fn submit(&self, text: &str) -> Result<TurnOutcome, ThreadError> {
        if text.trim().is_empty() {
            return Err(ThreadError::EmptyMessage);
        }

        let cancel = {
            let mut active = self.active.lock().await;
            if active.is_some() {
                return Err(ThreadError::TurnInProgress);
            }
            let token = CancellationToken::new();
            *active = Some(token.clone());
            token
        };

        let messages = {
            let mut entries = self.entries.write().await;
            entries.push(ThreadEntry::User(ChatMessage::user(text)));
            entries
                .iter()
                .filter_map(ThreadEntry::as_message)
                .cloned()
                .collect::<Vec<_>>()
        };

        let result = self.adapter.run(&messages, &cancel).await;
        let outcome = match result {
            Ok(reply) => {
                self.entries
                    .write()
                    .await
                    .push(ThreadEntry::Assistant(reply.clone()));
                TurnOutcome::Completed(reply)
            }
            Err(ChatTurnError::Cancelled) => {
                tracing::info!("Chat turn cancelled");
                TurnOutcome::Cancelled
            }
            Err(err) => {
                tracing::warn!(error = %err, "Chat turn failed");
                self.entries
                    .write()
                    .await
                    .push(ThreadEntry::Error(err.to_string()));
                TurnOutcome::Failed(err)
            }
        };
        // Released only after the outcome is recorded.
        self.active.lock().await.take();
        Ok(outcome)
    }

    /// Cancels the in-flight turn. No-op when idle.
    pub async fn cancel(&self) {
        if let Some(token) = self.active.lock().await.as_ref() {
            token.cancel();
        }
    }

    pub async fn is_running(&self) -> bool {
        self.active.lock().await.is_some()
    }

    pub async fn entries(&self) -> Vec<ThreadEntry> {
        self.entries.read().await.clone()
    }

    /// The messages the next turn would send, without error entries.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.entries
            .read()
            .await
            .iter()
            .filter_map(ThreadEntry::as_message)
            .cloned()
            .collect()
    }

    /// Empties the thread. Refused while a turn is in flight.
    pub async fn clear(&self) -> Result<(), ThreadError> {
        let active = self.active.lock().await;
        if active.is_some() {
            return Err(ThreadError::TurnInProgress);
        }
        self.entries.write().await.clear();
        Ok(())
    }
}
