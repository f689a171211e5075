//! Composition root for one property conversation.

use crate::chat_thread::{ChatThread, ThreadError};
use propassist_core::config::{BackendConfig, ClientConfig};
use propassist_core::error::PropAssistError;
use propassist_core::state::{ResponseState, SettingsHandle};
use propassist_interaction::{ChatBackend, HttpChatBackend, PropertyChatAdapter};
use std::sync::Arc;

/// The thread, its adapter and the shared stores, wired together.
///
/// Settings and response state are handed out as cloned handles so a
/// presentation layer can read and edit them while a turn runs.
pub struct PropertyAssistant {
    backend_config: BackendConfig,
    settings: SettingsHandle,
    response_state: ResponseState,
    thread: Arc<ChatThread>,
}

impl PropertyAssistant {
    /// Builds an assistant talking to the configured HTTP backend.
    pub fn from_config(config: ClientConfig) -> Result<Self, PropAssistError> {
        let backend = Arc::new(HttpChatBackend::new(&config.backend)?);
        tracing::info!(endpoint = %backend.endpoint(), "Chat backend ready");
        Ok(Self::with_backend(config, backend))
    }

    pub fn with_backend(config: ClientConfig, backend: Arc<dyn ChatBackend>) -> Self {
        let settings = SettingsHandle::new(config.settings);
        let response_state = ResponseState::new();
        let adapter = PropertyChatAdapter::new(backend, settings.clone(), response_state.clone());
        Self {
            backend_config: config.backend,
            settings,
            response_state,
            thread: Arc::new(ChatThread::new(Arc::new(adapter))),
        }
    }

    pub fn backend_config(&self) -> &BackendConfig {
        &self.backend_config
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    pub fn response_state(&self) -> &ResponseState {
        &self.response_state
    }

    pub fn thread(&self) -> &Arc<ChatThread> {
        &self.thread
    }

    /// Starts a fresh conversation: empties the thread and the supporting info.
    pub async fn clear(&self) -> Result<(), ThreadError> {
        self.thread.clear().await?;
        self.response_state.clear();
        Ok(())
    }
}
