//! Operator settings consumed when a request is built.

use super::knowledge_sources::KnowledgeSourceSelection;
use super::model_config::ModelConfig;
use super::web_search::WebSearchToggle;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Everything the operator can change between turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub knowledge_sources: KnowledgeSourceSelection,
    pub web_search: WebSearchToggle,
    pub models: ModelConfig,
    /// When false the bias evaluation model and prompt are left out of the request.
    pub bias_evaluation_enabled: bool,
    /// Passed through as `use_full_text` when set.
    pub use_full_text: Option<bool>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            knowledge_sources: KnowledgeSourceSelection::default(),
            web_search: WebSearchToggle::default(),
            models: ModelConfig::default(),
            bias_evaluation_enabled: true,
            use_full_text: None,
        }
    }
}

/// Shared handle to the settings, cloned into every component that reads or edits them.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<ChatSettings>>,
}

impl SettingsHandle {
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// A consistent copy of the current settings.
    pub async fn snapshot(&self) -> ChatSettings {
        self.inner.read().await.clone()
    }

    /// Applies a mutation under the write lock and returns its result.
    pub async fn update<R>(&self, f: impl FnOnce(&mut ChatSettings) -> R) -> R {
        let mut guard = self.inner.write().await;
        f(&mut guard)
    }
}
