//! Read-models derived from the most recent chat response.
//!
//! [`ResponseState`] is a single-slot store: the chat runtime adapter is its
//! only writer and replaces the whole slot once per completed turn, while any
//! number of display components read a snapshot or subscribe for changes.

use crate::evaluation::{BiasEvaluation, GuardrailsEvaluation};
use crate::knowledge_source::KnowledgeSourceDetail;
use std::sync::Arc;
use tokio::sync::watch;

/// Display-ready values of the latest turn. `None` means the response did not carry the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseReadModel {
    pub details: Option<Vec<KnowledgeSourceDetail>>,
    pub chat_thinking: Option<String>,
    pub search_thinking: Option<String>,
    pub bias_evaluation: Option<BiasEvaluation>,
    pub refined_search_query: Option<String>,
    pub search_prompt: Option<String>,
    pub guardrails_evaluation: Option<GuardrailsEvaluation>,
}

impl ResponseReadModel {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Source details, or an empty slice when the response had none.
    pub fn sources(&self) -> &[KnowledgeSourceDetail] {
        self.details.as_deref().unwrap_or_default()
    }
}

/// Shared, observable holder of the latest [`ResponseReadModel`].
///
/// Cloning the handle shares the slot.
#[derive(Debug, Clone)]
pub struct ResponseState {
    sender: Arc<watch::Sender<ResponseReadModel>>,
}

impl Default for ResponseState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseState {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(ResponseReadModel::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Copy of the current values.
    pub fn snapshot(&self) -> ResponseReadModel {
        self.sender.borrow().clone()
    }

    /// A receiver notified after every update.
    pub fn subscribe(&self) -> watch::Receiver<ResponseReadModel> {
        self.sender.subscribe()
    }

    /// Overwrites every field at once; readers never observe a mix of two turns.
    pub fn replace(&self, model: ResponseReadModel) {
        self.sender.send_replace(model);
    }

    /// Resets every field to unset.
    pub fn clear(&self) {
        self.replace(ResponseReadModel::default());
    }

    pub fn set_details(&self, details: Option<Vec<KnowledgeSourceDetail>>) {
        self.sender.send_modify(|model| model.details = details);
    }

    pub fn set_chat_thinking(&self, thinking: Option<String>) {
        self.sender.send_modify(|model| model.chat_thinking = thinking);
    }

    pub fn set_search_thinking(&self, thinking: Option<String>) {
        self.sender.send_modify(|model| model.search_thinking = thinking);
    }

    pub fn set_bias_evaluation(&self, evaluation: Option<BiasEvaluation>) {
        self.sender.send_modify(|model| model.bias_evaluation = evaluation);
    }

    pub fn set_refined_search_query(&self, query: Option<String>) {
        self.sender.send_modify(|model| model.refined_search_query = query);
    }

    pub fn set_search_prompt(&self, prompt: Option<String>) {
        self.sender.send_modify(|model| model.search_prompt = prompt);
    }

    pub fn set_guardrails_evaluation(&self, evaluation: Option<GuardrailsEvaluation>) {
        self.sender.send_modify(|model| model.guardrails_evaluation = evaluation);
    }
}
