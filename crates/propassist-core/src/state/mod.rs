//! Client-side state stores.
//!
//! - `knowledge_sources`: retrieval-source filter (`KnowledgeSourceSelection`)
//! - `web_search`: web search toggle (`WebSearchToggle`)
//! - `model_config`: per-stage models and prompts (`ModelConfig`, `PipelineStage`)
//! - `settings`: the three stores above behind one shared handle (`SettingsHandle`)
//! - `response`: read-models of the latest response (`ResponseState`)

mod knowledge_sources;
mod model_config;
mod response;
mod settings;
mod web_search;

pub use knowledge_sources::KnowledgeSourceSelection;
pub use model_config::{
    DEFAULT_BIAS_EVALUATION_MODEL, DEFAULT_BIAS_EVALUATION_SYSTEM_PROMPT, DEFAULT_CHAT_MODEL,
    DEFAULT_CHAT_SYSTEM_PROMPT, DEFAULT_REFINEMENT_MODEL, DEFAULT_REFINEMENT_SYSTEM_PROMPT,
    DEFAULT_SEARCH_MODEL, DEFAULT_SEARCH_SYSTEM_PROMPT, DEFAULT_SELECTION_MODEL,
    DEFAULT_SELECTION_SYSTEM_PROMPT, ModelConfig, PipelineStage, StageConfig,
};
pub use response::{ResponseReadModel, ResponseState};
pub use settings::{ChatSettings, SettingsHandle};
pub use web_search::WebSearchToggle;
