//! Model identifiers offered for each pipeline stage.
//!
//! Identifiers use the backend's `provider:model` form. The lists mirror what
//! the backend is known to route; `ModelConfig` still accepts any non-empty
//! identifier, so a model missing here can be set explicitly.
//!
//! | Stage | Options |
//! |-------|---------|
//! | chat, refinement, bias_evaluation | OpenAI, Groq and Cerebras general models |
//! | selection | OpenAI models and Groq Llama 3 (needs reliable JSON output) |
//! | search | OpenAI search preview and Perplexity Sonar family |

use propassist_core::state::PipelineStage;

/// A selectable model with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    pub label: &'static str,
    pub value: &'static str,
}

const fn option(label: &'static str, value: &'static str) -> ModelOption {
    ModelOption { label, value }
}

pub const GENERAL_MODEL_OPTIONS: &[ModelOption] = &[
    option("OpenAI GPT-4o", "openai:gpt-4o"),
    option("OpenAI GPT-4o Mini", "openai:gpt-4o-mini"),
    option("OpenAI GPT-4 Turbo", "openai:gpt-4-turbo"),
    option("Groq Deepseek", "groq:deepseek-r1-distill-llama-70b"),
    option("Groq Llama 3 (70B)", "groq:llama3-70b-8192"),
    option("Groq Mixtral 8x7B", "groq:mixtral-8x7b"),
    option("Cerebras Llama 3.3 (70B)", "cerebras:llama-3.3-70b"),
];

pub const SELECTION_MODEL_OPTIONS: &[ModelOption] = &[
    option("OpenAI GPT-4o", "openai:gpt-4o"),
    option("OpenAI GPT-4o Mini", "openai:gpt-4o-mini"),
    option("OpenAI GPT-4 Turbo", "openai:gpt-4-turbo"),
    option("Groq Llama 3 (70B)", "groq:llama3-70b-8192"),
];

pub const SEARCH_MODEL_OPTIONS: &[ModelOption] = &[
    option("OpenAI GPT-4o Search Preview", "openai:gpt-4o-search-preview"),
    option("Perplexity Sonar", "perplexity:sonar"),
    option("Perplexity Sonar Pro", "perplexity:sonar-pro"),
    option("Perplexity Sonar Reasoning", "perplexity:sonar-reasoning"),
    option("Perplexity Sonar Reasoning Pro", "perplexity:sonar-reasoning-pro"),
    option("Perplexity Sonar Deep Research", "perplexity:sonar-deep-research"),
];

/// Options offered for a stage.
pub fn options_for(stage: PipelineStage) -> &'static [ModelOption] {
    match stage {
        PipelineStage::Selection => SELECTION_MODEL_OPTIONS,
        PipelineStage::Search => SEARCH_MODEL_OPTIONS,
        PipelineStage::Chat | PipelineStage::Refinement | PipelineStage::BiasEvaluation => {
            GENERAL_MODEL_OPTIONS
        }
    }
}

/// Whether `model` is in the stage's list.
pub fn is_offered(stage: PipelineStage, model: &str) -> bool {
    options_for(stage).iter().any(|option| option.value == model)
}

/// Display label for a model identifier, if any list knows it.
pub fn label_for(model: &str) -> Option<&'static str> {
    [GENERAL_MODEL_OPTIONS, SELECTION_MODEL_OPTIONS, SEARCH_MODEL_OPTIONS]
        .into_iter()
        .flatten()
        .find(|option| option.value == model)
        .map(|option| option.label)
}
