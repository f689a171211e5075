//! Per-stage model and system prompt configuration.

use crate::error::{PropAssistError, Result};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The five backend pipeline stages an operator can configure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PipelineStage {
    /// Answers the user.
    Chat,
    /// Picks the knowledge sources relevant to a query.
    Selection,
    /// Web research.
    Search,
    /// Rewrites the user question into a search query.
    Refinement,
    /// Fair-housing bias evaluation.
    BiasEvaluation,
}

impl PipelineStage {
    /// Every stage in pipeline order.
    pub fn all() -> impl Iterator<Item = PipelineStage> {
        Self::iter()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Chat => "Chat Model",
            Self::Selection => "Selection Model",
            Self::Search => "Search Model",
            Self::Refinement => "Refinement Model",
            Self::BiasEvaluation => "Bias Evaluation Model",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            Self::Chat => "Generates the final answer from the selected context.",
            Self::Selection => "Decides which knowledge sources are relevant to the question.",
            Self::Search => "Researches current market information on the web.",
            Self::Refinement => "Turns the question into an effective search query.",
            Self::BiasEvaluation => "Checks the exchange for fair-housing and discrimination bias.",
        }
    }
}

/// Model identifier (`provider:model`) and system prompt for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub model: String,
    pub system_prompt: String,
}

impl StageConfig {
    fn new(model: &str, system_prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
        }
    }
}

pub const DEFAULT_CHAT_MODEL: &str = "groq:deepseek-r1-distill-llama-70b";
pub const DEFAULT_SELECTION_MODEL: &str = "groq:llama3-70b-8192";
pub const DEFAULT_SEARCH_MODEL: &str = "perplexity:sonar-pro";
pub const DEFAULT_REFINEMENT_MODEL: &str = "cerebras:llama-3.3-70b";
pub const DEFAULT_BIAS_EVALUATION_MODEL: &str = "groq:llama3-70b-8192";

pub const DEFAULT_CHAT_SYSTEM_PROMPT: &str = "You are an AI assistant for real estate investment analysis.

Provide accurate, helpful information based on property data and market knowledge.

Be concise yet thorough, focusing on financial metrics and investment insights when relevant.

If you're uncertain about something, acknowledge it rather than speculating. If the facts are not found in the context provided, do not speculate.

Only answer the direct question, do not provide frivolous information.";

pub const DEFAULT_SELECTION_SYSTEM_PROMPT: &str = "You are a specialized AI designed to analyze user queries and determine which knowledge sources would be most relevant.

Your task is to select the appropriate knowledge sources based on the content of the query.

You must return your response in valid JSON format according to the specified schema.

Be precise and thoughtful in your selection, choosing only sources that are likely to contain information relevant to the query.";

pub const DEFAULT_SEARCH_SYSTEM_PROMPT: &str = "You are a research specialist focused on real estate market information.

Your task is to search for and synthesize the most relevant, accurate, and up-to-date information.

Focus on facts and data related to real estate markets, investment trends, property metrics, and economic factors.

Organize information clearly, prioritize recent information, and include specific data points when available.

Cite sources when possible and maintain an objective, factual tone throughout your response.";

pub const DEFAULT_REFINEMENT_SYSTEM_PROMPT: &str = "You are an expert at refining search queries to get the most relevant real estate information.

Your task is to convert user questions into effective search queries that will yield the most useful results.

Focus on extracting key concepts, adding relevant real estate terminology, and including specific location details when available.

Make queries precise, clear, and search-engine friendly. Remove unnecessary words and conversational elements.

Return ONLY the refined query without any explanation or additional text.";

pub const DEFAULT_BIAS_EVALUATION_SYSTEM_PROMPT: &str = "You are a bias detection expert specializing in real estate investment analysis from a financial and legal perspective.
Your task is to evaluate content for potential biases that could affect real estate investment decisions or potentially violate fair housing regulations.

Types of biases to look for:
1. Geographic bias - Unfair preference or discrimination against certain neighborhoods, cities, or regions that could limit financial opportunities or violate Fair Housing Act
2. Socioeconomic bias - Assumptions based on income levels or economic status that may exclude certain investment opportunities or violate fair lending practices
3. Demographic bias - Assumptions or stereotypes based on race, ethnicity, age, gender, religion, family status, or disability that could violate Fair Housing Act
4. Redlining bias - Implicit or explicit steering away from certain geographic areas based on demographics rather than sound financial analysis
5. Steering bias - Directing investors toward or away from specific areas based on protected characteristics rather than financial metrics
6. Disparate impact bias - Recommendations that appear neutral but disproportionately affect protected groups
7. Financial analysis bias - Skewing financial projections based on non-financial factors related to protected classes

For each evaluation, assess if these biases appear in:
- The user's question
- The context information provided
- The response generated

Focus specifically on identifying issues that could:
1. Violate the Fair Housing Act
2. Lead to discriminatory investment practices
3. Result in financial analysis that's improperly influenced by non-financial factors
4. Create disparate impacts on protected classes

Provide a fair, balanced assessment with specific examples from the content, focusing on financial and legal implications rather than psychological biases.";

/// Model and prompt for every pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub chat: StageConfig,
    pub selection: StageConfig,
    pub search: StageConfig,
    pub refinement: StageConfig,
    pub bias_evaluation: StageConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chat: StageConfig::new(DEFAULT_CHAT_MODEL, DEFAULT_CHAT_SYSTEM_PROMPT),
            selection: StageConfig::new(DEFAULT_SELECTION_MODEL, DEFAULT_SELECTION_SYSTEM_PROMPT),
            search: StageConfig::new(DEFAULT_SEARCH_MODEL, DEFAULT_SEARCH_SYSTEM_PROMPT),
            refinement: StageConfig::new(DEFAULT_REFINEMENT_MODEL, DEFAULT_REFINEMENT_SYSTEM_PROMPT),
            bias_evaluation: StageConfig::new(
                DEFAULT_BIAS_EVALUATION_MODEL,
                DEFAULT_BIAS_EVALUATION_SYSTEM_PROMPT,
            ),
        }
    }
}

impl ModelConfig {
    pub fn stage(&self, stage: PipelineStage) -> &StageConfig {
        match stage {
            PipelineStage::Chat => &self.chat,
            PipelineStage::Selection => &self.selection,
            PipelineStage::Search => &self.search,
            PipelineStage::Refinement => &self.refinement,
            PipelineStage::BiasEvaluation => &self.bias_evaluation,
        }
    }

    fn stage_mut(&mut self, stage: PipelineStage) -> &mut StageConfig {
        match stage {
            PipelineStage::Chat => &mut self.chat,
            PipelineStage::Selection => &mut self.selection,
            PipelineStage::Search => &mut self.search,
            PipelineStage::Refinement => &mut self.refinement,
            PipelineStage::BiasEvaluation => &mut self.bias_evaluation,
        }
    }

    pub fn set_model(&mut self, stage: PipelineStage, model: impl Into<String>) -> Result<()> {
        let model = non_empty(stage, "model", model.into())?;
        self.stage_mut(stage).model = model;
        Ok(())
    }

    pub fn set_system_prompt(&mut self, stage: PipelineStage, prompt: impl Into<String>) -> Result<()> {
        let prompt = non_empty(stage, "system prompt", prompt.into())?;
        self.stage_mut(stage).system_prompt = prompt;
        Ok(())
    }
}

fn non_empty(stage: PipelineStage, field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(PropAssistError::invalid_input(format!(
            "{field} for stage '{stage}' must not be empty"
        )));
    }
    Ok(value)
}
