//! Data Transfer Objects for the configuration file.
//!
//! These DTOs mirror the on-disk TOML schema and are kept separate from the
//! domain types in `propassist-core`, so the file format can evolve on its own.
//!
//! ### Config File Version History
//! - **1**: Initial schema. Every key is optional.

use propassist_core::config::ClientConfig;
use propassist_core::error::{PropAssistError, Result};
use propassist_core::knowledge_source::KnowledgeSource;
use propassist_core::state::{ModelConfig, PipelineStage};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Current config file schema version.
pub const CONFIG_FILE_VERSION: u32 = 1;

/// Version 1 of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version. Absent means the current version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_full_text: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_web_search: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_evaluation_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_sources: Option<Vec<KnowledgeSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<ModelsV1>,
}

/// The `[models.<stage>]` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelsV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<StageOverrideV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<StageOverrideV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<StageOverrideV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement: Option<StageOverrideV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_evaluation: Option<StageOverrideV1>,
}

impl ModelsV1 {
    fn stage(&self, stage: PipelineStage) -> Option<&StageOverrideV1> {
        match stage {
            PipelineStage::Chat => self.chat.as_ref(),
            PipelineStage::Selection => self.selection.as_ref(),
            PipelineStage::Search => self.search.as_ref(),
            PipelineStage::Refinement => self.refinement.as_ref(),
            PipelineStage::BiasEvaluation => self.bias_evaluation.as_ref(),
        }
    }

    /// Applies every present override onto `models`.
    fn apply_to(&self, models: &mut ModelConfig) -> Result<()> {
        for stage in PipelineStage::all() {
            let Some(stage_override) = self.stage(stage) else {
                continue;
            };
            if let Some(model) = &stage_override.model {
                models.set_model(stage, model.clone())?;
            }
            if let Some(prompt) = &stage_override.system_prompt {
                models.set_system_prompt(stage, prompt.clone())?;
            }
        }
        Ok(())
    }
}

/// Optional model and prompt for one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageOverrideV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl ConfigFileV1 {
    /// Parses the file contents. An empty file is an empty config.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: Self = toml::from_str(content)?;
        match file.version {
            None | Some(CONFIG_FILE_VERSION) => Ok(file),
            Some(other) => Err(PropAssistError::config(format!(
                "Unsupported config file version {other} (expected {CONFIG_FILE_VERSION})"
            ))),
        }
    }

    /// Layers the present keys over `config`.
    ///
    /// Values the domain stores reject (an empty model name, `web_search`
    /// as a knowledge source) are reported as configuration errors.
    pub fn apply_to(&self, config: &mut ClientConfig) -> Result<()> {
        if let Some(url) = &self.api_base_url {
            config.backend.api_base_url = url.clone();
        }
        if let Some(property_id) = &self.property_id {
            config.backend.property_id = property_id.clone();
        }
        if let Some(secs) = self.request_timeout_secs {
            if secs == 0 {
                return Err(PropAssistError::config(
                    "request_timeout_secs must be greater than zero",
                ));
            }
            config.backend.request_timeout = Duration::from_secs(secs);
        }

        let settings = &mut config.settings;
        if let Some(use_full_text) = self.use_full_text {
            settings.use_full_text = Some(use_full_text);
        }
        if let Some(include) = self.include_web_search {
            settings.web_search.set_include_web_search(include);
        }
        if let Some(enabled) = self.bias_evaluation_enabled {
            settings.bias_evaluation_enabled = enabled;
        }
        if let Some(sources) = &self.knowledge_sources {
            settings
                .knowledge_sources
                .set(sources.iter().copied())
                .map_err(in_config_file)?;
        }
        if let Some(models) = &self.models {
            models.apply_to(&mut settings.models).map_err(in_config_file)?;
        }
        Ok(())
    }
}

fn in_config_file(err: PropAssistError) -> PropAssistError {
    PropAssistError::config(format!("Invalid config file value: {err}"))
}
