//! REPL input parsing.

use anyhow::{Context, Result, anyhow, bail};
use propassist_core::knowledge_source::{DEFAULT_KNOWLEDGE_SOURCES, KnowledgeSource};
use propassist_core::state::PipelineStage;
use std::str::FromStr;

/// `/sources` word that expands to the preset selection.
pub const DEFAULT_SOURCES_PRESET: &str = "default";

/// Every slash command, used for completion and hints.
pub const COMMANDS: &[&str] = &[
    "/sources", "/web", "/bias", "/model", "/prompt", "/models", "/info", "/config", "/clear",
    "/help", "/quit",
];

pub const HELP: &str = "\
Type a question to ask about the property. Commands:
  /sources [all|default|tag...]
                           show or set knowledge sources
  /web on|off              include web search
  /bias on|off             run the bias evaluation stage
  /model <stage> <model>   set a stage's model (provider:model)
  /prompt <stage> <text>   set a stage's system prompt
  /models [stage]          list offered models
  /info                    supporting info for the last reply
  /config                  show the active configuration
  /clear                   start a new conversation
  /help                    show this help
  /quit                    exit
Ctrl-C cancels a running turn.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: a new user turn.
    Submit(String),
    /// `None` shows the selection.
    Sources(Option<Vec<KnowledgeSource>>),
    Web(Option<bool>),
    Bias(Option<bool>),
    Model { stage: PipelineStage, model: String },
    Prompt { stage: PipelineStage, text: String },
    Models(Option<PipelineStage>),
    Info,
    Config,
    Clear,
    Help,
    Quit,
}

impl Command {
    /// Parses one trimmed, non-empty input line.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if !line.starts_with('/') {
            return Ok(Self::Submit(line.to_string()));
        }

        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let command = match name {
            "/sources" => Self::Sources(parse_sources(rest)?),
            "/web" => Self::Web(parse_switch(rest)?),
            "/bias" => Self::Bias(parse_switch(rest)?),
            "/model" => {
                let (stage, model) = stage_and_value(rest, "/model <stage> <model>")?;
                Self::Model { stage, model }
            }
            "/prompt" => {
                let (stage, text) = stage_and_value(rest, "/prompt <stage> <text>")?;
                Self::Prompt { stage, text }
            }
            "/models" if rest.is_empty() => Self::Models(None),
            "/models" => Self::Models(Some(parse_stage(rest)?)),
            "/info" => Self::Info,
            "/config" => Self::Config,
            "/clear" => Self::Clear,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => bail!("Unknown command '{other}'. Type /help for the list."),
        };
        Ok(command)
    }
}

fn parse_sources(rest: &str) -> Result<Option<Vec<KnowledgeSource>>> {
    if rest.is_empty() {
        return Ok(None);
    }
    let mut sources = Vec::new();
    for tag in rest.split(|c: char| c.is_whitespace() || c == ',').filter(|tag| !tag.is_empty()) {
        if tag == DEFAULT_SOURCES_PRESET {
            sources.extend(DEFAULT_KNOWLEDGE_SOURCES);
            continue;
        }
        let source =
            KnowledgeSource::from_str(tag).map_err(|_| anyhow!("Unknown knowledge source '{tag}'"))?;
        sources.push(source);
    }
    Ok(Some(sources))
}

fn parse_switch(rest: &str) -> Result<Option<bool>> {
    match rest {
        "" => Ok(None),
        "on" | "true" | "yes" => Ok(Some(true)),
        "off" | "false" | "no" => Ok(Some(false)),
        other => bail!("Expected 'on' or 'off', got '{other}'"),
    }
}

fn parse_stage(name: &str) -> Result<PipelineStage> {
    PipelineStage::from_str(name).with_context(|| {
        let stages: Vec<String> = PipelineStage::all().map(|s| s.to_string()).collect();
        format!("Unknown stage '{name}' (expected one of: {})", stages.join(", "))
    })
}

fn stage_and_value(rest: &str, usage: &str) -> Result<(PipelineStage, String)> {
    let (stage, value) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow!("Usage: {usage}"))?;
    let value = value.trim();
    if value.is_empty() {
        bail!("Usage: {usage}");
    }
    Ok((parse_stage(stage)?, value.to_string()))
}
