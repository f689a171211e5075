//! Terminal rendering of the supporting-info panel and settings.

use colored::Colorize;
use propassist_core::config::BackendConfig;
use propassist_core::evaluation::{BiasEvaluation, BiasSeverity, GuardrailsEvaluation};
use propassist_core::knowledge_source::KnowledgeSource;
use propassist_core::state::{ChatSettings, KnowledgeSourceSelection, ModelConfig, PipelineStage, ResponseReadModel};
use propassist_interaction::supported_models::{label_for, options_for};
use std::fmt::Write;
use std::path::Path;

/// Longest source excerpt shown before truncation, in characters.
const EXCERPT_CHARS: usize = 400;

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title.bright_magenta().bold());
}

fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

fn indented(out: &mut String, text: &str) {
    for line in text.lines() {
        let _ = writeln!(out, "    {line}");
    }
}

/// The supporting info panel for the latest reply.
pub fn info_panel(model: &ResponseReadModel) -> String {
    if model.is_empty() {
        return "No supporting info for the last reply.".bright_black().to_string();
    }

    let mut out = String::new();
    if let Some(guardrails) = &model.guardrails_evaluation {
        guardrails_section(&mut out, guardrails);
    }

    if !model.sources().is_empty() {
        heading(&mut out, "Sources");
        for detail in model.sources() {
            let _ = writeln!(
                out,
                "  {} {}",
                detail.display_name.bright_cyan(),
                format!("({})", detail.source_enum).bright_black()
            );
            indented(&mut out, &excerpt(&detail.text));
        }
    }

    for (title, value) in [
        ("Chat Thinking", &model.chat_thinking),
        ("Search Thinking", &model.search_thinking),
        ("Refined Search Query", &model.refined_search_query),
        ("Search Prompt", &model.search_prompt),
    ] {
        if let Some(value) = value {
            heading(&mut out, title);
            indented(&mut out, value);
        }
    }

    if let Some(evaluation) = &model.bias_evaluation {
        bias_section(&mut out, evaluation);
    }
    out.trim_end().to_string()
}

fn guardrails_section(out: &mut String, guardrails: &GuardrailsEvaluation) {
    heading(out, "Guardrails");
    match guardrails.refusal_message() {
        Some(reason) => {
            let _ = writeln!(out, "  {} {}", "blocked:".red().bold(), reason);
        }
        None => {
            let _ = writeln!(out, "  {} {}", "allowed:".green(), guardrails.reason);
        }
    }
}

fn bias_section(out: &mut String, evaluation: &BiasEvaluation) {
    heading(out, "Bias Evaluation");
    let _ = writeln!(out, "  likelihood: {}", evaluation.bias_likelihood);
    indented(out, &evaluation.explanation);
    for finding in evaluation.findings() {
        let severity = finding.severity.to_string();
        let severity = match finding.severity {
            BiasSeverity::High => severity.red().bold(),
            BiasSeverity::Medium => severity.yellow(),
            BiasSeverity::Low => severity.normal(),
        };
        let _ = writeln!(out, "  - [{severity}] {}: {}", finding.bias_type, finding.description);
        let _ = writeln!(out, "    in {}", finding.location.bright_black());
    }
}

/// Current knowledge source selection and the tags that can be chosen.
pub fn sources(selection: &KnowledgeSourceSelection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Knowledge sources: {}", selection.summary().bright_cyan());
    for source in KnowledgeSource::selectable() {
        let mark = if selection.contains(source) { "[x]" } else { "[ ]" };
        let _ = writeln!(out, "  {mark} {:<22} {}", source.to_string(), source.label().bright_black());
    }
    out.trim_end().to_string()
}

/// Offered models per stage, marking the configured one.
pub fn models(config: &ModelConfig, only: Option<PipelineStage>) -> String {
    let mut out = String::new();
    let stages: Vec<PipelineStage> = match only {
        Some(stage) => vec![stage],
        None => PipelineStage::all().collect(),
    };
    for stage in stages {
        let current = &config.stage(stage).model;
        let _ = writeln!(
            out,
            "{} {}",
            format!("{} ({stage})", stage.label()).bright_magenta().bold(),
            stage.explanation().bright_black()
        );
        for option in options_for(stage) {
            let mark = if option.value == current.as_str() { "*" } else { " " };
            let _ = writeln!(out, "  {mark} {:<45} {}", option.value, option.label);
        }
        if label_for(current).is_none() {
            let _ = writeln!(out, "  * {current:<45} (custom)");
        }
    }
    out.trim_end().to_string()
}

/// Backend location, config file and operator settings.
pub fn config(backend: &BackendConfig, config_file: Option<&Path>, settings: &ChatSettings) -> String {
    let mut out = String::new();
    heading(&mut out, "Backend");
    let _ = writeln!(out, "  api_base_url: {}", backend.api_base_url);
    let _ = writeln!(out, "  property_id:  {}", backend.property_id);
    let _ = writeln!(out, "  timeout:      {}s", backend.request_timeout.as_secs());
    let file = config_file.map_or_else(|| "(none)".to_string(), |p| p.display().to_string());
    let _ = writeln!(out, "  config file:  {file}");

    heading(&mut out, "Settings");
    let _ = writeln!(out, "  knowledge sources: {}", settings.knowledge_sources.to_request_list().join(", "));
    let _ = writeln!(out, "  web search:        {}", on_off(settings.web_search.include_web_search()));
    let _ = writeln!(out, "  bias evaluation:   {}", on_off(settings.bias_evaluation_enabled));
    if let Some(full_text) = settings.use_full_text {
        let _ = writeln!(out, "  use full text:     {}", on_off(full_text));
    }
    for stage in PipelineStage::all() {
        let _ = writeln!(out, "  {:<18} {}", format!("{stage}:"), settings.models.stage(stage).model);
    }
    out.trim_end().to_string()
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}
