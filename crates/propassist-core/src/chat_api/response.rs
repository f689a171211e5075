//! Inbound response envelope and its normalization into read-models.
//!
//! The backend envelope gained and renamed fields over time (`thinking`
//! became `chat_thinking`/`search_thinking`). Every field except `message`
//! is optional and decoded on its own, so a malformed or unknown field only
//! leaves its read-model unset.

use crate::error::ChatTurnError;
use crate::evaluation::{BiasEvaluation, DetectedBias, GuardrailsEvaluation};
use crate::knowledge_source::KnowledgeSourceDetail;
use crate::state::ResponseReadModel;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Reply shown when the backend answered without a message.
pub const NO_RESPONSE_FALLBACK: &str = "Sorry, there was no response from the API.";

pub const THINKING_START_MARKER: &str = "<think>";
pub const THINKING_END_MARKER: &str = "</think>";

static THINKING_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?s){}(.*?){}",
        regex::escape(THINKING_START_MARKER),
        regex::escape(THINKING_END_MARKER)
    ))
    .expect("thinking segment pattern is valid")
});

/// Decoded backend response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatResponse {
    /// `None` when the field is absent or null.
    pub message: Option<String>,
    pub knowledge_source_details: Option<Vec<KnowledgeSourceDetail>>,
    /// Legacy `thinking`, normalized to a list of segments.
    pub thinking: Option<Vec<String>>,
    pub chat_thinking: Option<String>,
    pub search_thinking: Option<String>,
    pub bias_evaluation: Option<BiasEvaluation>,
    pub guardrails_evaluation: Option<GuardrailsEvaluation>,
    pub refined_search_query: Option<String>,
    pub search_prompt: Option<String>,
}

impl ChatResponse {
    /// Decodes a response body.
    ///
    /// Fails only when the body is not a JSON object or `message` is present
    /// with a non-string type.
    pub fn from_json_str(body: &str) -> Result<Self, ChatTurnError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|err| ChatTurnError::decode(format!("body is not valid JSON: {err}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ChatTurnError> {
        let Value::Object(mut object) = value else {
            return Err(ChatTurnError::decode("body is not a JSON object"));
        };

        let message = match object.remove("message") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text),
            Some(other) => {
                return Err(ChatTurnError::decode(format!(
                    "`message` must be a string, got {}",
                    json_type(&other)
                )));
            }
        };

        Ok(Self {
            message,
            knowledge_source_details: decode_details(object.remove("knowledge_source_details")),
            thinking: decode_legacy_thinking(object.remove("thinking")),
            chat_thinking: optional_field(&mut object, "chat_thinking"),
            search_thinking: optional_field(&mut object, "search_thinking"),
            bias_evaluation: decode_bias_evaluation(object.remove("bias_evaluation")),
            guardrails_evaluation: optional_field(&mut object, "guardrails_evaluation"),
            refined_search_query: optional_field(&mut object, "refined_search_query"),
            search_prompt: optional_field(&mut object, "search_prompt"),
        })
    }

    /// Text of the assistant reply, falling back when the message is absent or empty.
    pub fn reply_text(&self) -> &str {
        match self.message.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => NO_RESPONSE_FALLBACK,
        }
    }

    /// Derives the read-models for this turn.
    ///
    /// Web search details have their thinking segments stripped; those
    /// segments stand in for `search_thinking` when the backend did not send
    /// one. Legacy `thinking` stands in for `chat_thinking`.
    pub fn to_read_model(&self) -> ResponseReadModel {
        let mut extracted_search_thinking = Vec::new();
        let details = self.knowledge_source_details.as_ref().map(|details| {
            details
                .iter()
                .map(|detail| {
                    if !detail.is_web_search() {
                        return detail.clone();
                    }
                    let (text, segments) = split_thinking(&detail.text);
                    extracted_search_thinking.extend(segments);
                    KnowledgeSourceDetail {
                        text,
                        ..detail.clone()
                    }
                })
                .collect()
        });

        let search_thinking = self.search_thinking.clone().or_else(|| {
            (!extracted_search_thinking.is_empty()).then(|| extracted_search_thinking.join("\n\n"))
        });
        let chat_thinking = self
            .chat_thinking
            .clone()
            .or_else(|| {
                self.thinking
                    .as_ref()
                    .filter(|segments| !segments.is_empty())
                    .map(|segments| segments.join("\n\n"))
            });

        ResponseReadModel {
            details,
            chat_thinking,
            search_thinking,
            bias_evaluation: self.bias_evaluation.clone(),
            refined_search_query: self.refined_search_query.clone(),
            search_prompt: self.search_prompt.clone(),
            guardrails_evaluation: self.guardrails_evaluation.clone(),
        }
    }
}

/// Removes every complete thinking segment from `text`.
///
/// Returns the remaining text (trimmed) and the trimmed segment bodies.
/// Text without a complete start/end pair is returned unchanged.
pub fn split_thinking(text: &str) -> (String, Vec<String>) {
    let segments: Vec<String> = THINKING_SEGMENT
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|body| body.as_str().trim().to_string())
        .filter(|body| !body.is_empty())
        .collect();

    if !THINKING_SEGMENT.is_match(text) {
        return (text.to_string(), segments);
    }
    let stripped = THINKING_SEGMENT.replace_all(text, "").trim().to_string();
    (stripped, segments)
}

fn optional_field<T: DeserializeOwned>(object: &mut Map<String, Value>, key: &str) -> Option<T> {
    match object.remove(key) {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(field = key, error = %err, "Ignoring malformed response field");
                None
            }
        },
    }
}

fn decode_details(value: Option<Value>) -> Option<Vec<KnowledgeSourceDetail>> {
    decode_list(value, "knowledge_source_details")
}

/// Decodes the verdict, dropping only the malformed findings.
fn decode_bias_evaluation(value: Option<Value>) -> Option<BiasEvaluation> {
    let mut object = match value? {
        Value::Null => return None,
        Value::Object(object) => object,
        other => {
            tracing::warn!(
                found = json_type(&other),
                "Ignoring bias_evaluation that is not an object"
            );
            return None;
        }
    };
    let findings = decode_list::<DetectedBias>(object.remove("biases_detected"), "biases_detected");
    match serde_json::from_value::<BiasEvaluation>(Value::Object(object)) {
        Ok(evaluation) => Some(BiasEvaluation {
            biases_detected: findings,
            ..evaluation
        }),
        Err(err) => {
            tracing::warn!(field = "bias_evaluation", error = %err, "Ignoring malformed response field");
            None
        }
    }
}

/// Decodes an array element by element, dropping the elements that do not decode.
fn decode_list<T: DeserializeOwned>(value: Option<Value>, field: &str) -> Option<Vec<T>> {
    match value? {
        Value::Null => None,
        Value::Array(items) => Some(
            items
                .into_iter()
                .enumerate()
                .filter_map(|(index, item)| match serde_json::from_value(item) {
                    Ok(decoded) => Some(decoded),
                    Err(err) => {
                        tracing::warn!(field, index, error = %err, "Dropping malformed list element");
                        None
                    }
                })
                .collect(),
        ),
        other => {
            tracing::warn!(field, found = json_type(&other), "Ignoring list field that is not an array");
            None
        }
    }
}

fn decode_legacy_thinking(value: Option<Value>) -> Option<Vec<String>> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(vec![text]),
        Value::Array(items) => {
            let segments: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    _ => None,
                })
                .collect();
            (!segments.is_empty()).then_some(segments)
        }
        other => {
            tracing::debug!(found = json_type(&other), "Ignoring legacy thinking field");
            None
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
