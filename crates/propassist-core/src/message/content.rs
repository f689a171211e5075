//! Message content and plain-text extraction.
//!
//! Chat messages carry either a plain string or structured content parts.
//! Parts tagged `text` or `thinking` are decoded into typed variants; every
//! other shape is kept as raw JSON so it can still be serialized back.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One typed element of structured message content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    /// `{ "type": "text", "text": ... }`
    Text(String),
    /// `{ "type": "thinking", "text": ... }`
    Thinking(String),
    /// Any other part (images, tool calls, unknown kinds), preserved verbatim.
    Other(Value),
}

impl ContentPart {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Returns the text payload for `text` and `thinking` parts.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Thinking(text) => Some(text),
            Self::Other(_) => None,
        }
    }

    /// Decodes a part from a raw JSON value. Never fails.
    pub fn from_value(value: Value) -> Self {
        let tagged = match &value {
            Value::Object(map) => match (map.get("type"), map.get("text")) {
                (Some(Value::String(kind)), Some(Value::String(text))) => match kind.as_str() {
                    "text" => Some(Self::Text(text.clone())),
                    "thinking" => Some(Self::Thinking(text.clone())),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        };
        tagged.unwrap_or(Self::Other(value))
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => serde_json::json!({ "type": "text", "text": text }),
            Self::Thinking(text) => serde_json::json!({ "type": "thinking", "text": text }),
            Self::Other(value) => value.clone(),
        }
    }
}

impl Serialize for ContentPart {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Text(text) | Self::Thinking(text) => {
                let kind = if matches!(self, Self::Text(_)) { "text" } else { "thinking" };
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", kind)?;
                map.serialize_entry("text", text)?;
                map.end()
            }
            Self::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ContentPart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// The content of a chat message in any of the shapes the chat UI produces.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    /// Plain string content.
    Text(String),
    /// An ordered sequence of parts.
    Parts(Vec<ContentPart>),
    /// A single part object.
    Part(ContentPart),
    /// Anything else (null, numbers, booleans).
    Other(Value),
}

impl MessageContent {
    /// Content consisting of exactly one text part.
    pub fn single_text(text: impl Into<String>) -> Self {
        Self::Parts(vec![ContentPart::text(text)])
    }

    /// Decodes content from a raw JSON value. Never fails.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::Parts(items.into_iter().map(ContentPart::from_value).collect()),
            Value::Object(_) => Self::Part(ContentPart::from_value(value)),
            other => Self::Other(other),
        }
    }

    /// Converts content back into raw JSON.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Parts(parts) => Value::Array(parts.iter().map(ContentPart::to_value).collect()),
            Self::Part(part) => part.to_value(),
            Self::Other(value) => value.clone(),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            other => write!(f, "{}", other.to_value()),
        }
    }
}

impl Serialize for MessageContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Parts(parts) => parts.serialize(serializer),
            Self::Part(part) => part.serialize(serializer),
            Self::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for MessageContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Extracts the plain text of a message's content.
///
/// - plain strings are returned verbatim
/// - a sequence yields the payload of its first `text` or `thinking` part
/// - a single `text` or `thinking` part yields its payload
/// - anything else is serialized to JSON
///
/// This never fails: if serialization itself fails the content is rendered
/// through its `Display` form instead.
pub fn extract_text_content(content: &MessageContent) -> String {
    let extracted = match content {
        MessageContent::Text(text) => return text.clone(),
        MessageContent::Parts(parts) => parts.iter().find_map(ContentPart::as_text),
        MessageContent::Part(part) => part.as_text(),
        MessageContent::Other(_) => None,
    };

    match extracted {
        Some(text) => text.to_string(),
        None => serde_json::to_string(content).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Failed to serialize message content, using display form");
            content.to_string()
        }),
    }
}
