//! Bias and guardrails verdicts returned alongside an assistant reply.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Overall likelihood that the query/context/response triple is biased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BiasLikelihood {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BiasSeverity {
    Low,
    Medium,
    High,
}

/// A single bias finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedBias {
    pub bias_type: String,
    pub severity: BiasSeverity,
    pub description: String,
    /// Where the bias appeared (question, context or response).
    pub location: String,
}

/// Fair-housing bias assessment produced by the bias evaluation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasEvaluation {
    pub bias_likelihood: BiasLikelihood,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biases_detected: Option<Vec<DetectedBias>>,
}

impl BiasEvaluation {
    pub fn findings(&self) -> &[DetectedBias] {
        self.biases_detected.as_deref().unwrap_or_default()
    }

    /// Highest severity among the findings.
    pub fn max_severity(&self) -> Option<BiasSeverity> {
        self.findings()
            .iter()
            .map(|bias| bias.severity)
            .max_by_key(|severity| match severity {
                BiasSeverity::Low => 0,
                BiasSeverity::Medium => 1,
                BiasSeverity::High => 2,
            })
    }
}

/// Backend verdict on whether a query may proceed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailsEvaluation {
    pub should_proceed: bool,
    /// When blocked, a ready-to-display refusal message.
    pub reason: String,
}

impl GuardrailsEvaluation {
    pub fn is_blocked(&self) -> bool {
        !self.should_proceed
    }

    /// The refusal to show the user, if the query was blocked.
    pub fn refusal_message(&self) -> Option<&str> {
        self.is_blocked().then_some(self.reason.as_str())
    }
}
