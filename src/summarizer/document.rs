use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A per-document summary as it travels between endpoints: either prose or
/// a structured object produced by an advanced summarization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryPayload {
    PlainText(String),
    Structured(Map<String, Value>),
}

impl SummaryPayload {
    /// Text fed to the aggregation prompt.
    pub fn as_text(&self) -> String {
        match self {
            SummaryPayload::PlainText(text) => text.clone(),
            SummaryPayload::Structured(map) => ["output_text", "summary"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
        }
    }

    /// Wrap any serializable value; non-objects become plain text.
    pub fn structured<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => SummaryPayload::Structured(map),
            Ok(Value::String(s)) => SummaryPayload::PlainText(s),
            Ok(other) => SummaryPayload::PlainText(other.to_string()),
            Err(e) => SummaryPayload::PlainText(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SummaryOutcome {
    Success { summary: SummaryPayload },
    Error { error: String },
}

/// One source document and what became of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    pub source: String,
    #[serde(flatten)]
    pub outcome: SummaryOutcome,
}

impl DocumentSummary {
    pub fn success(source: impl Into<String>, summary: SummaryPayload) -> Self {
        Self {
            source: source.into(),
            outcome: SummaryOutcome::Success { summary },
        }
    }

    pub fn failure(source: impl Into<String>, error: impl Display) -> Self {
        Self {
            source: source.into(),
            outcome: SummaryOutcome::Error {
                error: error.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SummaryOutcome::Success { .. })
    }

    pub fn summary_text(&self) -> Option<String> {
        match &self.outcome {
            SummaryOutcome::Success { summary } => Some(summary.as_text()),
            SummaryOutcome::Error { .. } => None,
        }
    }
}
