//! Cross-document aggregation.

use serde_json::{Value, json};
use tracing::{info, warn};

use super::Summarizer;
use super::document::DocumentSummary;
use super::json::{LlmJson, parse_llm_json};
use super::prompts;
use crate::error::SummarizationError;

/// Which analysis shape the aggregation prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStyle {
    /// pros / cons / final judgment over a set of documents.
    Judgment,
    /// Collection-level overview with insights and themes.
    General,
}

impl OverallStyle {
    fn prompt(self) -> &'static str {
        match self {
            OverallStyle::Judgment => prompts::OVERALL_JUDGMENT,
            OverallStyle::General => prompts::OVERALL_GENERAL,
        }
    }

    /// Placeholder object for when the reply carried no usable JSON.
    pub fn unparsed(self) -> Value {
        match self {
            OverallStyle::Judgment => json!({
                "pros": ["Analysis could not be completed"],
                "cons": ["Please try again or contact support"],
                "final_judgment": "Overall analysis could not be completed due to parsing error.",
                "legal_themes": ["Analysis incomplete"],
            }),
            OverallStyle::General => json!({
                "category_overview": "Analysis failed - unable to parse response",
                "overall_pros": ["Analysis could not be completed"],
                "overall_cons": ["Please try again or contact support"],
                "final_judgment": "Overall analysis could not be completed due to parsing error.",
                "legal_insights": ["Please retry the request"],
                "case_count": "Unknown",
                "dominant_themes": ["Analysis incomplete"],
            }),
        }
    }
}

/// Turn a raw LLM reply into the overall summary object. Unparsable replies
/// become the style's placeholder carrying `error` and the verbatim `raw` text.
pub fn interpret_reply(raw: &str, style: OverallStyle) -> Value {
    match parse_llm_json(raw) {
        LlmJson::Parsed(value) => value,
        LlmJson::ParseFailure { raw } => {
            warn!(len = raw.len(), "LLM reply contained no parsable JSON");
            let mut envelope = style.unparsed();
            envelope["error"] = Value::String("Failed to parse LLM response as JSON".to_string());
            envelope["raw"] = Value::String(raw);
            envelope
        }
    }
}

impl Summarizer {
    /// Aggregate successful summaries into a single analysis object.
    /// Failed entries are skipped; if none succeeded there is nothing to send.
    pub async fn overall(
        &self,
        documents: &[DocumentSummary],
        style: OverallStyle,
    ) -> Result<Value, SummarizationError> {
        let texts: Vec<String> = documents.iter().filter_map(DocumentSummary::summary_text).collect();
        if texts.is_empty() {
            return Err(SummarizationError::NoDocuments);
        }

        info!(documents = texts.len(), ?style, "Aggregating summaries");
        let prompt = style.prompt().replace("{text}", &texts.join("\n\n"));
        let raw = self.ask(prompt).await?;
        Ok(interpret_reply(&raw, style))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::summarizer::document::SummaryPayload;
    use crate::summarizer::testing::RecordingModel;
    use pretty_assertions::assert_eq;

    fn docs() -> Vec<DocumentSummary> {
        vec![
            DocumentSummary::success("a.pdf", SummaryPayload::PlainText("First case was dismissed.".into())),
            DocumentSummary::failure("b.pdf", "Failed to download PDF: 404"),
            DocumentSummary::success("c.pdf", SummaryPayload::PlainText("Second case settled.".into())),
        ]
    }

    #[tokio::test]
    async fn embeds_only_successful_summaries() {
        let model = Arc::new(RecordingModel::new(r#"{"pros": [], "cons": [], "final_judgment": "Mixed"}"#));
        let summarizer = Summarizer::new(model.clone());

        let overall = summarizer.overall(&docs(), OverallStyle::Judgment).await.unwrap();
        assert_eq!(overall["final_judgment"], "Mixed");

        let prompt = model.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("First case was dismissed.\n\nSecond case settled."));
        assert!(!prompt.contains("404"));
    }

    #[tokio::test]
    async fn prose_wrapped_json_is_recovered() {
        let reply = "Sure! Here you go:\n{\"category_overview\": \"Contract disputes\", \"case_count\": \"2\"}\nThanks.";
        let summarizer = Summarizer::new(Arc::new(RecordingModel::new(reply)));
        let overall = summarizer.overall(&docs(), OverallStyle::General).await.unwrap();
        assert_eq!(overall, json!({"category_overview": "Contract disputes", "case_count": "2"}));
    }

    #[tokio::test]
    async fn unparsable_reply_is_wrapped_not_thrown() {
        let reply = "I am unable to produce structured output today.";
        let summarizer = Summarizer::new(Arc::new(RecordingModel::new(reply)));
        let overall = summarizer.overall(&docs(), OverallStyle::General).await.unwrap();
        assert_eq!(overall["raw"], reply);
        assert!(overall["error"].is_string());
        assert_eq!(overall["case_count"], "Unknown");
    }

    #[tokio::test]
    async fn nothing_to_aggregate_skips_the_model() {
        let model = Arc::new(RecordingModel::new("{}"));
        let summarizer = Summarizer::new(model.clone());
        let only_failures = vec![DocumentSummary::failure("x", "boom")];
        assert!(matches!(
            summarizer.overall(&only_failures, OverallStyle::Judgment).await,
            Err(SummarizationError::NoDocuments)
        ));
        assert_eq!(model.calls(), 0);
    }
}
