use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::DEFAULT_MODEL;
use crate::llm::Message;
use crate::storage::PdfAsset;
use crate::summarizer::document::{DocumentSummary, SummaryPayload};
use crate::summarizer::{AdvancedSummary, Comparison, Method, SummaryType};

// ---- requests ----

/// One entry of `/summarize_overall`: bare text or a record naming its source.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SummaryInput {
    Text(String),
    Record {
        #[serde(default, alias = "pdfName", alias = "url", alias = "filename")]
        source: Option<String>,
        #[serde(default)]
        summary: Option<SummaryPayload>,
        #[serde(default)]
        error: Option<String>,
    },
}

impl SummaryInput {
    pub fn into_document(self, index: usize) -> DocumentSummary {
        let fallback_name = || format!("document-{}", index + 1);
        match self {
            SummaryInput::Text(text) => DocumentSummary::success(fallback_name(), SummaryPayload::PlainText(text)),
            SummaryInput::Record { source, summary, error } => {
                let source = source.unwrap_or_else(fallback_name);
                match summary {
                    Some(summary) => DocumentSummary::success(source, summary),
                    None => DocumentSummary::failure(source, error.unwrap_or_else(|| "missing summary".to_string())),
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OverallRequest {
    pub summaries: Vec<SummaryInput>,
}

#[derive(Debug, Deserialize)]
pub struct UrlsRequest {
    pub urls: Vec<String>,
}

fn default_summary_type() -> String {
    SummaryType::Detailed.as_str().to_string()
}

fn default_method() -> String {
    Method::Abstractive.as_str().to_string()
}

#[derive(Debug, Deserialize)]
pub struct BatchAdvancedRequest {
    #[serde(default)]
    pub pdf_urls: Vec<String>,
    #[serde(default = "default_summary_type")]
    pub summary_type: String,
    #[serde(default = "default_method")]
    pub method: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryDownloadRequest {
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_summary_type")]
    pub summary_type: String,
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_max_tokens() -> u32 {
    800
}

fn default_temperature() -> f32 {
    0.7
}

fn default_chat_model() -> String {
    DEFAULT_MODEL.to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<Message>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_chat_model")]
    pub model: String,
}

/// Query-string options for the upload endpoints; multipart fields take precedence.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub summary_type: Option<String>,
    pub method: Option<String>,
}

// ---- responses ----

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct OverallResponse {
    pub overall_summary: Value,
    /// Per-source outcomes when the service fetched the documents itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentSummary>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadMetadata {
    pub filename: String,
    pub summary_type: SummaryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
    pub file_size: usize,
}

#[derive(Debug, Serialize)]
pub struct AdvancedResponse {
    pub success: bool,
    pub summary: AdvancedSummary,
    pub metadata: UploadMetadata,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub success: bool,
    pub comparison: Comparison,
    pub metadata: UploadMetadata,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct CategoryFilesResponse {
    pub category: String,
    pub files: Vec<PdfAsset>,
    pub count: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo_mode: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchItemOutcome {
    Processed { summary: AdvancedSummary },
    Error { error: String },
}

#[derive(Debug, Serialize)]
pub struct BatchItem {
    pub pdf_url: String,
    #[serde(flatten)]
    pub outcome: BatchItemOutcome,
}

#[derive(Debug, Serialize)]
pub struct BatchMetadata {
    pub total_pdfs: usize,
    pub summary_type: SummaryType,
    pub method: Method,
    pub processed_count: usize,
}

#[derive(Debug, Serialize)]
pub struct BatchAdvancedResponse {
    pub success: bool,
    pub summaries: Vec<BatchItem>,
    pub metadata: BatchMetadata,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatMetadata {
    pub model: String,
    pub tokens_used: Option<u64>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChatCompletionResponse {
    Completed {
        success: bool,
        response: String,
        content: String,
        metadata: ChatMetadata,
    },
    Fallback {
        success: bool,
        error: String,
        details: String,
        fallback_response: String,
        demo_mode: bool,
    },
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub api_keys_configured: bool,
    pub key_count: usize,
    pub storage_configured: bool,
    pub demo_mode: bool,
    pub timestamp: String,
}

/// Catalog served by `/summary_options`; independent of configuration.
pub fn summary_options() -> Value {
    let types: serde_json::Map<String, Value> = SummaryType::ALL
        .into_iter()
        .map(|t| {
            let (name, description, icon, length, best_for) = match t {
                SummaryType::Detailed => ("Detailed Analysis", "Comprehensive legal analysis with full context", "📄", "800-1200 words", "Complete case understanding"),
                SummaryType::Concise => ("Concise Summary", "Key points and essential information only", "📝", "200-400 words", "Quick review and overview"),
                SummaryType::Executive => ("Executive Summary", "Business-focused implications and decisions", "👔", "300-500 words", "Leadership and strategic decisions"),
                SummaryType::Technical => ("Technical Legal", "Legal expert analysis with citations", "⚖️", "600-1000 words", "Legal professionals and researchers"),
                SummaryType::Bullets => ("Bullet Points", "Scannable key points format", "🔸", "150-300 words", "Quick scanning and reference"),
            };
            let entry = json!({
                "name": name,
                "description": description,
                "icon": icon,
                "estimated_length": length,
                "best_for": best_for,
            });
            (t.as_str().to_string(), entry)
        })
        .collect();

    let methods: serde_json::Map<String, Value> = Method::ALL
        .into_iter()
        .map(|m| {
            let entry = match m {
                Method::Abstractive => json!({
                    "name": "AI Generated",
                    "description": "AI creates new interpretive summary text",
                    "icon": "🧠",
                    "pros": ["Natural language", "Interpretive analysis", "Contextual connections"],
                    "cons": ["May introduce bias", "Requires fact-checking"],
                    "best_for": "Understanding implications and analysis",
                }),
                Method::Extractive => json!({
                    "name": "Direct Quotes",
                    "description": "Extracts exact sentences from original text",
                    "icon": "📋",
                    "pros": ["100% accurate to source", "No AI interpretation", "Preserves legal language"],
                    "cons": ["Less fluid reading", "May lack connections"],
                    "best_for": "Fact verification and exact references",
                }),
                Method::Hybrid => json!({
                    "name": "Best of Both",
                    "description": "Combines extraction with AI interpretation",
                    "icon": "⚡",
                    "pros": ["Accuracy + interpretation", "Balanced approach", "Comprehensive"],
                    "cons": ["Longer processing time"],
                    "best_for": "Most use cases - recommended",
                }),
            };
            (m.as_str().to_string(), entry)
        })
        .collect();

    json!({ "summary_types": types, "methods": methods })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_inputs_accept_text_and_records() {
        let request: OverallRequest = serde_json::from_value(json!({
            "summaries": [
                "plain summary",
                {"pdfName": "a.pdf", "summary": "record summary"},
                {"url": "https://x/b.pdf", "error": "Failed to download PDF: 404"}
            ]
        }))
        .unwrap();

        let docs: Vec<DocumentSummary> = request
            .summaries
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.into_document(i))
            .collect();

        assert_eq!(docs[0].source, "document-1");
        assert_eq!(docs[1].summary_text().as_deref(), Some("record summary"));
        assert_eq!(docs[1].source, "a.pdf");
        assert!(!docs[2].is_success());
    }

    #[test]
    fn chat_request_defaults() {
        let request: ChatCompletionRequest =
            serde_json::from_value(json!({"messages": [{"role": "user", "content": "hi"}]})).unwrap();
        assert_eq!(request.max_tokens, 800);
        assert_eq!(request.model, "llama3-8b-8192");
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn batch_item_status_is_flattened() {
        let item = BatchItem {
            pdf_url: "https://x/a.pdf".into(),
            outcome: BatchItemOutcome::Error { error: "boom".into() },
        };
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"pdf_url": "https://x/a.pdf", "status": "error", "error": "boom"})
        );
    }

    #[test]
    fn options_catalog_is_fixed() {
        let options = summary_options();
        assert_eq!(options["summary_types"].as_object().unwrap().len(), 5);
        assert_eq!(options["methods"].as_object().unwrap().len(), 3);
    }
}
