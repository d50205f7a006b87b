//! Demo-mode responses.
//!
//! Every endpoint that depends on the LLM or object storage degrades to a
//! canned payload of the same shape instead of failing. The canned text lives
//! in one table keyed by [`Endpoint`]; the typed constructors below wrap it
//! in the same structures the live path returns.

use chrono::Utc;
use serde_json::{Value, json};
use tracing::warn;

use crate::error::SummarizationError;
use crate::llm::Message;
use crate::summarizer::batch::{BatchReport, build_report};
use crate::summarizer::overall::OverallStyle;
use crate::summarizer::{
    AdvancedSummary, Comparison, ComparisonAnalysis, CompressionRatios, Method, SummaryType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Summarize,
    SummarizeOverall,
    SummarizeFromUrls,
    AdvancedSummarize,
    CompareSummaries,
    BatchAdvancedSummarize,
    CategoryOverall,
    ListPdfsInCategory,
    CategoryDownload,
    ChatCompletion,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Summarize => "summarize",
            Endpoint::SummarizeOverall => "summarize_overall",
            Endpoint::SummarizeFromUrls => "summarize_from_urls",
            Endpoint::AdvancedSummarize => "advanced_summarize",
            Endpoint::CompareSummaries => "compare_summaries",
            Endpoint::BatchAdvancedSummarize => "batch_advanced_summarize",
            Endpoint::CategoryOverall => "summarize_category_overall",
            Endpoint::ListPdfsInCategory => "list_pdfs_in_category",
            Endpoint::CategoryDownload => "summarize_category_download",
            Endpoint::ChatCompletion => "chat_completion",
        }
    }
}

/// Placeholders: `{summary_type}`, `{method}`, `{filename}`, `{category}`.
const DEMO_TEXT: &[(Endpoint, &str)] = &[
    (
        Endpoint::Summarize,
        "[DEMO MODE] Summary of {filename}. Live AI processing is unavailable, so this placeholder stands in for a detailed summary of the document's key points, subtopics, and nuanced information.",
    ),
    (
        Endpoint::AdvancedSummarize,
        "[DEMO MODE] This would be a {summary_type} {method} summary of {filename}. Advanced AI processing would analyze the content and provide structured insights based on the selected level and method.",
    ),
    (
        Endpoint::CompareSummaries,
        "[DEMO MODE] This would be a {summary_type} {method} summary of {filename} produced for side-by-side comparison.",
    ),
    (
        Endpoint::CategoryDownload,
        "# {category} - Legal Category Analysis\n\n[DEMO MODE] Live processing of the '{category}' category is unavailable. A {summary_type} report built with the {method} method would appear here, covering final judgments, precedential value, and strategic implications.",
    ),
    (
        Endpoint::SummarizeOverall,
        "[DEMO MODE] The analysis service is unavailable. This placeholder shows the expected response format for legal document analysis. Ensure GROQ API keys are configured to receive AI-generated summaries.",
    ),
    (
        Endpoint::SummarizeFromUrls,
        "[DEMO MODE] The documents could not be analyzed live. This placeholder shows the expected response format for a collection-level legal summary.",
    ),
    (
        Endpoint::CategoryOverall,
        "[DEMO MODE] The '{category}' category could not be analyzed live. This placeholder shows the expected response format for a category-level legal summary.",
    ),
    (
        Endpoint::ChatCompletion,
        "AI chat completion failed",
    ),
];

/// What the demo payload is standing in for.
#[derive(Debug, Clone)]
pub struct FallbackContext {
    pub endpoint: Endpoint,
    pub summary_type: SummaryType,
    pub method: Method,
    pub filename: Option<String>,
    pub category: Option<String>,
}

impl FallbackContext {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            summary_type: SummaryType::Detailed,
            method: Method::Abstractive,
            filename: None,
            category: None,
        }
    }

    pub fn with_options(mut self, summary_type: SummaryType, method: Method) -> Self {
        self.summary_type = summary_type;
        self.method = method;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Demo text for this endpoint with placeholders filled in.
    pub fn text(&self) -> String {
        self.text_for(self.method)
    }

    fn text_for(&self, method: Method) -> String {
        let template = DEMO_TEXT
            .iter()
            .find(|(endpoint, _)| *endpoint == self.endpoint)
            .map(|(_, text)| *text)
            .unwrap_or("[DEMO MODE] Live processing is unavailable.");

        template
            .replace("{summary_type}", self.summary_type.as_str())
            .replace("{method}", method.as_str())
            .replace("{filename}", self.filename.as_deref().unwrap_or("the document"))
            .replace("{category}", self.category.as_deref().unwrap_or("uncategorized"))
    }
}

/// Route-boundary policy: a failed result is logged and replaced with its
/// demo counterpart. The flag reports whether the demo path was taken.
pub fn or_demo<T>(
    result: Result<T, SummarizationError>,
    ctx: &FallbackContext,
    demo: impl FnOnce(&FallbackContext) -> T,
) -> (T, bool) {
    match result {
        Ok(value) => (value, false),
        Err(err) => {
            warn!(endpoint = ctx.endpoint.as_str(), error = %err, "Falling back to demo mode");
            (demo(ctx), true)
        }
    }
}

pub fn basic_summary(ctx: &FallbackContext) -> String {
    ctx.text()
}

pub fn advanced_summary(ctx: &FallbackContext) -> AdvancedSummary {
    advanced_summary_for(ctx, ctx.method)
}

fn advanced_summary_for(ctx: &FallbackContext, method: Method) -> AdvancedSummary {
    let summary = ctx.text_for(method);
    AdvancedSummary {
        word_count: summary.split_whitespace().count(),
        summary,
        method,
        level: ctx.summary_type,
        key_sentences: None,
        key_phrases: None,
        chunks_processed: None,
        sentences_selected: None,
        model_used: None,
        demo_mode: true,
    }
}

pub fn comparison(ctx: &FallbackContext) -> Comparison {
    Comparison {
        abstractive: advanced_summary_for(ctx, Method::Abstractive),
        extractive: advanced_summary_for(ctx, Method::Extractive),
        hybrid: advanced_summary_for(ctx, Method::Hybrid),
        analysis: ComparisonAnalysis {
            total_source_words: 1000,
            compression_ratios: CompressionRatios {
                abstractive: 40.0,
                extractive: 20.0,
                hybrid: 30.0,
            },
        },
        demo_mode: true,
    }
}

/// Report with no documents; the markdown body, when the type has one, is the demo text.
pub fn batch_report(ctx: &FallbackContext) -> BatchReport {
    let category = ctx.category.as_deref().unwrap_or_default();
    let mut report = build_report(category, ctx.summary_type, ctx.method, Vec::new(), Utc::now());
    if report.summary.is_some() {
        report.summary = Some(ctx.text());
    }
    report.demo_mode = true;
    report
}

pub fn overall_summary(style: OverallStyle, ctx: &FallbackContext) -> Value {
    let mut value = match style {
        OverallStyle::Judgment => json!({
            "pros": [
                "Legal precedent established in favor of the case",
                "Strong evidence supporting the main arguments",
                "Clear documentation and witness testimonies",
                "Comprehensive case analysis provided"
            ],
            "cons": [
                "Some procedural issues noted during the proceedings",
                "Limited jurisdiction scope may affect broader application",
                "Potential for appeal based on technical grounds",
                "Additional expert review may be beneficial"
            ],
            "final_judgment": "Based on the analysis of the provided documents, the case presents a solid legal foundation with well-documented evidence. The pros outweigh the cons, indicating a favorable outcome. However, attention should be paid to the procedural aspects to prevent potential appeals.",
            "legal_themes": ["Procedural compliance", "Evidentiary standards", "Precedential value"],
        }),
        OverallStyle::General => json!({
            "category_overview": "Demonstration overview of a collection of legal cases",
            "overall_pros": [
                "Consistent application of established precedent",
                "Well-documented evidentiary records"
            ],
            "overall_cons": [
                "Procedural complexity across several matters",
                "Outcomes depend heavily on specific facts"
            ],
            "final_judgment": "The collection shows consistent application of legal principles, with outcomes largely dependent on procedural compliance and factual strength.",
            "legal_insights": [
                "Procedural compliance drives outcomes",
                "Strong precedent support improves results"
            ],
            "case_count": "Unknown",
            "dominant_themes": ["Civil procedure", "Contract law"],
        }),
    };
    value["raw"] = Value::String(ctx.text());
    value["demo_mode"] = Value::Bool(true);
    value
}

/// Keyword-picked help text for a failed chat completion.
pub fn chat_reply(messages: &[Message]) -> &'static str {
    let Some(last_user) = messages.iter().rev().find(|m| m.role == "user") else {
        return CHAT_EMPTY;
    };
    let text = last_user.content.to_lowercase();

    if text.contains("summary") || text.contains("document") {
        CHAT_DOCUMENTS
    } else if text.contains("help") || text.contains("how") {
        CHAT_HELP
    } else {
        CHAT_UNAVAILABLE
    }
}

pub fn chat_error_label() -> String {
    FallbackContext::new(Endpoint::ChatCompletion).text()
}

const CHAT_EMPTY: &str = "I'm having trouble processing your request right now. Please try again in a moment.";

const CHAT_DOCUMENTS: &str = "## Document Analysis Available 📄

I can help you understand your legal documents, but I'm currently experiencing technical difficulties with the AI service.

**In the meantime, you can:**
- Review your existing document summaries
- Download and export your analyses
- Upload new documents for processing

**Once the AI service is restored, I'll be able to:**
- Answer specific questions about your documents
- Explain complex legal concepts
- Provide detailed analysis and insights

Please try again in a few minutes, or contact support if the issue persists.

*[Fallback response - AI service temporarily unavailable]*";

const CHAT_HELP: &str = "## Help Center 🤝

I'm your legal document assistant, though I'm currently running in limited mode due to technical issues.

**Features:**
- **PDF Analysis**: Upload and analyze legal documents
- **Batch Processing**: Analyze multiple documents by category
- **Comparison**: View abstractive, extractive and hybrid summaries side by side

**Need immediate help?** Check the existing summaries in your account or try uploading a new document.

*[Fallback response - Full AI assistance will return shortly]*";

const CHAT_UNAVAILABLE: &str = "## AI Assistant Temporarily Unavailable 🔧

I'm experiencing technical difficulties and can't provide my full AI-powered assistance right now.

**What's working:**
✅ Document upload and processing
✅ Extractive summaries

**What's affected:**
⚠️ Interactive Q&A about documents
⚠️ Detailed explanations of legal concepts

I'll be back to full functionality shortly. Thank you for your patience!

*[Fallback response - Please try again in a few minutes]*";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_endpoint_has_demo_text() {
        let endpoints = [
            Endpoint::Summarize,
            Endpoint::SummarizeOverall,
            Endpoint::SummarizeFromUrls,
            Endpoint::AdvancedSummarize,
            Endpoint::CompareSummaries,
            Endpoint::CategoryOverall,
            Endpoint::CategoryDownload,
            Endpoint::ChatCompletion,
        ];
        for endpoint in endpoints {
            assert!(DEMO_TEXT.iter().any(|(e, _)| *e == endpoint), "{endpoint:?}");
        }
    }

    #[test]
    fn placeholders_are_filled() {
        let ctx = FallbackContext::new(Endpoint::AdvancedSummarize)
            .with_options(SummaryType::Bullets, Method::Hybrid)
            .with_filename("ruling.pdf");
        let text = ctx.text();
        assert!(text.contains("bullets hybrid summary of ruling.pdf"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn demo_advanced_summary_is_marked() {
        let ctx = FallbackContext::new(Endpoint::AdvancedSummarize);
        let demo = advanced_summary(&ctx);
        assert!(demo.demo_mode);
        assert_eq!(serde_json::to_value(&demo).unwrap()["demo_mode"], true);
    }

    #[test]
    fn deterministic_per_input() {
        let ctx = FallbackContext::new(Endpoint::CategoryOverall).with_category("tax");
        assert_eq!(
            overall_summary(OverallStyle::Judgment, &ctx),
            overall_summary(OverallStyle::Judgment, &ctx)
        );
    }

    #[test]
    fn demo_overall_keeps_style_keys() {
        let ctx = FallbackContext::new(Endpoint::SummarizeFromUrls);
        let demo = overall_summary(OverallStyle::General, &ctx);
        for key in ["category_overview", "overall_pros", "overall_cons", "final_judgment", "legal_insights", "case_count", "dominant_themes"] {
            assert!(demo.get(key).is_some(), "{key}");
        }
        assert_eq!(demo["demo_mode"], true);
    }

    #[test]
    fn or_demo_reports_which_path_was_taken() {
        let ctx = FallbackContext::new(Endpoint::Summarize);
        let (live, demo) = or_demo(Ok("live".to_string()), &ctx, basic_summary);
        assert_eq!((live.as_str(), demo), ("live", false));

        let (text, demo) = or_demo(Err(SummarizationError::NoApiKeys), &ctx, basic_summary);
        assert!(demo);
        assert!(text.starts_with("[DEMO MODE]"));
    }

    #[test]
    fn demo_batch_report_keeps_the_type_layout() {
        let ctx = FallbackContext::new(Endpoint::CategoryDownload).with_category("tax");
        let report = batch_report(&ctx);
        assert_eq!(report.batch_type, "detailed_comprehensive");
        assert!(report.summary.unwrap().starts_with("# tax"));
        assert!(report.demo_mode);

        let technical = FallbackContext::new(Endpoint::CategoryDownload)
            .with_options(SummaryType::Technical, Method::Hybrid)
            .with_category("tax");
        assert!(batch_report(&technical).summary.is_none());
    }

    #[test]
    fn chat_reply_follows_keywords() {
        let ask = |content: &str| vec![Message::user(content)];
        assert_eq!(chat_reply(&ask("Explain this document")), CHAT_DOCUMENTS);
        assert_eq!(chat_reply(&ask("How do I upload?")), CHAT_HELP);
        assert_eq!(chat_reply(&ask("Hello")), CHAT_UNAVAILABLE);
        assert_eq!(chat_reply(&[]), CHAT_EMPTY);
    }
}
