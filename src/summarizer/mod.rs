//! Summarization engine: chunked map/combine LLM calls, local extraction,
//! and the hybrid of the two.

pub mod batch;
pub mod document;
pub mod extractive;
pub mod json;
pub mod overall;
pub mod prompts;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SummarizationError;
use crate::llm::{ChatModel, ChatRequest};
use crate::pdf::chunk_text;
use prompts::PromptPair;

/// Characters per map-step chunk.
pub const CHUNK_SIZE: usize = 3000;

/// Sentences from the extractive pass that seed a hybrid prompt.
const HYBRID_CONTEXT_SENTENCES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    Detailed,
    Concise,
    Executive,
    Technical,
    Bullets,
}

impl SummaryType {
    pub const ALL: [SummaryType; 5] = [
        SummaryType::Detailed,
        SummaryType::Concise,
        SummaryType::Executive,
        SummaryType::Technical,
        SummaryType::Bullets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SummaryType::Detailed => "detailed",
            SummaryType::Concise => "concise",
            SummaryType::Executive => "executive",
            SummaryType::Technical => "technical",
            SummaryType::Bullets => "bullets",
        }
    }
}

impl FromStr for SummaryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SummaryType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid summary_type. Must be one of: {:?}",
                    SummaryType::ALL.map(SummaryType::as_str)
                )
            })
    }
}

impl fmt::Display for SummaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Abstractive,
    Extractive,
    Hybrid,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Abstractive, Method::Extractive, Method::Hybrid];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Abstractive => "abstractive",
            Method::Extractive => "extractive",
            Method::Hybrid => "hybrid",
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Invalid method. Must be one of: {:?}", Method::ALL.map(Method::as_str)))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a typed, method-aware summarization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvancedSummary {
    pub summary: String,
    pub method: Method,
    pub level: SummaryType,
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_sentences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_phrases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_processed: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentences_selected: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub demo_mode: bool,
}

impl AdvancedSummary {
    fn new(summary: String, method: Method, level: SummaryType) -> Self {
        Self {
            word_count: summary.split_whitespace().count(),
            summary,
            method,
            level,
            key_sentences: None,
            key_phrases: None,
            chunks_processed: None,
            sentences_selected: None,
            model_used: None,
            demo_mode: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompressionRatios {
    pub abstractive: f64,
    pub extractive: f64,
    pub hybrid: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonAnalysis {
    pub total_source_words: usize,
    pub compression_ratios: CompressionRatios,
}

/// All three methods side by side.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Comparison {
    pub abstractive: AdvancedSummary,
    pub extractive: AdvancedSummary,
    pub hybrid: AdvancedSummary,
    pub analysis: ComparisonAnalysis,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo_mode: bool,
}

pub fn compression_ratio(source_words: usize, summary_words: usize) -> f64 {
    let ratio = source_words as f64 / summary_words.max(1) as f64;
    (ratio * 100.0).round() / 100.0
}

pub struct Summarizer {
    llm: Arc<dyn ChatModel>,
}

struct MapReduceOutput {
    text: String,
    chunks: usize,
    model: String,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }

    /// Plain map/combine summary used by the single-file and URL endpoints.
    pub async fn summarize_basic(&self, text: &str) -> Result<String, SummarizationError> {
        Ok(self.map_reduce(text, &prompts::BASIC).await?.text)
    }

    pub async fn summarize(
        &self,
        text: &str,
        summary_type: SummaryType,
        method: Method,
    ) -> Result<AdvancedSummary, SummarizationError> {
        info!(%method, %summary_type, "Starting summarization");
        match method {
            Method::Abstractive => self.abstractive(text, summary_type).await,
            Method::Extractive => Ok(extractive_summary(text, summary_type)),
            Method::Hybrid => self.hybrid(text, summary_type).await,
        }
    }

    pub async fn compare(&self, text: &str, summary_type: SummaryType) -> Result<Comparison, SummarizationError> {
        let abstractive = self.abstractive(text, summary_type).await?;
        let extractive = extractive_summary(text, summary_type);
        let hybrid = self.hybrid(text, summary_type).await?;

        let source_words = text.split_whitespace().count();
        let analysis = ComparisonAnalysis {
            total_source_words: source_words,
            compression_ratios: CompressionRatios {
                abstractive: compression_ratio(source_words, abstractive.word_count),
                extractive: compression_ratio(source_words, extractive.word_count),
                hybrid: compression_ratio(source_words, hybrid.word_count),
            },
        };

        Ok(Comparison {
            abstractive,
            extractive,
            hybrid,
            analysis,
            demo_mode: false,
        })
    }

    async fn abstractive(&self, text: &str, summary_type: SummaryType) -> Result<AdvancedSummary, SummarizationError> {
        let output = self.map_reduce(text, prompts::for_type(summary_type)).await?;
        let mut summary = AdvancedSummary::new(output.text, Method::Abstractive, summary_type);
        summary.chunks_processed = Some(output.chunks);
        summary.model_used = Some(output.model);
        Ok(summary)
    }

    async fn hybrid(&self, text: &str, summary_type: SummaryType) -> Result<AdvancedSummary, SummarizationError> {
        let extraction = extractive::summarize(text, summary_type);
        let key_context = if extraction.key_sentences.is_empty() {
            // Only fragments too short to score; send the opening text instead.
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(SummarizationError::EmptyDocument);
            }
            trimmed.chars().take(CHUNK_SIZE).collect::<String>()
        } else {
            extraction
                .key_sentences
                .iter()
                .take(HYBRID_CONTEXT_SENTENCES)
                .cloned()
                .collect::<Vec<_>>()
                .join(" ")
        };
        let completion = self
            .llm
            .complete(ChatRequest::prompt(prompts::hybrid(summary_type, &key_context)))
            .await?;

        let mut summary = AdvancedSummary::new(completion.content, Method::Hybrid, summary_type);
        summary.sentences_selected = Some(extraction.key_sentences.len());
        summary.key_sentences = Some(extraction.key_sentences);
        summary.key_phrases = Some(extraction.key_phrases);
        summary.model_used = Some(completion.model);
        Ok(summary)
    }

    /// One map call per chunk, in order, then one combine call over the joined outputs.
    async fn map_reduce(&self, text: &str, pair: &PromptPair) -> Result<MapReduceOutput, SummarizationError> {
        let chunks = chunk_text(text.trim(), CHUNK_SIZE);
        if chunks.is_empty() {
            return Err(SummarizationError::EmptyDocument);
        }

        let mut partials = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            debug!(chunk = i + 1, total = chunks.len(), "map step");
            let completion = self.llm.complete(ChatRequest::prompt(pair.render_map(chunk))).await?;
            partials.push(completion.content);
        }

        let combined = self
            .llm
            .complete(ChatRequest::prompt(pair.render_combine(&partials.join("\n\n"))))
            .await?;

        Ok(MapReduceOutput {
            text: combined.content,
            chunks: chunks.len(),
            model: combined.model,
        })
    }

    /// Single prompt, single reply.
    pub(crate) async fn ask(&self, prompt: String) -> Result<String, SummarizationError> {
        Ok(self.llm.complete(ChatRequest::prompt(prompt)).await?.content)
    }
}

fn extractive_summary(text: &str, summary_type: SummaryType) -> AdvancedSummary {
    let extraction = extractive::summarize(text, summary_type);
    let mut summary = AdvancedSummary::new(extraction.summary, Method::Extractive, summary_type);
    summary.sentences_selected = Some(extraction.key_sentences.len());
    summary.key_sentences = Some(extraction.key_sentences);
    summary.key_phrases = Some(extraction.key_phrases);
    summary
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::SummarizationError;
    use crate::llm::{ChatCompletion, ChatModel, ChatRequest};

    /// Replies with a fixed string and records every prompt it sees.
    pub struct RecordingModel {
        pub reply: String,
        pub prompts: Mutex<Vec<String>>,
    }

    impl RecordingModel {
        pub fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, SummarizationError> {
            let prompt = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
            self.prompts.lock().unwrap().push(prompt);
            Ok(ChatCompletion {
                content: self.reply.clone(),
                model: "test-model".to_string(),
                tokens_used: None,
                finish_reason: Some("stop".to_string()),
            })
        }
    }
}
