//! Handlers that fetch documents themselves: from explicit URLs or from a
//! storage category. Items are processed one at a time; a failing item is
//! recorded and the loop moves on.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::response::IntoResponse;
use chrono::Utc;
use tracing::{info, warn};

use crate::AppState;
use crate::api::models::{
    BatchAdvancedRequest, BatchAdvancedResponse, BatchItem, BatchItemOutcome, BatchMetadata,
    CategoryDownloadRequest, CategoryFilesResponse, CategoryRequest, OverallResponse, UrlsRequest,
};
use crate::api::response;
use crate::api::routes::{parse_method, parse_summary_type};
use crate::error::{AppError, Result, SummarizationError};
use crate::fallback::{self, Endpoint, FallbackContext};
use crate::pdf;
use crate::storage::{AssetStore, PdfAsset};
use crate::summarizer::batch::build_report;
use crate::summarizer::document::{DocumentSummary, SummaryPayload};
use crate::summarizer::overall::OverallStyle;
use crate::summarizer::{AdvancedSummary, Method, SummaryType};

/// Message recorded for a failed item; download failures keep only the reason.
fn item_error(err: &SummarizationError) -> String {
    match err {
        SummarizationError::Download { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

fn require_category(category: &str) -> Result<&str> {
    let category = category.trim();
    if category.is_empty() {
        return Err(AppError::ValidationError("Category must not be empty".to_string()));
    }
    Ok(category)
}

fn no_pdfs() -> AppError {
    AppError::NotFound("No PDFs found in this category.".to_string())
}

async fn list_category(
    assets: Option<&Arc<dyn AssetStore>>,
    category: &str,
) -> std::result::Result<Vec<PdfAsset>, SummarizationError> {
    let store = assets.ok_or(SummarizationError::StorageUnavailable)?;
    store.list_pdfs(category).await
}

async fn basic_from_url(state: &AppState, url: &str) -> std::result::Result<String, SummarizationError> {
    let bytes = pdf::download(url).await?;
    let text = pdf::extract_text_owned(bytes).await?;
    state.summarizer.summarize_basic(&text).await
}

/// Download and summarize each URL with the basic pipeline.
async fn summarize_each(state: &AppState, urls: impl IntoIterator<Item = (String, String)>) -> Vec<DocumentSummary> {
    let mut documents = Vec::new();
    for (source, url) in urls {
        let document = match basic_from_url(state, &url).await {
            Ok(summary) => {
                info!(%url, "Summarized PDF");
                DocumentSummary::success(source, SummaryPayload::PlainText(summary))
            }
            Err(err) => {
                warn!(%url, error = %err, "Failed to summarize PDF");
                DocumentSummary::failure(source, item_error(&err))
            }
        };
        documents.push(document);
    }
    documents
}

/// An advanced batch item that did not produce a summary.
struct ItemFailure {
    error: SummarizationError,
    /// The document was fetched and read; the summarizer itself failed.
    at_model: bool,
}

/// Advanced summary of one URL. Every failure is reported to the caller.
async fn advanced_from_url(
    state: &AppState,
    url: &str,
    summary_type: SummaryType,
    method: Method,
) -> std::result::Result<AdvancedSummary, ItemFailure> {
    let fetched = match pdf::download(url).await {
        Ok(bytes) => pdf::extract_text_owned(bytes).await,
        Err(err) => Err(err),
    };
    let text = fetched.map_err(|error| ItemFailure { error, at_model: false })?;
    state
        .summarizer
        .summarize(&text, summary_type, method)
        .await
        .map_err(|error| ItemFailure { error, at_model: true })
}

/// Counts for an advanced batch. A batch in which nothing was summarized and
/// the model failed at least once ran without a usable model.
#[derive(Default)]
struct BatchTally {
    processed: usize,
    model_failures: usize,
}

impl BatchTally {
    fn record(&mut self, result: &std::result::Result<AdvancedSummary, ItemFailure>) {
        match result {
            Ok(_) => self.processed += 1,
            Err(failure) if failure.at_model => self.model_failures += 1,
            Err(_) => {}
        }
    }

    fn model_unavailable(&self) -> bool {
        self.processed == 0 && self.model_failures > 0
    }
}

pub async fn summarize_from_urls(
    State(state): State<AppState>,
    Json(req): Json<UrlsRequest>,
) -> Result<impl IntoResponse> {
    info!(count = req.urls.len(), "Summarizing PDFs from URLs");
    let documents = summarize_each(&state, req.urls.into_iter().map(|u| (u.clone(), u))).await;
    let succeeded = documents.iter().filter(|d| d.is_success()).count();
    info!(total = documents.len(), succeeded, "summarize_from_urls completed");

    let ctx = FallbackContext::new(Endpoint::SummarizeFromUrls);
    let result = state.summarizer.overall(&documents, OverallStyle::General).await;
    let (overall_summary, demo_mode) =
        fallback::or_demo(result, &ctx, |ctx| fallback::overall_summary(OverallStyle::General, ctx));

    Ok(response::success(OverallResponse {
        overall_summary,
        documents: Some(documents),
        demo_mode,
    }))
}

pub async fn batch_advanced_summarize(
    State(state): State<AppState>,
    Json(req): Json<BatchAdvancedRequest>,
) -> Result<impl IntoResponse> {
    if req.pdf_urls.is_empty() {
        return Err(AppError::ValidationError("No PDF URLs provided".to_string()));
    }
    let summary_type = parse_summary_type(Some(&req.summary_type))?;
    let method = parse_method(Some(&req.method))?;
    let mut summaries = Vec::with_capacity(req.pdf_urls.len());
    let mut tally = BatchTally::default();
    for url in req.pdf_urls {
        info!(%url, "Processing PDF from URL");
        let result = advanced_from_url(&state, &url, summary_type, method).await;
        tally.record(&result);
        let outcome = match result {
            Ok(summary) => BatchItemOutcome::Processed { summary },
            Err(failure) => {
                warn!(%url, error = %failure.error, "Error processing PDF");
                BatchItemOutcome::Error {
                    error: item_error(&failure.error),
                }
            }
        };
        summaries.push(BatchItem { pdf_url: url, outcome });
    }

    let demo_mode = tally.model_unavailable();
    if demo_mode {
        warn!(endpoint = Endpoint::BatchAdvancedSummarize.as_str(), "No item could be summarized by the model");
    }

    Ok(response::success(BatchAdvancedResponse {
        success: true,
        metadata: BatchMetadata {
            total_pdfs: summaries.len(),
            summary_type,
            method,
            processed_count: tally.processed,
        },
        summaries,
        demo_mode,
    }))
}

pub async fn summarize_category_overall(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<impl IntoResponse> {
    let category = require_category(&req.category)?;
    let ctx = FallbackContext::new(Endpoint::CategoryOverall).with_category(category);
    let demo = |ctx: &FallbackContext| fallback::overall_summary(OverallStyle::Judgment, ctx);

    let assets = match list_category(state.assets.as_ref(), category).await {
        Ok(assets) => assets,
        Err(err) => {
            let (overall_summary, demo_mode) = fallback::or_demo(Err(err), &ctx, demo);
            return Ok(response::success(OverallResponse {
                overall_summary,
                documents: Some(Vec::new()),
                demo_mode,
            }));
        }
    };
    if assets.is_empty() {
        return Err(no_pdfs());
    }

    info!(category, count = assets.len(), "Summarizing category");
    let documents = summarize_each(&state, assets.into_iter().map(|a| (a.filename, a.secure_url))).await;
    let result = state.summarizer.overall(&documents, OverallStyle::Judgment).await;
    let (overall_summary, demo_mode) = fallback::or_demo(result, &ctx, demo);

    Ok(response::success(OverallResponse {
        overall_summary,
        documents: Some(documents),
        demo_mode,
    }))
}

pub async fn list_pdfs_in_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<impl IntoResponse> {
    let category = require_category(&req.category)?;
    let ctx = FallbackContext::new(Endpoint::ListPdfsInCategory).with_category(category);
    let (files, demo_mode) = fallback::or_demo(list_category(state.assets.as_ref(), category).await, &ctx, |_| Vec::new());

    Ok(response::success(CategoryFilesResponse {
        category: category.to_string(),
        count: files.len(),
        files,
        demo_mode,
    }))
}

pub async fn summarize_category_download(
    State(state): State<AppState>,
    Json(req): Json<CategoryDownloadRequest>,
) -> Result<impl IntoResponse> {
    let category = require_category(&req.category)?;
    let summary_type: SummaryType = parse_summary_type(Some(&req.summary_type))?;
    let method: Method = parse_method(Some(&req.method))?;
    let ctx = FallbackContext::new(Endpoint::CategoryDownload)
        .with_options(summary_type, method)
        .with_category(category);

    let assets = match list_category(state.assets.as_ref(), category).await {
        Ok(assets) => assets,
        Err(err) => {
            let (report, _) = fallback::or_demo(Err(err), &ctx, fallback::batch_report);
            return Ok(response::success(report));
        }
    };
    if assets.is_empty() {
        return Err(no_pdfs());
    }

    info!(category, count = assets.len(), %summary_type, %method, "Building category report");
    let mut documents = Vec::with_capacity(assets.len());
    let mut tally = BatchTally::default();
    for asset in assets {
        let result = advanced_from_url(&state, &asset.secure_url, summary_type, method).await;
        tally.record(&result);
        let document = match result {
            Ok(summary) => DocumentSummary::success(asset.filename, SummaryPayload::structured(&summary)),
            Err(failure) => {
                warn!(url = %asset.secure_url, error = %failure.error, "Failed to summarize PDF");
                DocumentSummary::failure(asset.filename, item_error(&failure.error))
            }
        };
        documents.push(document);
    }

    let demo_mode = tally.model_unavailable();
    if demo_mode {
        warn!(endpoint = Endpoint::CategoryDownload.as_str(), category, "No document could be summarized by the model");
    }
    let mut report = build_report(category, summary_type, method, documents, Utc::now());
    report.demo_mode = demo_mode;
    Ok(response::success(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_failures_keep_only_the_reason() {
        let err = SummarizationError::Download {
            url: "https://x/a.pdf".into(),
            reason: "Failed to download PDF: 404".into(),
        };
        assert_eq!(item_error(&err), "Failed to download PDF: 404");
        assert_eq!(
            item_error(&SummarizationError::EmptyDocument),
            SummarizationError::EmptyDocument.to_string()
        );
    }

    fn model_failure(at_model: bool) -> std::result::Result<AdvancedSummary, ItemFailure> {
        Err(ItemFailure {
            error: SummarizationError::Llm("rate limited".into()),
            at_model,
        })
    }

    #[test]
    fn batch_without_a_working_model_is_flagged() {
        let mut tally = BatchTally::default();
        tally.record(&model_failure(false));
        assert!(!tally.model_unavailable());
        tally.record(&model_failure(true));
        assert!(tally.model_unavailable());
        assert_eq!(tally.processed, 0);
    }

    #[test]
    fn blank_category_is_rejected() {
        assert!(require_category("   ").is_err());
        assert_eq!(require_category(" tax ").unwrap(), "tax");
    }
}
