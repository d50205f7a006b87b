use axum::{
    Router,
    extract::{DefaultBodyLimit, Json, Multipart, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use bytes::Bytes;
use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::AppState;
use crate::api::batch;
use crate::api::models::{
    AdvancedResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMetadata, CompareResponse,
    HealthResponse, OverallRequest, OverallResponse, SummarizeResponse, SummaryParams, UploadMetadata,
    summary_options,
};
use crate::api::response;
use crate::error::{AppError, Result, SummarizationError};
use crate::fallback::{self, Endpoint, FallbackContext};
use crate::llm::ChatRequest;
use crate::pdf;
use crate::summarizer::overall::OverallStyle;
use crate::summarizer::{AdvancedSummary, Comparison, Method, SummaryType};

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/summary_options", get(summary_options_handler))
        .route("/summarize", post(summarize_handler))
        .route("/summarize_overall", post(summarize_overall_handler))
        .route("/advanced_summarize", post(advanced_summarize_handler))
        .route("/compare_summaries", post(compare_summaries_handler))
        .route("/chat_completion", post(chat_completion_handler))
        .route("/summarize_from_urls", post(batch::summarize_from_urls))
        .route("/batch_advanced_summarize", post(batch::batch_advanced_summarize))
        .route("/summarize_category_overall", post(batch::summarize_category_overall))
        .route("/list_pdfs_in_category", post(batch::list_pdfs_in_category))
        .route("/summarize_category_download", post(batch::summarize_category_download))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

pub(crate) fn parse_summary_type(value: Option<&str>) -> Result<SummaryType> {
    value
        .unwrap_or(SummaryType::Detailed.as_str())
        .parse()
        .map_err(AppError::ValidationError)
}

pub(crate) fn parse_method(value: Option<&str>) -> Result<Method> {
    value
        .unwrap_or(Method::Abstractive.as_str())
        .parse()
        .map_err(AppError::ValidationError)
}

/// Multipart upload: a `file` part plus optional `summary_type` / `method` text parts.
#[derive(Default)]
struct Upload {
    file: Option<(String, Bytes)>,
    summary_type: Option<String>,
    method: Option<String>,
}

impl Upload {
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut upload = Upload::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("file") => {
                    let filename = field.file_name().unwrap_or("document.pdf").to_string();
                    upload.file = Some((filename, field.bytes().await?));
                }
                Some("summary_type") => upload.summary_type = Some(field.text().await?),
                Some("method") => upload.method = Some(field.text().await?),
                _ => {}
            }
        }
        Ok(upload)
    }

    fn into_file(self) -> Result<(String, Bytes)> {
        match self.file {
            None => Err(AppError::ValidationError("No file provided".to_string())),
            Some((_, bytes)) if bytes.is_empty() => Err(AppError::ValidationError("Empty file provided".to_string())),
            Some(file) => Ok(file),
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let key_count = state.config.groq_keys.len();
    response::success(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        api_keys_configured: key_count > 0,
        key_count,
        storage_configured: state.assets.is_some(),
        demo_mode: key_count == 0,
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn summary_options_handler() -> impl IntoResponse {
    response::success(summary_options())
}

async fn summarize_handler(State(state): State<AppState>, multipart: Multipart) -> Result<impl IntoResponse> {
    let (filename, bytes) = Upload::read(multipart).await?.into_file()?;
    info!(%filename, size = bytes.len(), "Summarizing uploaded PDF");

    let ctx = FallbackContext::new(Endpoint::Summarize).with_filename(&filename);
    let (summary, demo_mode) = fallback::or_demo(summarize_upload(&state, bytes).await, &ctx, fallback::basic_summary);

    Ok(response::success(SummarizeResponse { summary, demo_mode }))
}

async fn summarize_upload(state: &AppState, bytes: Bytes) -> std::result::Result<String, SummarizationError> {
    let text = pdf::extract_text_owned(bytes).await?;
    state.summarizer.summarize_basic(&text).await
}

async fn summarize_overall_handler(
    State(state): State<AppState>,
    Json(req): Json<OverallRequest>,
) -> Result<impl IntoResponse> {
    if req.summaries.is_empty() {
        return Err(AppError::ValidationError("No summaries provided".to_string()));
    }
    let documents: Vec<_> = req
        .summaries
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.into_document(i))
        .collect();
    info!(count = documents.len(), "Aggregating client summaries");

    let ctx = FallbackContext::new(Endpoint::SummarizeOverall);
    let result = state.summarizer.overall(&documents, OverallStyle::Judgment).await;
    let (overall_summary, demo_mode) =
        fallback::or_demo(result, &ctx, |ctx| fallback::overall_summary(OverallStyle::Judgment, ctx));

    Ok(response::success(OverallResponse {
        overall_summary,
        documents: None,
        demo_mode,
    }))
}

async fn advanced_summarize_handler(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let upload = Upload::read(multipart).await?;
    let summary_type = parse_summary_type(upload.summary_type.as_deref().or(params.summary_type.as_deref()))?;
    let method = parse_method(upload.method.as_deref().or(params.method.as_deref()))?;
    let (filename, bytes) = upload.into_file()?;
    let file_size = bytes.len();
    info!(%filename, %summary_type, %method, "Advanced summarization");

    let ctx = FallbackContext::new(Endpoint::AdvancedSummarize)
        .with_options(summary_type, method)
        .with_filename(&filename);
    let result = advanced_upload(&state, bytes, summary_type, method).await;
    let (summary, demo_mode) = fallback::or_demo(result, &ctx, fallback::advanced_summary);

    Ok(response::success(AdvancedResponse {
        success: true,
        summary,
        metadata: UploadMetadata {
            filename,
            summary_type,
            method: Some(method),
            file_size,
        },
        demo_mode,
    }))
}

async fn advanced_upload(
    state: &AppState,
    bytes: Bytes,
    summary_type: SummaryType,
    method: Method,
) -> std::result::Result<AdvancedSummary, SummarizationError> {
    let text = pdf::extract_text_owned(bytes).await?;
    state.summarizer.summarize(&text, summary_type, method).await
}

async fn compare_summaries_handler(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let upload = Upload::read(multipart).await?;
    let summary_type = parse_summary_type(upload.summary_type.as_deref().or(params.summary_type.as_deref()))?;
    let (filename, bytes) = upload.into_file()?;
    let file_size = bytes.len();
    info!(%filename, %summary_type, "Comparing summarization methods");

    let ctx = FallbackContext::new(Endpoint::CompareSummaries)
        .with_options(summary_type, Method::Abstractive)
        .with_filename(&filename);
    let result = compare_upload(&state, bytes, summary_type).await;
    let (comparison, demo_mode) = fallback::or_demo(result, &ctx, fallback::comparison);

    Ok(response::success(CompareResponse {
        success: true,
        comparison,
        metadata: UploadMetadata {
            filename,
            summary_type,
            method: None,
            file_size,
        },
        demo_mode,
    }))
}

async fn compare_upload(
    state: &AppState,
    bytes: Bytes,
    summary_type: SummaryType,
) -> std::result::Result<Comparison, SummarizationError> {
    let text = pdf::extract_text_owned(bytes).await?;
    state.summarizer.compare(&text, summary_type).await
}

async fn chat_completion_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatCompletionRequest>,
) -> Result<impl IntoResponse> {
    if req.messages.is_empty() {
        return Err(AppError::ValidationError("No messages provided".to_string()));
    }
    info!(messages = req.messages.len(), model = %req.model, "Chat completion request");

    let request = ChatRequest {
        messages: req.messages.clone(),
        model: Some(req.model.clone()),
        max_tokens: Some(req.max_tokens),
        temperature: Some(req.temperature),
    };

    let body = match state.llm.complete(request).await {
        Ok(completion) => ChatCompletionResponse::Completed {
            success: true,
            response: completion.content.clone(),
            content: completion.content,
            metadata: ChatMetadata {
                model: req.model,
                tokens_used: completion.tokens_used,
                finish_reason: completion.finish_reason,
            },
        },
        Err(err) => {
            warn!(endpoint = Endpoint::ChatCompletion.as_str(), error = %err, "Chat completion failed");
            ChatCompletionResponse::Fallback {
                success: false,
                error: fallback::chat_error_label(),
                details: err.to_string(),
                fallback_response: fallback::chat_reply(&req.messages).to_string(),
                demo_mode: true,
            }
        }
    };

    Ok(response::success(body))
}
