use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

/// Failures inside the summarization pipeline.
///
/// None of these reach the client directly: the route layer turns every
/// variant into a demo-mode payload.
#[derive(Debug, thiserror::Error)]
pub enum SummarizationError {
    #[error("No valid GROQ API keys configured! Please set GROQ_API_KEY_1, GROQ_API_KEY_2, GROQ_API_KEY_3 in your environment variables.")]
    NoApiKeys,

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("Invalid response format from LLM: {0}")]
    InvalidLlmResponse(String),

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("No text could be extracted from the document")]
    EmptyDocument,

    #[error("Failed to download PDF from {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Object storage error: {0}")]
    Storage(String),

    #[error("Object storage is not configured")]
    StorageUnavailable,

    #[error("No document summaries available to aggregate")]
    NoDocuments,
}

impl From<reqwest::Error> for SummarizationError {
    fn from(err: reqwest::Error) -> Self {
        SummarizationError::Llm(err.to_string())
    }
}

/// Errors that are reported to the client with a non-200 status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConfigError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConfigError(msg)
            | AppError::Internal(msg) => msg,
        };

        response::error(status, message).into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::ValidationError(format!("Failed to read multipart form: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
