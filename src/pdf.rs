use std::time::Duration;

use bytes::Bytes;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use tracing::{error, info};

use crate::error::SummarizationError;

// Shared client for PDF downloads; the only outbound path with a timeout
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

// Readers accept the header anywhere in the first kilobyte
const HEADER_WINDOW: usize = 1024;

/// Offset of the `%PDF` marker, if it starts within [`HEADER_WINDOW`] bytes.
fn header_offset(bytes: &[u8]) -> Option<usize> {
    let window = &bytes[..bytes.len().min(HEADER_WINDOW + 4)];
    window
        .windows(4)
        .position(|w| w == b"%PDF")
        .filter(|&offset| offset < HEADER_WINDOW)
}

/// Extract plain text from raw PDF bytes. Leading bytes before the header are dropped.
pub fn extract_text(bytes: &[u8]) -> Result<String, SummarizationError> {
    let offset =
        header_offset(bytes).ok_or_else(|| SummarizationError::Pdf("missing %PDF header".to_string()))?;

    let text = pdf_extract::extract_text_from_mem(&bytes[offset..])
        .map_err(|e| SummarizationError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(SummarizationError::EmptyDocument);
    }
    Ok(text)
}

/// [`extract_text`] on the blocking pool; a panicking parser becomes a `Pdf` error.
pub async fn extract_text_owned(bytes: Bytes) -> Result<String, SummarizationError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| SummarizationError::Pdf(format!("extraction task failed: {}", e)))?
}

/// Download a PDF, treating any non-200 status as a failure.
pub async fn download(url: &str) -> Result<Bytes, SummarizationError> {
    info!(url, "Downloading PDF");
    let failed = |reason: String| SummarizationError::Download {
        url: url.to_string(),
        reason,
    };

    let response = CLIENT.get(url).send().await.map_err(|e| failed(e.to_string()))?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        error!(url, status = status.as_u16(), "Failed to download PDF");
        return Err(failed(format!("Failed to download PDF: {}", status.as_u16())));
    }

    response.bytes().await.map_err(|e| failed(e.to_string()))
}

/// Split text into fixed-size chunks of `size` characters.
pub fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size.max(1)).map(|c| c.iter().collect()).collect()
}

/// Last path segment of a URL, used as a display name.
pub fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(url)
        .to_string()
}
