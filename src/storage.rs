//! Category folders of PDFs in object storage.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CloudinaryConfig;
use crate::error::SummarizationError;

const MAX_RESULTS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfAsset {
    pub public_id: String,
    pub filename: String,
    pub secure_url: String,
    pub format: Option<String>,
    pub bytes: Option<u64>,
    pub created_at: Option<String>,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// PDFs stored under the category's folder.
    async fn list_pdfs(&self, category: &str) -> Result<Vec<PdfAsset>, SummarizationError>;
}

pub fn folder_prefix(category: &str) -> String {
    format!("pdfs/{}", category)
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    public_id: String,
    secure_url: String,
    format: Option<String>,
    bytes: Option<u64>,
    created_at: Option<String>,
}

impl Resource {
    // Raw uploads often carry the extension in the id instead of a format
    fn is_pdf(&self) -> bool {
        self.format.as_deref() == Some("pdf") || self.public_id.to_ascii_lowercase().ends_with(".pdf")
    }

    fn into_asset(self) -> PdfAsset {
        PdfAsset {
            filename: self.public_id.rsplit('/').next().unwrap_or(&self.public_id).to_string(),
            public_id: self.public_id,
            secure_url: self.secure_url,
            format: self.format,
            bytes: self.bytes,
            created_at: self.created_at,
        }
    }
}

fn pdf_assets(list: ResourceList) -> Vec<PdfAsset> {
    list.resources
        .into_iter()
        .filter(Resource::is_pdf)
        .map(Resource::into_asset)
        .collect()
}

/// Cloudinary admin API client.
pub struct CloudinaryClient {
    http: Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl AssetStore for CloudinaryClient {
    async fn list_pdfs(&self, category: &str) -> Result<Vec<PdfAsset>, SummarizationError> {
        let prefix = folder_prefix(category);
        let max_results = MAX_RESULTS.to_string();
        let url = format!(
            "{}/v1_1/{}/resources/raw/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        );

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .query(&[("prefix", prefix.as_str()), ("max_results", max_results.as_str())])
            .send()
            .await
            .map_err(|e| SummarizationError::Storage(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizationError::Storage(format!("asset listing returned {}", status)));
        }

        let list: ResourceList = response
            .json()
            .await
            .map_err(|e| SummarizationError::Storage(e.to_string()))?;
        let assets = pdf_assets(list);
        info!(category, count = assets.len(), "Listed PDFs in category");
        Ok(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_only_pdf_resources() {
        let list: ResourceList = serde_json::from_value(json!({
            "resources": [
                {"public_id": "pdfs/tax/case-1", "secure_url": "https://x/case-1.pdf", "format": "pdf", "bytes": 1024},
                {"public_id": "pdfs/tax/notes.docx", "secure_url": "https://x/notes.docx"},
                {"public_id": "pdfs/tax/case-2.pdf", "secure_url": "https://x/case-2.pdf"}
            ]
        }))
        .unwrap();

        let assets = pdf_assets(list);
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].filename, "case-1");
        assert_eq!(assets[0].bytes, Some(1024));
        assert_eq!(assets[1].filename, "case-2.pdf");
    }

    #[test]
    fn missing_resources_field_is_empty() {
        let list: ResourceList = serde_json::from_value(json!({})).unwrap();
        assert!(pdf_assets(list).is_empty());
    }

    #[test]
    fn category_maps_to_pdfs_folder() {
        assert_eq!(folder_prefix("Contract Law"), "pdfs/Contract Law");
    }
}
