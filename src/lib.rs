pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod keys;
pub mod llm;
pub mod pdf;
pub mod storage;
pub mod summarizer;

use std::sync::Arc;

use config::Config;
use llm::{ChatModel, GroqClient};
use storage::{AssetStore, CloudinaryClient};
use summarizer::Summarizer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<dyn ChatModel>,
    pub summarizer: Arc<Summarizer>,
    /// `None` when storage credentials are missing.
    pub assets: Option<Arc<dyn AssetStore>>,
}

impl AppState {
    /// Wire the GROQ client and, when configured, the Cloudinary store.
    pub fn from_config(config: Config) -> Self {
        let llm: Arc<dyn ChatModel> = Arc::new(GroqClient::new(
            config.groq_keys.clone(),
            config.groq_api_base.clone(),
            config.groq_model.clone(),
        ));
        let assets = config
            .cloudinary
            .clone()
            .map(|c| Arc::new(CloudinaryClient::new(c)) as Arc<dyn AssetStore>);
        Self::with_components(config, llm, assets)
    }

    pub fn with_components(
        config: Config,
        llm: Arc<dyn ChatModel>,
        assets: Option<Arc<dyn AssetStore>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            summarizer: Arc::new(Summarizer::new(llm.clone())),
            llm,
            assets,
        }
    }
}
