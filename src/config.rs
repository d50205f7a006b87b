use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use crate::error::{AppError, Result};
use crate::keys::KeyPool;

pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
const DEFAULT_GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

/// Credentials for the Cloudinary admin API.
#[derive(Clone, Debug)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
}

pub struct Config {
    pub server_addr: SocketAddr,
    pub groq_keys: Arc<KeyPool>,
    pub groq_model: String,
    pub groq_api_base: String,
    pub cloudinary: Option<CloudinaryConfig>,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        // Key pool order matters: numbered keys first, the single key last
        let groq_keys = Arc::new(KeyPool::from_candidates(
            ["GROQ_API_KEY_1", "GROQ_API_KEY_2", "GROQ_API_KEY_3", "GROQ_API_KEY"]
                .into_iter()
                .map(optional),
        ));

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let cloudinary = match (
            optional("CLOUDINARY_CLOUD_NAME"),
            optional("CLOUDINARY_API_KEY"),
            optional("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                api_base: optional("CLOUDINARY_API_BASE")
                    .unwrap_or_else(|| DEFAULT_CLOUDINARY_API_BASE.to_string()),
            }),
            _ => None,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            groq_keys,
            groq_model: optional("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            groq_api_base: optional("GROQ_API_BASE").unwrap_or_else(|| DEFAULT_GROQ_API_BASE.to_string()),
            cloudinary,
            log_dir: optional("LOG_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("logs")),
        })
    }

    /// Configuration with no keys and no storage; every LLM path runs in demo mode.
    pub fn demo(server_addr: SocketAddr) -> Self {
        Config {
            server_addr,
            groq_keys: Arc::new(KeyPool::default()),
            groq_model: DEFAULT_MODEL.to_string(),
            groq_api_base: DEFAULT_GROQ_API_BASE.to_string(),
            cloudinary: None,
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// A set, non-blank environment variable.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
