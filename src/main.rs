use std::fs;
use std::path::Path;

use tokio::net::TcpListener;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use legal_summarizer::{AppState, api::routes::create_router, config::Config};

/// Console plus `summarizer.log` under `log_dir`. The guard flushes the file writer on drop.
fn init_logging(log_dir: &Path) -> std::io::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("legal_summarizer=info,tower_http=info"));

    let (file_writer, guard) = non_blocking(rolling::never(log_dir, "summarizer.log"));
    let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false).boxed();
    let console_layer = fmt::layer().with_target(false).boxed();

    Registry::default()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let _guard = init_logging(&config.log_dir)?;

    let server_addr = config.server_addr;
    info!(
        keys = config.groq_keys.len(),
        storage = config.cloudinary.is_some(),
        model = %config.groq_model,
        "Configuration loaded"
    );
    if config.groq_keys.is_empty() {
        info!("No GROQ API keys configured; LLM endpoints will answer in demo mode");
    }

    let app = create_router(AppState::from_config(config));

    let listener = TcpListener::bind(server_addr).await?;
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
