//! Slidecast - Binary Entry Point
//!
//! Starts the HTTP/WebSocket server with configuration from the environment.

use std::sync::Arc;

use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

use slidecast::api::http::run_server;
use slidecast::api::websocket::state::AppState;
use slidecast::config::ServerConfig;
use slidecast::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("slidecast=info,tower_http=info")),
        )
        .init();

    tracing::info!(version = slidecast::VERSION, "Starting {}", slidecast::NAME);

    let config = ServerConfig::from_env()?;
    tracing::info!(
        slides_dir = %config.slides_dir.display(),
        samples = config.sample_images.len(),
        "Configuration loaded"
    );

    // Ctrl+C / SIGTERM stops accepting connections and drains the rest
    let stop = Arc::new(Notify::new());
    let signal = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        tracing::info!("Shutdown requested");
        signal.notify_one();
    })?;

    let state = Arc::new(AppState::from_config(&config));
    run_server(state, config.addr, async move { stop.notified().await }).await
}
