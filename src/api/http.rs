//! HTTP server setup with Axum

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

use super::rest::{presentation, server};
use super::websocket::{handler::ws_handler, state::AppState};
use crate::error::Result;

const VIEWER_PAGE: &str = include_str!("../../assets/viewer.html");
const ADMIN_PAGE: &str = include_str!("../../assets/admin.html");

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Displays may be opened from any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let slides = ServeDir::new(&state.surface.slides_dir);

    Router::new()
        // Pages
        .route("/", get(viewer_page))
        .route("/viewer", get(viewer_page))
        .route("/admin", get(admin_page))
        // WebSocket endpoint
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        // REST API endpoints
        .route("/api/state", get(presentation::get_state))
        .route("/api/image", post(presentation::publish_image))
        .route("/api/config", get(server::get_config))
        .route("/api/stats", get(server::get_stats))
        .nest_service("/slides", slides)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind to the configured address and serve until `shutdown` resolves
pub async fn run_server<F>(state: Arc<AppState>, addr: SocketAddr, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Slidecast listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn viewer_page() -> Html<&'static str> {
    Html(VIEWER_PAGE)
}

async fn admin_page() -> Html<&'static str> {
    Html(ADMIN_PAGE)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
