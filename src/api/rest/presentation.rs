//! Presentation endpoints - read and publish the current image over HTTP

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ApiResponse;
use crate::api::websocket::state::AppState;

/// Body for POST /api/image
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    /// New image URL; empty clears the display
    pub image_url: String,
}

/// Response for POST /api/image
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub current_image: String,
    /// Connections the change was queued for
    pub receivers: usize,
}

/// GET /api/state - Current presentation state
pub async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (snapshot, sequence_id) = state.broadcaster.state();
    Json(ApiResponse::new(snapshot, sequence_id))
}

/// POST /api/image - Publish an image to every connected display
pub async fn publish_image(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PublishRequest>,
) -> impl IntoResponse {
    let published = state.broadcaster.publish(req.image_url.clone());
    info!(
        sequence_id = published.sequence_id,
        receivers = published.receivers,
        "Image changed via HTTP"
    );

    Json(ApiResponse::new(
        PublishResponse {
            current_image: req.image_url,
            receivers: published.receivers,
        },
        published.sequence_id,
    ))
}
