//! Server info endpoints

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::api::websocket::{
    registry::{ClientRole, ConnectionInfo},
    state::AppState,
};

/// Response for GET /api/config
///
/// The gate code is handed to the browser on purpose: the admin PIN is a
/// convenience screen, not access control.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceConfigResponse {
    pub gate_code: String,
    pub sample_images: Vec<String>,
}

/// Response for GET /api/stats
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub connections: usize,
    pub admins: usize,
    pub viewers: usize,
    pub publishes: u64,
    pub uptime_seconds: u64,
    pub clients: Vec<ConnectionInfo>,
}

/// GET /api/config - Admin page settings
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(SurfaceConfigResponse {
        gate_code: state.surface.gate_code.clone(),
        sample_images: state.surface.sample_images.clone(),
    })
}

/// GET /api/stats - Connection statistics
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatsResponse {
        connections: state.connections.len(),
        admins: state.connections.count_role(ClientRole::Admin),
        viewers: state.connections.count_role(ClientRole::Viewer),
        publishes: state.broadcaster.current_sequence_id(),
        uptime_seconds: state.uptime_secs(),
        clients: state.connections.list(),
    })
}
