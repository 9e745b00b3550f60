//! Shared application state for HTTP and WebSocket handlers

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use super::broadcaster::ImageBroadcaster;
use super::registry::ConnectionRegistry;
use crate::config::ServerConfig;
use crate::store::StateStore;

/// Settings for the served pages
#[derive(Debug, Clone)]
pub struct SurfaceSettings {
    pub gate_code: String,
    pub sample_images: Vec<String>,
    pub slides_dir: PathBuf,
}

/// Shared application state
pub struct AppState {
    /// Store plus fan-out; the single authority for the current image
    pub broadcaster: ImageBroadcaster,

    /// Live connections
    pub connections: Arc<ConnectionRegistry>,

    /// Admin page settings
    pub surface: SurfaceSettings,

    started_at: Instant,
}

impl AppState {
    /// Build state around an existing store
    pub fn new(store: Arc<StateStore>, config: &ServerConfig) -> Self {
        Self {
            broadcaster: ImageBroadcaster::new(store),
            connections: Arc::new(ConnectionRegistry::new()),
            surface: SurfaceSettings {
                gate_code: config.gate_code.clone(),
                sample_images: config.sample_images.clone(),
                slides_dir: config.slides_dir.clone(),
            },
            started_at: Instant::now(),
        }
    }

    /// Fresh state with an empty store
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(Arc::new(StateStore::new()), config)
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
