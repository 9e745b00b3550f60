//! REST API module for HTTP endpoints
//!
//! Plain HTTP access to the same state the WebSocket serves:
//! - `GET /api/state` - Current image
//! - `POST /api/image` - Publish an image (same path as `changeImage`)
//! - `GET /api/config` - Admin page settings
//! - `GET /api/stats` - Connection counts and uptime

pub mod presentation;
pub mod server;

use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Number of publishes so far, for cache invalidation
    pub sequence_id: u64,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, sequence_id: u64) -> Self {
        Self { data, sequence_id }
    }
}
