//! Slidecast
//!
//! One presenter picks an image, every connected display shows it.
//!
//! # Modules
//!
//! - `types`: `PresentationState`
//! - `store`: in-memory holder of the current image URL
//! - `api`: WebSocket fan-out, REST endpoints and the served pages
//! - `config`: environment-based server settings
//! - `error`: startup error type
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use slidecast::api::{http::run_server, websocket::state::AppState};
//! use slidecast::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> slidecast::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let state = Arc::new(AppState::from_config(&config));
//!     run_server(state, config.addr, std::future::pending()).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used items at crate root
pub use api::websocket::{ClientEvent, ImageBroadcaster, Published, ServerEvent, Subscription};
pub use config::ServerConfig;
pub use error::{Result, SlidecastError};
pub use store::StateStore;
pub use types::PresentationState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
