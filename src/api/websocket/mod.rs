//! WebSocket module for real-time image updates
//!
//! Provides the `/ws` endpoint. Every client gets the current image on connect
//! and every later change, its own publishes included.

pub mod broadcaster;
pub mod events;
pub mod handler;
pub mod registry;
pub mod state;

// Re-export commonly used items
pub use broadcaster::{ImageBroadcaster, Published, Subscription};
pub use events::{ClientEvent, ServerEvent};
pub use handler::{run_connection, ConnectionPhase};
pub use registry::{ClientRole, ConnectionRegistry};
