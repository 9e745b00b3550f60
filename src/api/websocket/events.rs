//! WebSocket wire events
//!
//! Every frame is a JSON text frame of the form `{"event": ..., "data": ...}`.

use serde::{Deserialize, Serialize};

/// Events the server sends to a client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// The current image, sent once on connect and after every publish.
    /// `None` only appears in the catch-up before anything was published.
    ImageChanged(Option<String>),

    /// Reply to a client `ping`
    Pong,
}

impl ServerEvent {
    /// Encode as a text frame payload
    pub fn to_json(&self) -> String {
        // Only strings and unit variants; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Events a client sends to the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Publish a new image URL; the empty string clears the display
    ChangeImage(String),

    /// Heartbeat
    Ping,
}
