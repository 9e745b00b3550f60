//! WebSocket connection handler
//!
//! Each connection walks through three phases:
//!
//! - `Connecting`: registered and subscribed, catch-up not yet delivered
//! - `Connected`: catch-up delivered; forwards broadcasts and accepts publishes
//! - `Disconnected`: the socket closed or a write failed; nothing more is sent
//!
//! The loop is generic over any sink/stream of [`Message`]s so it can be
//! driven without a network.

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::Deserialize;
use tracing::{debug, info};

use super::events::{ClientEvent, ServerEvent};
use super::registry::ClientRole;
use super::state::AppState;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Which surface is connecting. Unrecognised values connect as a viewer.
    pub role: Option<String>,
}

impl WsParams {
    pub fn role(&self) -> ClientRole {
        self.role
            .as_deref()
            .map(ClientRole::from_param)
            .unwrap_or_default()
    }
}

/// Lifecycle phase of one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Connecting,
    Connected,
    Disconnected,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let role = params.role();
    ws.on_upgrade(move |socket| handle_socket(socket, state, role))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, role: ClientRole) {
    let (sender, receiver) = socket.split();
    run_connection(sender, receiver, &state, role).await;
}

/// Drive one connection from handshake to disconnect.
///
/// Returns the final phase, which is always `Disconnected`.
pub async fn run_connection<S, R, E>(
    sender: S,
    mut receiver: R,
    state: &AppState,
    role: ClientRole,
) -> ConnectionPhase
where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let guard = state.connections.register(role);
    let mut subscription = state.broadcaster.subscribe();
    let mut conn = Connection::new(guard.id(), sender);

    info!(
        connection_id = conn.id,
        ?role,
        connections = state.connections.len(),
        "WebSocket client connected"
    );

    conn.open(subscription.welcome()).await;

    while conn.phase == ConnectionPhase::Connected {
        tokio::select! {
            // Broadcast events to client
            event = subscription.next_event() => {
                match event {
                    Some(event) => conn.send(&event).await,
                    None => conn.close(), // Broadcaster gone
                }
            }

            // Handle client messages
            frame = receiver.next() => {
                match frame {
                    Some(Ok(msg)) => conn.handle_frame(msg, state).await,
                    Some(Err(e)) => {
                        debug!(connection_id = conn.id, error = %e, "WebSocket receive error");
                        conn.close();
                    }
                    None => conn.close(),
                }
            }
        }
    }

    // Unsubscribe before deregistering so counts never show a ghost receiver
    drop(subscription);
    let id = conn.id;
    drop(guard);

    info!(
        connection_id = id,
        connections = state.connections.len(),
        "WebSocket client disconnected"
    );
    conn.phase
}

/// Outbound half of a connection plus its phase
struct Connection<S> {
    id: u64,
    phase: ConnectionPhase,
    sender: S,
}

impl<S> Connection<S>
where
    S: Sink<Message> + Unpin,
{
    fn new(id: u64, sender: S) -> Self {
        Self {
            id,
            phase: ConnectionPhase::Connecting,
            sender,
        }
    }

    /// Connecting -> Connected, delivering the catch-up message
    async fn open(&mut self, welcome: ServerEvent) {
        if self.phase != ConnectionPhase::Connecting {
            return;
        }
        self.phase = ConnectionPhase::Connected;
        self.send(&welcome).await;
    }

    /// Write one event. A failed write ends the connection.
    async fn send(&mut self, event: &ServerEvent) {
        if self.phase != ConnectionPhase::Connected {
            return;
        }
        if self.sender.send(Message::Text(event.to_json())).await.is_err() {
            debug!(connection_id = self.id, "WebSocket send failed, client disconnected");
            self.close();
        }
    }

    fn close(&mut self) {
        self.phase = ConnectionPhase::Disconnected;
    }

    /// Handle a message from the client
    async fn handle_frame(&mut self, msg: Message, state: &AppState) {
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(ClientEvent::ChangeImage(url)) => {
                    let published = state.broadcaster.publish(url);
                    info!(
                        connection_id = self.id,
                        sequence_id = published.sequence_id,
                        receivers = published.receivers,
                        "Image changed"
                    );
                }
                Ok(ClientEvent::Ping) => self.send(&ServerEvent::Pong).await,
                Err(e) => {
                    debug!(connection_id = self.id, error = %e, "Ignoring unrecognised message");
                }
            },
            Message::Binary(_) => {} // Ignore binary messages
            Message::Ping(data) => {
                if self.sender.send(Message::Pong(data)).await.is_err() {
                    self.close();
                }
            }
            Message::Pong(_) => {}
            Message::Close(_) => self.close(), // Client requested close
        }
    }
}
