//! Integration tests for Slidecast
//!
//! Each test client is a real connection loop driven over in-memory channels,
//! so the full connect / publish / broadcast / disconnect path runs without
//! opening sockets.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use slidecast::api::websocket::state::AppState;
use slidecast::api::websocket::{run_connection, ClientRole, ConnectionPhase, ServerEvent};
use slidecast::ServerConfig;

const WAIT: Duration = Duration::from_secs(2);
const QUIET: Duration = Duration::from_millis(100);

struct TestClient {
    outgoing: UnboundedSender<Result<Message, axum::Error>>,
    incoming: UnboundedReceiver<Message>,
    task: JoinHandle<ConnectionPhase>,
}

impl TestClient {
    fn connect(state: &Arc<AppState>, role: ClientRole) -> Self {
        let (server_tx, incoming) = mpsc::unbounded::<Message>();
        let (outgoing, server_rx) = mpsc::unbounded::<Result<Message, axum::Error>>();
        let state = Arc::clone(state);
        let task = tokio::spawn(async move { run_connection(server_tx, server_rx, &state, role).await });
        Self {
            outgoing,
            incoming,
            task,
        }
    }

    /// Connect and consume the catch-up message
    async fn join(state: &Arc<AppState>, role: ClientRole) -> (Self, ServerEvent) {
        let mut client = Self::connect(state, role);
        let welcome = client.next_event().await;
        (client, welcome)
    }

    async fn next_event(&mut self) -> ServerEvent {
        let frame = timeout(WAIT, self.incoming.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed");
        match frame {
            Message::Text(text) => serde_json::from_str(&text).expect("invalid server event"),
            other => panic!("unexpected frame {other:?}"),
        }
    }

    async fn assert_quiet(&mut self) {
        assert!(
            timeout(QUIET, self.incoming.next()).await.is_err(),
            "unexpected extra frame"
        );
    }

    fn send_text(&self, json: &str) {
        self.outgoing
            .unbounded_send(Ok(Message::Text(json.to_string())))
            .expect("connection loop gone");
    }

    fn publish(&self, url: &str) {
        let json = serde_json::json!({ "event": "changeImage", "data": url });
        self.send_text(&json.to_string());
    }

    async fn close(self) -> ConnectionPhase {
        let _ = self.outgoing.unbounded_send(Ok(Message::Close(None)));
        timeout(WAIT, self.task).await.expect("close timed out").unwrap()
    }
}

fn new_state() -> Arc<AppState> {
    Arc::new(AppState::from_config(&ServerConfig::default()))
}

fn image(url: &str) -> ServerEvent {
    ServerEvent::ImageChanged(Some(url.to_string()))
}

#[tokio::test]
async fn test_first_message_is_absent_before_any_publish() {
    let state = new_state();
    let (client, welcome) = TestClient::join(&state, ClientRole::Viewer).await;
    assert_eq!(welcome, ServerEvent::ImageChanged(None));
    client.close().await;
}

#[tokio::test]
async fn test_late_joiner_gets_last_published_value() {
    let state = new_state();
    let (mut admin, _) = TestClient::join(&state, ClientRole::Admin).await;

    for url in ["/slides/1.png", "/slides/2.png", "/slides/3.png"] {
        admin.publish(url);
        assert_eq!(admin.next_event().await, image(url));
    }

    let (viewer, welcome) = TestClient::join(&state, ClientRole::Viewer).await;
    assert_eq!(welcome, image("/slides/3.png"));

    admin.close().await;
    viewer.close().await;
}

#[tokio::test]
async fn test_one_publish_one_delivery_per_connection() {
    let state = new_state();
    let mut clients = Vec::new();
    for _ in 0..5 {
        clients.push(TestClient::join(&state, ClientRole::Viewer).await.0);
    }
    assert_eq!(state.broadcaster.receiver_count(), 5);

    clients[2].publish("/slides/x.png");

    for client in &mut clients {
        assert_eq!(client.next_event().await, image("/slides/x.png"));
        client.assert_quiet().await;
    }

    for client in clients {
        client.close().await;
    }
}

#[tokio::test]
async fn test_last_write_wins() {
    let state = new_state();
    let (mut a, _) = TestClient::join(&state, ClientRole::Admin).await;
    let (mut b, _) = TestClient::join(&state, ClientRole::Admin).await;

    a.publish("/slides/v1.png");
    assert_eq!(b.next_event().await, image("/slides/v1.png"));
    b.publish("/slides/v2.png");
    assert_eq!(b.next_event().await, image("/slides/v2.png"));

    // a saw both, in order
    assert_eq!(a.next_event().await, image("/slides/v1.png"));
    assert_eq!(a.next_event().await, image("/slides/v2.png"));

    assert_eq!(state.broadcaster.current().as_deref(), Some("/slides/v2.png"));
    let (late, welcome) = TestClient::join(&state, ClientRole::Viewer).await;
    assert_eq!(welcome, image("/slides/v2.png"));

    a.close().await;
    b.close().await;
    late.close().await;
}

#[tokio::test]
async fn test_clear_publishes_empty_string() {
    let state = new_state();
    let (mut admin, _) = TestClient::join(&state, ClientRole::Admin).await;

    admin.publish("/slides/x.png");
    assert_eq!(admin.next_event().await, image("/slides/x.png"));
    admin.publish("");
    assert_eq!(admin.next_event().await, image(""));

    let (viewer, welcome) = TestClient::join(&state, ClientRole::Viewer).await;
    assert_eq!(welcome, image(""));
    assert!(state.broadcaster.store().snapshot().is_blank());

    admin.close().await;
    viewer.close().await;
}

#[tokio::test]
async fn test_disconnect_does_not_affect_others() {
    let state = new_state();
    let (mut admin, _) = TestClient::join(&state, ClientRole::Admin).await;
    let (leaving, _) = TestClient::join(&state, ClientRole::Viewer).await;
    let (mut vanished, _) = TestClient::join(&state, ClientRole::Viewer).await;
    let (mut staying, _) = TestClient::join(&state, ClientRole::Viewer).await;

    // One closes politely, one stops reading so the next write fails
    assert_eq!(leaving.close().await, ConnectionPhase::Disconnected);
    vanished.incoming.close();

    admin.publish("/slides/after.png");
    assert_eq!(admin.next_event().await, image("/slides/after.png"));
    assert_eq!(staying.next_event().await, image("/slides/after.png"));

    let phase = timeout(WAIT, vanished.task).await.unwrap().unwrap();
    assert_eq!(phase, ConnectionPhase::Disconnected);

    // Later broadcasts keep flowing
    admin.publish("/slides/later.png");
    assert_eq!(staying.next_event().await, image("/slides/later.png"));
    assert_eq!(state.connections.len(), 2);

    admin.close().await;
    staying.close().await;
    assert!(state.connections.is_empty());
}

#[tokio::test]
async fn test_restart_starts_blank() {
    let state = new_state();
    state.broadcaster.publish("/slides/before-restart.png");
    drop(state);

    let restarted = new_state();
    let (client, welcome) = TestClient::join(&restarted, ClientRole::Viewer).await;
    assert_eq!(welcome, ServerEvent::ImageChanged(None));
    client.close().await;
}

#[tokio::test]
async fn test_reconnect_gets_fresh_catch_up() {
    let state = new_state();
    let (viewer, _) = TestClient::join(&state, ClientRole::Viewer).await;
    viewer.close().await;

    state.broadcaster.publish("/slides/while-away.png");

    let (viewer, welcome) = TestClient::join(&state, ClientRole::Viewer).await;
    assert_eq!(welcome, image("/slides/while-away.png"));
    viewer.close().await;
}

#[tokio::test]
async fn test_per_connection_order_is_preserved() {
    let state = new_state();
    let (mut viewer, _) = TestClient::join(&state, ClientRole::Viewer).await;

    let urls: Vec<String> = (0..20).map(|i| format!("/slides/{i}.png")).collect();
    for url in &urls {
        state.broadcaster.publish(url.as_str());
    }
    for url in &urls {
        assert_eq!(viewer.next_event().await, image(url));
    }
    viewer.close().await;
}

#[tokio::test]
async fn test_example_session() {
    let state = new_state();
    let (mut a, welcome_a) = TestClient::join(&state, ClientRole::Admin).await;
    let (mut b, welcome_b) = TestClient::join(&state, ClientRole::Viewer).await;
    assert_eq!(welcome_a, ServerEvent::ImageChanged(None));
    assert_eq!(welcome_b, ServerEvent::ImageChanged(None));

    a.publish("/slides/x.png");
    assert_eq!(a.next_event().await, image("/slides/x.png"));
    assert_eq!(b.next_event().await, image("/slides/x.png"));

    a.publish("");
    assert_eq!(a.next_event().await, image(""));
    assert_eq!(b.next_event().await, image(""));

    a.close().await;
    b.close().await;
}

#[tokio::test]
async fn test_ping_gets_pong_only_for_sender() {
    let state = new_state();
    let (mut a, _) = TestClient::join(&state, ClientRole::Viewer).await;
    let (mut b, _) = TestClient::join(&state, ClientRole::Viewer).await;

    a.send_text(r#"{"event":"ping"}"#);
    assert_eq!(a.next_event().await, ServerEvent::Pong);
    b.assert_quiet().await;

    a.close().await;
    b.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_burst_of_publishes_reaches_viewer_in_full() {
    let state = new_state();
    let (admin, _) = TestClient::join(&state, ClientRole::Admin).await;
    let (mut viewer, _) = TestClient::join(&state, ClientRole::Viewer).await;

    let urls: Vec<String> = (0..300).map(|i| format!("/slides/burst-{i}.png")).collect();
    for url in &urls {
        admin.publish(url);
    }
    for url in &urls {
        assert_eq!(viewer.next_event().await, image(url));
    }
    viewer.assert_quiet().await;

    admin.close().await;
    viewer.close().await;
}
