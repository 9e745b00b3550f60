//! Image broadcaster
//!
//! Owns the state store and one unbounded queue per subscriber. Every publish
//! goes through [`ImageBroadcaster::publish`], which stores the value and
//! pushes it onto every queue while holding the store's write lock.
//! Subscribing reads the catch-up value under the read lock, so a new
//! subscriber sees each publish either in its catch-up or on its queue, never
//! both and never neither. Queues are never trimmed: a slow connection gets
//! every change, in order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use super::events::ServerEvent;
use crate::store::StateStore;
use crate::types::PresentationState;

type SubscriberMap = Mutex<HashMap<u64, mpsc::UnboundedSender<String>>>;

/// Outcome of a publish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Published {
    /// Position of this publish, starting at 1
    pub sequence_id: u64,
    /// Subscribers the change was queued for
    pub receivers: usize,
}

/// Fan-out of image changes to every live connection
pub struct ImageBroadcaster {
    store: Arc<StateStore>,
    subscribers: Arc<SubscriberMap>,
    next_subscriber: AtomicU64,
    sequence_counter: AtomicU64,
}

impl ImageBroadcaster {
    /// Create a broadcaster over `store`
    pub fn new(store: Arc<StateStore>) -> Self {
        Self {
            store,
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_subscriber: AtomicU64::new(0),
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Store `url` and notify every subscriber, the publisher included.
    pub fn publish(&self, url: impl Into<String>) -> Published {
        let image = url.into();
        let mut state = self.store.write_guard();
        state.current_image = Some(image.clone());
        let sequence_id = self.sequence_counter.fetch_add(1, Ordering::SeqCst) + 1;

        let mut subscribers = self.subscribers.lock();
        // A failed push means the receiving side is already gone
        subscribers.retain(|_, tx| tx.send(image.clone()).is_ok());
        let receivers = subscribers.len();
        drop(subscribers);
        drop(state);

        debug!(sequence_id, receivers, "Image published");
        Published {
            sequence_id,
            receivers,
        }
    }

    /// Join the fan-out. The returned subscription carries the catch-up value.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_subscriber.fetch_add(1, Ordering::SeqCst);

        let state = self.store.read_guard();
        self.subscribers.lock().insert(id, tx);
        let catch_up = state.current_image.clone();
        drop(state);

        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
            rx,
            catch_up,
        }
    }

    /// Current image URL
    pub fn current(&self) -> Option<String> {
        self.store.get()
    }

    /// Current state together with the number of publishes that produced it
    pub fn state(&self) -> (PresentationState, u64) {
        let state = self.store.read_guard();
        (state.clone(), self.sequence_counter.load(Ordering::SeqCst))
    }

    /// Number of publishes so far
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    /// Number of live subscriptions
    pub fn receiver_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// The store this broadcaster writes to
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }
}

/// One connection's view of the fan-out
///
/// Dropping it removes the connection from the live set.
pub struct Subscription {
    id: u64,
    subscribers: Weak<SubscriberMap>,
    rx: mpsc::UnboundedReceiver<String>,
    catch_up: Option<String>,
}

impl Subscription {
    /// The message a freshly connected client receives first
    pub fn welcome(&self) -> ServerEvent {
        ServerEvent::ImageChanged(self.catch_up.clone())
    }

    /// Wait for the next change to forward to this connection.
    ///
    /// Returns `None` once the broadcaster is gone.
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        self.rx
            .recv()
            .await
            .map(|image| ServerEvent::ImageChanged(Some(image)))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.lock().remove(&self.id);
        }
    }
}
