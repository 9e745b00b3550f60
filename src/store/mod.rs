//! In-memory store for the current presentation image
//!
//! Nothing is persisted: a new process starts with no image. The store is an
//! ordinary owned value; the server wraps it in an `Arc` and hands it to the
//! broadcaster, which is the only writer.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::types::PresentationState;

/// Holds the most recently published image URL
#[derive(Debug, Default)]
pub struct StateStore {
    state: RwLock<PresentationState>,
}

impl StateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current image URL, or `None` if nothing has been published
    pub fn get(&self) -> Option<String> {
        self.state.read().current_image.clone()
    }

    /// Replace the stored value. Any string is accepted verbatim, including
    /// the empty string used to clear the display.
    pub fn set(&self, url: impl Into<String>) {
        self.state.write().current_image = Some(url.into());
    }

    /// Copy of the whole state
    pub fn snapshot(&self) -> PresentationState {
        self.state.read().clone()
    }

    /// Hold the write lock across a `set` and whatever must happen with it.
    ///
    /// The broadcaster enqueues the notification before releasing the guard,
    /// so notification order always matches write order.
    pub(crate) fn write_guard(&self) -> RwLockWriteGuard<'_, PresentationState> {
        self.state.write()
    }

    /// Hold the read lock; no publish can complete while it is held.
    pub(crate) fn read_guard(&self) -> RwLockReadGuard<'_, PresentationState> {
        self.state.read()
    }
}
