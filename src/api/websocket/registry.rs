//! Registry of live WebSocket connections

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Which surface a connection says it is. Purely informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientRole {
    Admin,
    #[default]
    Viewer,
}

impl ClientRole {
    /// Interpret a `?role=` value. Anything other than `admin` is a viewer.
    pub fn from_param(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("admin") {
            ClientRole::Admin
        } else {
            ClientRole::Viewer
        }
    }
}

/// A live connection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub id: u64,
    pub role: ClientRole,
    pub connected_at: i64,
}

/// Tracks connected clients
#[derive(Default)]
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    connections: Mutex<HashMap<u64, ConnectionInfo>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection. It stays registered until the guard is dropped.
    pub fn register(self: &Arc<Self>, role: ClientRole) -> ConnectionGuard {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let info = ConnectionInfo {
            id,
            role,
            connected_at: chrono::Utc::now().timestamp(),
        };
        self.connections.lock().insert(id, info);

        ConnectionGuard {
            registry: Arc::clone(self),
            id,
        }
    }

    /// Snapshot of live connections, oldest first
    pub fn list(&self) -> Vec<ConnectionInfo> {
        let mut all: Vec<ConnectionInfo> = self.connections.lock().values().cloned().collect();
        all.sort_by_key(|c| c.id);
        all
    }

    /// Active connection count
    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Active connections with the given role
    pub fn count_role(&self, role: ClientRole) -> usize {
        self.connections
            .lock()
            .values()
            .filter(|c| c.role == role)
            .count()
    }

    fn remove(&self, id: u64) {
        self.connections.lock().remove(&id);
    }
}

/// Membership token for one connection
pub struct ConnectionGuard {
    registry: Arc<ConnectionRegistry>,
    id: u64,
}

impl ConnectionGuard {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}
