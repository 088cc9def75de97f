//! Connection registry: the set of currently open connections

use std::collections::HashMap;
use std::fmt;

use parking_lot::{Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::types::ServerEvent;

/// Opaque identifier assigned to each connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outbound queue of a single connection
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

/// Thread-safe map from connection id to its outbound queue
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, Outbox>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the registry for a mutation followed by a fan-out
    pub(crate) fn lock(&self) -> Connections<'_> {
        Connections {
            inner: self.connections.lock(),
        }
    }

    /// Number of open connections
    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Locked view of the registry
pub(crate) struct Connections<'a> {
    inner: MutexGuard<'a, HashMap<ConnectionId, Outbox>>,
}

impl Connections<'_> {
    pub fn insert(&mut self, id: ConnectionId, outbox: Outbox) {
        self.inner.insert(id, outbox);
    }

    /// Remove a connection; returns false if it was already gone
    pub fn remove(&mut self, id: &ConnectionId) -> bool {
        self.inner.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Send to every connection, returning how many queues accepted the event
    pub fn send_all(&self, event: &ServerEvent) -> usize {
        self.send_filtered(event, None)
    }

    /// Send to every connection except `sender`
    pub fn send_except(&self, sender: &ConnectionId, event: &ServerEvent) -> usize {
        self.send_filtered(event, Some(sender))
    }

    fn send_filtered(&self, event: &ServerEvent, skip: Option<&ConnectionId>) -> usize {
        let mut delivered = 0;
        for (id, outbox) in self.inner.iter() {
            if Some(id) == skip {
                continue;
            }
            match outbox.send(event.clone()) {
                Ok(()) => delivered += 1,
                // Receiver already dropped; its disconnect will clean up the entry
                Err(_) => debug!(connection_id = %id, event = event.name(), "outbox closed, skipping"),
            }
        }
        delivered
    }
}
