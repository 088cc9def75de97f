//! Shared application state for relay connections

use std::sync::Arc;

use crate::relay::{ConnectionId, Inbox, Relay};
use crate::types::ClientEvent;

/// State shared by every HTTP and WebSocket handler
pub struct AppState {
    /// The relay owning the connection set
    pub relay: Arc<Relay>,

    /// Unix timestamp when the server started
    pub started_at: i64,
}

impl AppState {
    pub fn new(relay: Arc<Relay>) -> Self {
        Self {
            relay,
            started_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Register a connection with the relay
    pub fn connect(&self) -> (ConnectionId, Inbox) {
        self.relay.connect()
    }

    pub fn disconnect(&self, id: &ConnectionId) -> bool {
        self.relay.disconnect(id)
    }

    /// Pass an inbound client event to the relay
    pub fn dispatch(&self, sender: &ConnectionId, event: ClientEvent) -> usize {
        self.relay.handle(sender, event)
    }

    pub fn clients_total(&self) -> usize {
        self.relay.clients_total()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(Relay::new()))
    }
}
