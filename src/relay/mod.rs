//! Relay - connection set and fan-out
//!
//! Tracks open connections and broadcasts the three relay events:
//!
//! - `clients-total` to everyone after each connect and disconnect
//! - `chat-message` to everyone except the sender of a `message`
//! - `feedback` to everyone except its sender
//!
//! Payloads are forwarded verbatim; nothing is stored.

mod registry;

use serde_json::value::RawValue;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub use registry::{ConnectionId, ConnectionRegistry, Outbox};

use crate::types::{ClientEvent, ServerEvent};

/// Receiving half of a connection's outbound queue
pub type Inbox = mpsc::UnboundedReceiver<ServerEvent>;

/// In-memory broadcast relay
#[derive(Default)]
pub struct Relay {
    registry: ConnectionRegistry,
}

impl Relay {
    pub fn new() -> Self {
        Self {
            registry: ConnectionRegistry::new(),
        }
    }

    /// Register a new connection and announce the new total to everyone
    pub fn connect(&self) -> (ConnectionId, Inbox) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut conns = self.registry.lock();
        conns.insert(id, tx);
        let total = conns.len();
        conns.send_all(&ServerEvent::ClientsTotal(total));
        drop(conns);

        info!(connection_id = %id, clients_total = total, "client connected");
        (id, rx)
    }

    /// Remove a connection and announce the new total to those remaining
    ///
    /// Returns false when the connection was already removed, in which case
    /// nothing is broadcast.
    pub fn disconnect(&self, id: &ConnectionId) -> bool {
        let mut conns = self.registry.lock();
        if !conns.remove(id) {
            return false;
        }
        let total = conns.len();
        conns.send_all(&ServerEvent::ClientsTotal(total));
        drop(conns);

        info!(connection_id = %id, clients_total = total, "client disconnected");
        true
    }

    /// Relay a chat message to every other connection as `chat-message`
    pub fn message(&self, sender: &ConnectionId, payload: Box<RawValue>) -> usize {
        self.fan_out(sender, ServerEvent::ChatMessage(payload))
    }

    /// Relay a typing indicator to every other connection
    pub fn feedback(&self, sender: &ConnectionId, payload: Box<RawValue>) -> usize {
        self.fan_out(sender, ServerEvent::Feedback(payload))
    }

    /// Dispatch a decoded client event
    pub fn handle(&self, sender: &ConnectionId, event: ClientEvent) -> usize {
        match event {
            ClientEvent::Message(payload) => self.message(sender, payload),
            ClientEvent::Feedback(payload) => self.feedback(sender, payload),
        }
    }

    /// Number of currently open connections
    pub fn clients_total(&self) -> usize {
        self.registry.len()
    }

    fn fan_out(&self, sender: &ConnectionId, event: ServerEvent) -> usize {
        let delivered = self.registry.lock().send_except(sender, &event);
        debug!(sender_id = %sender, event = event.name(), delivered, "relayed event");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> Box<RawValue> {
        RawValue::from_string(json.to_string()).unwrap()
    }

    fn drain_totals(inbox: &mut Inbox) -> Vec<usize> {
        let mut totals = Vec::new();
        while let Ok(event) = inbox.try_recv() {
            if let ServerEvent::ClientsTotal(n) = event {
                totals.push(n);
            }
        }
        totals
    }

    #[test]
    fn test_sequential_connects_announce_totals() {
        let relay = Relay::new();

        let (_a, mut inbox_a) = relay.connect();
        let (_b, mut inbox_b) = relay.connect();
        let (_c, mut inbox_c) = relay.connect();

        assert_eq!(drain_totals(&mut inbox_a), vec![1, 2, 3]);
        assert_eq!(drain_totals(&mut inbox_b), vec![2, 3]);
        assert_eq!(drain_totals(&mut inbox_c), vec![3]);
    }

    #[test]
    fn test_disconnect_announces_to_remaining() {
        let relay = Relay::new();
        let (_a, mut inbox_a) = relay.connect();
        let (_b, mut inbox_b) = relay.connect();
        let (c, mut inbox_c) = relay.connect();
        drain_totals(&mut inbox_a);
        drain_totals(&mut inbox_b);
        drain_totals(&mut inbox_c);

        assert!(relay.disconnect(&c));

        assert_eq!(drain_totals(&mut inbox_a), vec![2]);
        assert_eq!(drain_totals(&mut inbox_b), vec![2]);
        assert!(drain_totals(&mut inbox_c).is_empty());
        assert_eq!(relay.clients_total(), 2);
    }

    #[test]
    fn test_double_disconnect_has_no_effect() {
        let relay = Relay::new();
        let (a, _inbox_a) = relay.connect();
        let (_b, mut inbox_b) = relay.connect();

        assert!(relay.disconnect(&a));
        drain_totals(&mut inbox_b);

        assert!(!relay.disconnect(&a));
        assert!(drain_totals(&mut inbox_b).is_empty());
        assert_eq!(relay.clients_total(), 1);
    }

    #[test]
    fn test_message_is_not_echoed_to_sender() {
        let relay = Relay::new();
        let (a, mut inbox_a) = relay.connect();
        let (_b, mut inbox_b) = relay.connect();
        let (_c, mut inbox_c) = relay.connect();
        for inbox in [&mut inbox_a, &mut inbox_b, &mut inbox_c] {
            drain_totals(inbox);
        }

        let payload = r#"{"name":"Bob","message":"hi","dateTime":"2024-05-01T10:00:00.000Z"}"#;
        let delivered = relay.message(&a, raw(payload));

        assert_eq!(delivered, 2);
        for inbox in [&mut inbox_b, &mut inbox_c] {
            match inbox.try_recv() {
                Ok(ServerEvent::ChatMessage(got)) => assert_eq!(got.get(), payload),
                other => panic!("expected chat-message, got {:?}", other),
            }
        }
        assert!(inbox_a.try_recv().is_err());
    }

    #[test]
    fn test_feedback_fans_out_except_sender() {
        let relay = Relay::new();
        let (_a, mut inbox_a) = relay.connect();
        let (b, mut inbox_b) = relay.connect();
        drain_totals(&mut inbox_a);
        drain_totals(&mut inbox_b);

        let delivered = relay.handle(&b, ClientEvent::Feedback(raw(r#"{"feedback":"typing"}"#)));

        assert_eq!(delivered, 1);
        assert!(matches!(inbox_a.try_recv(), Ok(ServerEvent::Feedback(p)) if p.get() == r#"{"feedback":"typing"}"#));
        assert!(inbox_b.try_recv().is_err());
    }

    #[test]
    fn test_lone_client_message_reaches_nobody() {
        let relay = Relay::new();
        let (a, mut inbox_a) = relay.connect();
        drain_totals(&mut inbox_a);

        assert_eq!(relay.message(&a, raw("\"hello\"")), 0);
        assert!(inbox_a.try_recv().is_err());
    }
}
