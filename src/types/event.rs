//! Wire events exchanged over the relay WebSocket
//!
//! Every text frame carries one envelope of the form
//! `{"event": "<name>", "data": <payload>}`. Payloads of relayed events are
//! kept as raw JSON so they reach other clients byte-for-byte.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;

/// Event names used on the wire
pub mod names {
    pub const CLIENTS_TOTAL: &str = "clients-total";
    pub const CHAT_MESSAGE: &str = "chat-message";
    pub const MESSAGE: &str = "message";
    pub const FEEDBACK: &str = "feedback";
}

/// Errors produced while decoding or encoding an envelope
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("'{event}' payload is not {expected}")]
    InvalidPayload {
        event: &'static str,
        expected: &'static str,
    },
}

/// Envelope as it arrives on the socket, before the event name is checked
#[derive(Debug, Deserialize)]
struct IncomingFrame {
    event: String,
    #[serde(default)]
    data: Option<Box<RawValue>>,
}

impl IncomingFrame {
    fn parse(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Payload of the frame; a missing `data` field counts as `null`
    fn into_payload(self) -> Result<Box<RawValue>, ProtocolError> {
        match self.data {
            Some(raw) => Ok(raw),
            None => Ok(null_payload()?),
        }
    }
}

fn null_payload() -> Result<Box<RawValue>, serde_json::Error> {
    RawValue::from_string("null".to_string())
}

/// Events a client sends to the relay
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// A chat message to relay as `chat-message`
    Message(Box<RawValue>),

    /// A typing indicator update
    Feedback(Box<RawValue>),
}

impl ClientEvent {
    /// Build a `message` event from any serializable payload
    pub fn message<T: Serialize>(payload: &T) -> Result<Self, ProtocolError> {
        Ok(Self::Message(serde_json::value::to_raw_value(payload)?))
    }

    /// Build a `feedback` event from any serializable payload
    pub fn feedback<T: Serialize>(payload: &T) -> Result<Self, ProtocolError> {
        Ok(Self::Feedback(serde_json::value::to_raw_value(payload)?))
    }

    /// Decode a text frame received from a client
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let frame = IncomingFrame::parse(text)?;
        match frame.event.as_str() {
            names::MESSAGE => Ok(Self::Message(frame.into_payload()?)),
            names::FEEDBACK => Ok(Self::Feedback(frame.into_payload()?)),
            _ => Err(ProtocolError::UnknownEvent(frame.event)),
        }
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Message(_) => names::MESSAGE,
            Self::Feedback(_) => names::FEEDBACK,
        }
    }
}

/// Events the relay pushes to clients
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Number of currently connected clients
    ClientsTotal(usize),

    /// A message relayed from another client
    ChatMessage(Box<RawValue>),

    /// A typing indicator relayed from another client
    Feedback(Box<RawValue>),
}

impl ServerEvent {
    /// Decode a text frame received from the relay
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let frame = IncomingFrame::parse(text)?;
        match frame.event.as_str() {
            names::CLIENTS_TOTAL => {
                let payload = frame.into_payload()?;
                let total = serde_json::from_str::<usize>(payload.get()).map_err(|_| {
                    ProtocolError::InvalidPayload {
                        event: names::CLIENTS_TOTAL,
                        expected: "a non-negative integer",
                    }
                })?;
                Ok(Self::ClientsTotal(total))
            }
            names::CHAT_MESSAGE => Ok(Self::ChatMessage(frame.into_payload()?)),
            names::FEEDBACK => Ok(Self::Feedback(frame.into_payload()?)),
            _ => Err(ProtocolError::UnknownEvent(frame.event)),
        }
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ClientsTotal(_) => names::CLIENTS_TOTAL,
            Self::ChatMessage(_) => names::CHAT_MESSAGE,
            Self::Feedback(_) => names::FEEDBACK,
        }
    }
}
