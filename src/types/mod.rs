//! Data types for the broadcast relay
//!
//! Wire envelopes shared by server and client, plus the chat payloads that
//! only clients interpret.

mod chat;
mod event;

pub use chat::{ChatMessage, FeedbackPayload};
pub use event::{names, ClientEvent, ProtocolError, ServerEvent};
