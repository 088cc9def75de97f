//! Error types for the relay and the chat client

use std::io;

use thiserror::Error;

use crate::types::ProtocolError;

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors surfaced at the crate boundary
#[derive(Debug, Error)]
pub enum RelayError {
    /// Socket, terminal or listener I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A configured CORS origin is not a valid header value
    #[error("invalid allowed origin '{origin}': {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// A frame could not be encoded or decoded
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The client-side WebSocket failed
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
