//! Broadcast Relay
//!
//! A real-time WebSocket relay: every chat message or typing indicator a
//! client sends is rebroadcast to all other connected clients, together with
//! a live count of connected clients. State lives in memory only.
//!
//! # Modules
//!
//! - `relay`: connection set and fan-out-except-sender
//! - `types`: wire envelopes and chat payloads
//! - `api`: Axum router, liveness endpoints and the `/ws` handler
//! - `server`: listener binding and graceful shutdown
//! - `config`: command-line and environment configuration
//! - `client`: terminal chat client
//! - `utils`: relative timestamps
//!
//! # Example
//!
//! ```no_run
//! use broadcast_relay::{RelayConfig, RelayServer};
//!
//! #[tokio::main]
//! async fn main() -> broadcast_relay::RelayResult<()> {
//!     let server = RelayServer::bind(RelayConfig::default()).await?;
//!     server.run_until_ctrl_c().await
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod relay;
pub mod server;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{CorsPolicy, RelayConfig};
pub use error::{RelayError, RelayResult};
pub use relay::{ConnectionId, Relay};
pub use server::RelayServer;
pub use types::{ChatMessage, ClientEvent, FeedbackPayload, ServerEvent};
