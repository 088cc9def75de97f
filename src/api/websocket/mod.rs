//! WebSocket endpoint for the relay
//!
//! Provides `/ws`. Each connection joins the relay on open and leaves it on
//! close or error; text frames carry `{"event", "data"}` envelopes.

pub mod handler;
pub mod state;

pub use handler::ws_handler;
pub use state::AppState;
