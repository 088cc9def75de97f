//! Utility functions and helpers
//!
//! This module contains timestamp formatting used by the chat client.

pub mod time;

pub use time::from_now;
