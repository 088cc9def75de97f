//! Terminal chat client
//!
//! - [`view`] holds screen state, the message list and the feedback line.
//! - [`typing`] debounces keystrokes into typing indicator updates.
//! - [`session`] maps key presses onto the view and outgoing relay events.
//! - [`render`] draws the current screen as text.
//! - [`terminal`] runs the raw-mode UI against a live relay.

pub mod render;
pub mod session;
pub mod terminal;
pub mod typing;
pub mod view;

pub use session::{Action, ClientSession, Key};
pub use terminal::run;
pub use typing::{TypingDebouncer, TypingSignal, TYPING_INTERVAL};
pub use view::{ChatView, ClientError, DisplayedMessage, Screen};
