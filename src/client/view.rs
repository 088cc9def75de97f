//! Chat client view state
//!
//! Three linear screens: landing, name entry, chat. The view holds the
//! displayed message list, the connected-clients count and the single
//! feedback line, and reacts to relay events.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::types::{ChatMessage, FeedbackPayload, ServerEvent};

/// Input the view refuses to act on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("action not available on the {0:?} screen")]
    WrongScreen(Screen),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    NameEntry,
    Chat,
}

/// A message in the chat list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedMessage {
    pub message: ChatMessage,
    /// Sent by this client rather than received through the relay
    pub is_own: bool,
}

#[derive(Debug)]
pub struct ChatView {
    screen: Screen,
    name: String,
    clients_total: usize,
    messages: Vec<DisplayedMessage>,
    feedback: String,
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            screen: Screen::Landing,
            name: String::new(),
            clients_total: 0,
            messages: Vec::new(),
            feedback: String::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clients_total(&self) -> usize {
        self.clients_total
    }

    pub fn messages(&self) -> &[DisplayedMessage] {
        &self.messages
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// Landing -> name entry
    pub fn join(&mut self) -> Result<(), ClientError> {
        self.expect_screen(Screen::Landing)?;
        self.screen = Screen::NameEntry;
        Ok(())
    }

    /// Name entry -> chat; blank names are rejected
    pub fn enter_name(&mut self, name: &str) -> Result<(), ClientError> {
        self.expect_screen(Screen::NameEntry)?;
        if name.trim().is_empty() {
            return Err(ClientError::EmptyName);
        }
        self.name = name.to_string();
        self.screen = Screen::Chat;
        Ok(())
    }

    /// Compose an outgoing message and append it locally as our own
    pub fn submit(&mut self, text: &str, now: DateTime<Utc>) -> Result<ChatMessage, ClientError> {
        self.expect_screen(Screen::Chat)?;
        if text.trim().is_empty() {
            return Err(ClientError::EmptyMessage);
        }
        let message = ChatMessage::new(self.name.clone(), text, now);
        self.push(message.clone(), true);
        Ok(message)
    }

    /// Apply an event pushed by the relay
    pub fn apply(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::ClientsTotal(total) => self.clients_total = *total,
            ServerEvent::ChatMessage(raw) => match serde_json::from_str::<ChatMessage>(raw.get()) {
                Ok(message) => self.push(message, false),
                Err(e) => debug!(error = %e, "skipping unreadable chat-message"),
            },
            ServerEvent::Feedback(raw) => match serde_json::from_str::<FeedbackPayload>(raw.get()) {
                Ok(payload) => self.feedback = payload.feedback,
                Err(e) => debug!(error = %e, "skipping unreadable feedback"),
            },
        }
    }

    fn push(&mut self, message: ChatMessage, is_own: bool) {
        self.feedback.clear();
        self.messages.push(DisplayedMessage { message, is_own });
    }

    fn expect_screen(&self, screen: Screen) -> Result<(), ClientError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(ClientError::WrongScreen(self.screen))
        }
    }
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::value::RawValue;

    fn raw(json: &str) -> Box<RawValue> {
        RawValue::from_string(json.to_string()).unwrap()
    }

    fn chat_view(name: &str) -> ChatView {
        let mut view = ChatView::new();
        view.join().unwrap();
        view.enter_name(name).unwrap();
        view
    }

    #[test]
    fn test_screens_advance_linearly() {
        let mut view = ChatView::new();
        assert_eq!(view.screen(), Screen::Landing);

        assert_eq!(view.enter_name("Ann"), Err(ClientError::WrongScreen(Screen::Landing)));
        view.join().unwrap();
        assert_eq!(view.screen(), Screen::NameEntry);

        assert_eq!(view.enter_name("   "), Err(ClientError::EmptyName));
        assert_eq!(view.screen(), Screen::NameEntry);

        view.enter_name("Ann").unwrap();
        assert_eq!(view.screen(), Screen::Chat);
        assert_eq!(view.join(), Err(ClientError::WrongScreen(Screen::Chat)));
    }

    #[test]
    fn test_submit_appends_own_message() {
        let mut view = chat_view("Ann");
        let now = Utc::now();

        let sent = view.submit("hello", now).unwrap();

        assert_eq!(sent.name, "Ann");
        assert_eq!(sent.date_time, now);
        assert_eq!(view.messages().len(), 1);
        assert!(view.messages()[0].is_own);
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut view = chat_view("Ann");
        assert_eq!(view.submit("  \t", Utc::now()), Err(ClientError::EmptyMessage));
        assert!(view.messages().is_empty());
    }

    #[test]
    fn test_received_message_clears_feedback() {
        let mut view = chat_view("Ann");
        view.apply(&ServerEvent::Feedback(raw(r#"{"feedback":"✍️ Bob is typing..."}"#)));
        assert_eq!(view.feedback(), "✍️ Bob is typing...");

        view.apply(&ServerEvent::ChatMessage(raw(
            r#"{"name":"Bob","message":"hi","dateTime":"2024-05-01T10:00:00Z"}"#,
        )));

        assert_eq!(view.feedback(), "");
        assert_eq!(view.messages().len(), 1);
        assert!(!view.messages()[0].is_own);
        assert_eq!(view.messages()[0].message.name, "Bob");
    }

    #[test]
    fn test_unreadable_chat_message_skipped() {
        let mut view = chat_view("Ann");
        view.apply(&ServerEvent::ChatMessage(raw(r#""just a string""#)));
        assert!(view.messages().is_empty());
    }

    #[test]
    fn test_clients_total_tracked_on_any_screen() {
        let mut view = ChatView::new();
        view.apply(&ServerEvent::ClientsTotal(4));
        assert_eq!(view.clients_total(), 4);
    }
}
