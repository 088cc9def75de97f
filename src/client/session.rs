//! Client session: key handling on top of the view and typing debouncer

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::debug;

use super::typing::{TypingDebouncer, TypingSignal};
use super::view::{ChatView, Screen};
use crate::types::{ClientEvent, FeedbackPayload, ProtocolError, ServerEvent};

/// Terminal-independent key input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Quit,
}

/// What the terminal loop should do after an input
#[derive(Debug)]
pub enum Action {
    Continue,
    Send(ClientEvent),
    Quit,
}

#[derive(Debug, Default)]
pub struct ClientSession {
    view: ChatView,
    input: String,
    typing: TypingDebouncer,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_typing(typing: TypingDebouncer) -> Self {
        Self {
            typing,
            ..Self::default()
        }
    }

    pub fn view(&self) -> &ChatView {
        &self.view
    }

    /// Text currently in the input line
    pub fn input(&self) -> &str {
        &self.input
    }

    /// When the pending typing clear is due
    pub fn typing_deadline(&self) -> Option<Instant> {
        self.typing.deadline()
    }

    /// Handle a key press
    ///
    /// `now` drives the typing debounce, `wall` stamps outgoing messages.
    pub fn on_key(
        &mut self,
        key: Key,
        now: Instant,
        wall: DateTime<Utc>,
    ) -> Result<Action, ProtocolError> {
        if key == Key::Quit {
            return Ok(Action::Quit);
        }

        match self.view.screen() {
            Screen::Landing => {
                if key == Key::Enter {
                    if let Err(e) = self.view.join() {
                        debug!(error = %e, "join ignored");
                    }
                }
                Ok(Action::Continue)
            }
            Screen::NameEntry => {
                if key == Key::Enter {
                    if self.view.enter_name(&self.input).is_ok() {
                        self.input.clear();
                    }
                } else {
                    self.edit(key);
                }
                Ok(Action::Continue)
            }
            Screen::Chat => self.on_chat_key(key, now, wall),
        }
    }

    fn on_chat_key(
        &mut self,
        key: Key,
        now: Instant,
        wall: DateTime<Utc>,
    ) -> Result<Action, ProtocolError> {
        if key == Key::Enter {
            return match self.view.submit(&self.input, wall) {
                Ok(message) => {
                    self.input.clear();
                    Ok(Action::Send(ClientEvent::message(&message)?))
                }
                Err(_) => Ok(Action::Continue),
            };
        }

        self.edit(key);
        match self.typing.keystroke(now) {
            Some(TypingSignal::Typing) => Ok(Action::Send(ClientEvent::feedback(
                &FeedbackPayload::typing(self.view.name()),
            )?)),
            _ => Ok(Action::Continue),
        }
    }

    /// Check the typing timer; sends the clearing feedback once typing pauses
    pub fn on_tick(&mut self, now: Instant) -> Result<Action, ProtocolError> {
        match self.typing.poll(now) {
            Some(TypingSignal::Clear) => Ok(Action::Send(ClientEvent::feedback(
                &FeedbackPayload::clear(),
            )?)),
            _ => Ok(Action::Continue),
        }
    }

    pub fn on_event(&mut self, event: &ServerEvent) {
        self.view.apply(event);
    }

    fn edit(&mut self, key: Key) {
        match key {
            Key::Char(c) => self.input.push(c),
            Key::Backspace => {
                self.input.pop();
            }
            Key::Enter | Key::Quit => {}
        }
    }
}
