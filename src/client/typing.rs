//! Typing indicator debouncer
//!
//! Turns a stream of keystrokes into at most one "is typing" emission per
//! interval of continued typing, followed by a single clear once typing pauses
//! for a full interval. Time is passed in so the logic stays deterministic.

use std::time::Duration;

use tokio::time::Instant;

/// Default pause before the indicator is cleared
pub const TYPING_INTERVAL: Duration = Duration::from_secs(1);

/// What the debouncer wants sent to the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingSignal {
    /// Announce that the user is typing
    Typing,
    /// Clear the indicator
    Clear,
}

/// Debounce state for one input field
#[derive(Debug)]
pub struct TypingDebouncer {
    interval: Duration,
    /// When the last `Typing` signal went out
    last_announced: Option<Instant>,
    /// When the pending `Clear` is due
    clear_at: Option<Instant>,
}

impl TypingDebouncer {
    pub fn new() -> Self {
        Self::with_interval(TYPING_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last_announced: None,
            clear_at: None,
        }
    }

    /// Record a keystroke; returns `Typing` when an announcement is due
    pub fn keystroke(&mut self, now: Instant) -> Option<TypingSignal> {
        self.clear_at = Some(now + self.interval);

        let due = match self.last_announced {
            Some(at) => now.duration_since(at) >= self.interval,
            None => true,
        };
        if due {
            self.last_announced = Some(now);
            Some(TypingSignal::Typing)
        } else {
            None
        }
    }

    /// Check the pause timer; returns `Clear` once typing has paused long enough
    pub fn poll(&mut self, now: Instant) -> Option<TypingSignal> {
        match self.clear_at {
            Some(at) if now >= at => {
                self.clear_at = None;
                self.last_announced = None;
                Some(TypingSignal::Clear)
            }
            _ => None,
        }
    }

    /// Deadline of the pending clear, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.clear_at
    }
}

impl Default for TypingDebouncer {
    fn default() -> Self {
        Self::new()
    }
}
