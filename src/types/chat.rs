//! Payload types understood by the chat client
//!
//! The relay never parses these; it forwards whatever a client sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message as composed by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub name: String,
    pub message: String,
    #[serde(rename = "dateTime")]
    pub date_time: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(name: impl Into<String>, message: impl Into<String>, date_time: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            date_time,
        }
    }
}

/// Typing indicator payload; an empty string clears the indicator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackPayload {
    #[serde(default)]
    pub feedback: String,
}

impl FeedbackPayload {
    /// Indicator text announcing that `name` is typing
    pub fn typing(name: &str) -> Self {
        Self {
            feedback: format!("✍️ {} is typing...", name),
        }
    }

    /// Payload that clears the indicator on other clients
    pub fn clear() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_chat_message_uses_date_time_key() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let msg = ChatMessage::new("Bob", "hi", at);

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["name"], "Bob");
        assert_eq!(json["message"], "hi");
        assert!(json.get("dateTime").is_some());
    }

    #[test]
    fn test_chat_message_parses_browser_timestamp() {
        let json = r#"{"name":"Ann","message":"yo","dateTime":"2024-05-01T10:00:00.123Z"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.name, "Ann");
        assert_eq!(msg.date_time.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_typing_feedback_text() {
        assert_eq!(FeedbackPayload::typing("Bob").feedback, "✍️ Bob is typing...");
        assert!(FeedbackPayload::clear().feedback.is_empty());
    }
}
