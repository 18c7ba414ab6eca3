//! Conversation Messages
//!
//! A transcript is an ordered, append-only list of [`Message`]s. Its JSON form
//! is the persisted history: an array of
//! `{ "text", "isUser", "timestamp", "error" }` objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single turn of the conversation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Displayed content, verbatim
    pub text: String,

    /// `true` for the human, `false` for the assistant
    pub is_user: bool,

    /// Creation time (RFC 3339 on the wire)
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Produced by a failed chat request
    #[serde(default)]
    pub error: bool,
}

impl Message {
    /// Create a message stamped with the current time
    pub fn new(text: impl Into<String>, is_user: bool) -> Self {
        Self {
            text: text.into(),
            is_user,
            timestamp: Utc::now(),
            error: false,
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// Create an assistant message
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    /// Create an error-marked assistant message
    pub fn bot_error(text: impl Into<String>) -> Self {
        Self {
            error: true,
            ..Self::bot(text)
        }
    }

    /// Override the timestamp
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Ordered list of messages in chronological send order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted transcript
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize for persistence
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Drop every message
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hola");
        assert!(msg.is_user);
        assert!(!msg.error);
        assert_eq!(msg.text, "Hola");

        let err = Message::bot_error("Lo siento");
        assert!(!err.is_user);
        assert!(err.error);
    }

    #[test]
    fn test_wire_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let json = serde_json::to_value(Message::user("Hola").at(ts)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "text": "Hola",
                "isUser": true,
                "timestamp": "2024-03-01T12:30:00Z",
                "error": false,
            })
        );
    }

    #[test]
    fn test_transcript_restores_in_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("¿Qué playas hay en Rincón?"));
        transcript.push(Message::bot("Domes y Sandy Beach son muy populares."));
        transcript.push(Message::bot_error("Lo siento"));

        let restored = Transcript::from_json(&transcript.to_json().unwrap()).unwrap();

        assert_eq!(restored, transcript);
        let flags: Vec<_> = restored.messages().iter().map(|m| (m.is_user, m.error)).collect();
        assert_eq!(flags, vec![(true, false), (false, false), (false, true)]);
    }

    #[test]
    fn test_browser_timestamps_are_reconstructed() {
        // Date objects stringify with millisecond precision
        let json = r#"[{"text":"Hola","isUser":true,"timestamp":"2024-03-01T12:30:00.000Z"}]"#;
        let transcript = Transcript::from_json(json).unwrap();
        let msg = &transcript.messages()[0];

        assert_eq!(msg.timestamp, Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap());
        assert!(!msg.error);
    }

    #[test]
    fn test_missing_timestamp_defaults_to_now() {
        let before = Utc::now();
        let transcript = Transcript::from_json(r#"[{"text":"Hola","isUser":false}]"#).unwrap();

        assert!(transcript.messages()[0].timestamp >= before);
    }
}
