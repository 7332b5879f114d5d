use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::MessageRole;

/// One exchanged chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Wall-clock "HH:MM" shown next to the bubble.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub timestamp: NaiveDateTime,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            role,
            content: content.into(),
            time: timestamp.format("%H:%M").to_string(),
            timestamp,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content, Local::now().naive_local())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content, Local::now().naive_local())
    }
}
