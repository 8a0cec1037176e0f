//! Chat messages and log entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

use super::FeatureType;

/// Debug command that lists the models available to the API key.
pub const LIST_MODELS_COMMAND: &str = "LIST_MODELS";

/// Reply used when the model returns no candidate text.
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't generate a response.";

/// A validated user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage(String);

impl UserMessage {
    /// Trims and rejects blank input.
    pub fn new(text: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("message"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the message is the model-listing debug command.
    pub fn is_list_models_command(&self) -> bool {
        self.0.eq_ignore_ascii_case(LIST_MODELS_COMMAND)
    }
}

/// Builds the full prompt sent to the model.
pub fn compose_prompt(feature: &FeatureType, message: &UserMessage) -> String {
    format!("{}\n\nUser: {}", feature.system_prompt(), message.as_str())
}

/// Who authored a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }
}

/// Entry appended to a user's chat log for one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLogEntry {
    pub content: String,
    pub sender: Sender,
    pub timestamp: Timestamp,
}

impl ChatLogEntry {
    pub fn ai_reply(content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Ai,
            timestamp,
        }
    }
}
