//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
}

impl MessageRole {
    /// Wire name used by chat-completion APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single message in the conversation log.
///
/// Messages are immutable once created. Ids are UUID v7, so they sort in
/// creation order within a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Id of the artifact produced by this turn, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_ref: Option<String>,
}

impl Message {
    /// Creates a user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content.into(), None)
    }

    /// Creates an assistant message, optionally referencing an artifact.
    pub fn assistant(content: impl Into<String>, artifact_ref: Option<String>) -> Self {
        Self::new(MessageRole::Assistant, content.into(), artifact_ref)
    }

    fn new(role: MessageRole, content: String, artifact_ref: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            role,
            content,
            timestamp: Utc::now(),
            artifact_ref,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
