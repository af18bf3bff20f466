//! Core types for the chat widget.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChatResult;

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message ID (UUID)
    pub id: String,
    /// Who wrote the message
    pub author: Author,
    /// Message text
    pub text: String,
    /// When the message was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Author::User, text)
    }

    /// Create a new assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Author::Assistant, text)
    }

    fn new(author: Author, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}

/// Identifies one outstanding request to the collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Request state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "phase")]
pub enum SessionPhase {
    /// Ready to accept a new message
    #[default]
    Idle,
    /// One request is in flight
    AwaitingResponse { token: RequestToken },
}

/// A request the session has committed to and that must be issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub token: RequestToken,
    pub prompt: String,
}

/// The resolution of a pending request
#[derive(Debug)]
pub struct ChatReply {
    pub token: RequestToken,
    pub outcome: ChatResult<String>,
}

impl ChatReply {
    pub fn success(token: RequestToken, text: impl Into<String>) -> Self {
        Self { token, outcome: Ok(text.into()) }
    }

    pub fn failure(token: RequestToken, error: crate::error::ChatError) -> Self {
        Self { token, outcome: Err(error) }
    }
}
