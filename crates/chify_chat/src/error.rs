//! Error types for the chat system.

use thiserror::Error;

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Failures of the text-generation collaborator.
///
/// None of these ever reach the presentation layer: the session maps every
/// variant onto the same apology message.
#[derive(Error, Debug)]
pub enum ChatError {
    /// No credential was found in the hosting environment
    #[error("Generative API credential not configured. Set {}", .0.join(" or "))]
    MissingCredential(Vec<String>),

    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status
    #[error("Generative API error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The API answered but the reply carried no text
    #[error("Generative API returned no text")]
    EmptyResponse,

    /// The reply body could not be decoded
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The request task was dropped before it resolved
    #[error("Request cancelled before completion")]
    Cancelled,
}

impl ChatError {
    /// Whether another attempt might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
