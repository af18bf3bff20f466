//! Error types for the core module.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised at the host boundary.
///
/// Coordinator state transitions themselves never fail; these come from
/// looking things up by name, loading configuration (file and parse
/// failures carry the path in `Config`) or building the chat client.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Unknown view: {0} (expected one of home, about, services, expertise, contact)")]
    InvalidView(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Chat error: {0}")]
    Chat(#[from] chify_chat::ChatError),
}
