//! # chify_chat - Chat widget for the Chify site
//!
//! This crate provides the floating "Rehab AI Guide" chat:
//! - An append-only message history seeded with a greeting
//! - A two-state request machine (idle / awaiting response)
//! - A stateless text-generation collaborator (Gemini REST API)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐  send   ┌─────────────────┐  generate  ┌─────────────────┐
//! │   ChatWidget    │────────▶│   ChatSession   │───────────▶│  TextGenerator  │
//! └────────▲────────┘         └─────────────────┘            └────────┬────────┘
//!          │                      ChatReply (token-guarded)           │
//!          └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Collaborator failures never escape: the session replaces them with a
//! fixed apology message.

pub mod error;
pub mod llm;
pub mod mock;
pub mod persona;
pub mod session;
pub mod types;
pub mod widget;

pub use error::*;
pub use llm::{GeminiAdapter, GeminiConfig, TextGenerator, DEFAULT_MODEL};
pub use mock::{MockGenerator, MockReply};
pub use persona::*;
pub use session::*;
pub use types::*;
pub use widget::*;
