//! Conversational session state machine.
//!
//! The session never performs I/O. [`ChatSession::begin_send`] commits to a
//! request and hands back a [`PendingRequest`]; whoever issues it feeds the
//! result back through [`ChatSession::complete`]. At most one request is in
//! flight, identified by its [`RequestToken`].

use tracing::{debug, info, warn};

use crate::persona::{FALLBACK_REPLY, GREETING};
use crate::types::{ChatMessage, ChatReply, PendingRequest, RequestToken, SessionPhase};

/// Message history plus request state of the chat widget
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    phase: SessionPhase,
    next_token: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Create a session seeded with the standard greeting
    pub fn new() -> Self {
        Self::with_greeting(GREETING)
    }

    /// Create a session seeded with a custom greeting
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(greeting)],
            phase: SessionPhase::Idle,
            next_token: 1,
        }
    }

    /// Messages in the order they were appended
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether a request is in flight
    pub fn is_awaiting(&self) -> bool {
        matches!(self.phase, SessionPhase::AwaitingResponse { .. })
    }

    /// Token of the in-flight request, if any
    pub fn pending_token(&self) -> Option<RequestToken> {
        match self.phase {
            SessionPhase::AwaitingResponse { token } => Some(token),
            SessionPhase::Idle => None,
        }
    }

    /// Accept user text and commit to a request.
    ///
    /// Returns `None` without touching any state when the text is blank or
    /// a request is already in flight. Otherwise the trimmed text is
    /// appended as a user message and the caller must issue the returned
    /// request exactly once.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingRequest> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return None;
        }
        if let Some(token) = self.pending_token() {
            debug!(%token, "Ignoring send while awaiting a response");
            return None;
        }

        let token = RequestToken(self.next_token);
        self.next_token += 1;

        self.messages.push(ChatMessage::user(prompt));
        self.phase = SessionPhase::AwaitingResponse { token };
        info!(%token, chars = prompt.len(), "Chat request issued");

        Some(PendingRequest {
            token,
            prompt: prompt.to_string(),
        })
    }

    /// Apply the resolution of a request.
    ///
    /// Only the in-flight token is accepted; anything else is a stale reply
    /// and is dropped. Failures are logged and replaced by the fallback
    /// apology, so this never reports an error. Returns whether the reply
    /// was applied.
    pub fn complete(&mut self, reply: ChatReply) -> bool {
        if self.pending_token() != Some(reply.token) {
            debug!(token = %reply.token, "Dropping stale chat reply");
            return false;
        }

        let text = match reply.outcome {
            Ok(text) => text,
            Err(e) => {
                warn!(token = %reply.token, "Chat request failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        };

        self.messages.push(ChatMessage::assistant(text));
        self.phase = SessionPhase::Idle;
        true
    }
}
