//! Mock text generator for testing and offline use.
//!
//! Replays scripted replies in order, records every prompt, and can hold
//! replies back until the test releases them.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Semaphore;

use crate::error::{ChatError, ChatResult};
use crate::llm::TextGenerator;

/// Scripted outcome for one call
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Failure(String),
}

/// Mock collaborator.
///
/// Clones share state, so a test can keep a handle after giving one to the
/// widget.
#[derive(Clone)]
pub struct MockGenerator {
    /// Replies returned in order; `default_reply` once exhausted.
    replies: Arc<RwLock<VecDeque<MockReply>>>,
    default_reply: Arc<RwLock<MockReply>>,
    /// Prompts received, in call order.
    prompts: Arc<RwLock<Vec<String>>>,
    calls: Arc<AtomicUsize>,
    /// When set, each call waits for one permit before answering.
    gate: Option<Arc<Semaphore>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(RwLock::new(VecDeque::new())),
            default_reply: Arc::new(RwLock::new(MockReply::Text(
                "Gentle stretching and rest usually help. Please book a Chify specialist for a personalized plan.".to_string(),
            ))),
            prompts: Arc::new(RwLock::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    /// Queue a successful reply
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.replies.write().push_back(MockReply::Text(text.into()));
        self
    }

    /// Queue a failing call
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.replies.write().push_back(MockReply::Failure(message.into()));
        self
    }

    /// Reply used once the queue is empty
    pub fn with_default(self, reply: MockReply) -> Self {
        *self.default_reply.write() = reply;
        self
    }

    /// Hold every reply until [`MockGenerator::release`] is called
    pub fn held(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let `n` held calls answer
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> ChatResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.write().push(prompt.to_string());

        if let Some(gate) = &self.gate {
            gate.acquire().await.map_err(|_| ChatError::Cancelled)?.forget();
        }

        let reply = self
            .replies
            .write()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.read().clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Failure(message) => Err(ChatError::Network(message)),
        }
    }
}
