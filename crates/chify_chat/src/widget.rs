//! Floating chat widget.
//!
//! Couples a [`ChatSession`] with the collaborator that answers it. Each
//! accepted send spawns exactly one request task; its result comes back on
//! the widget's reply channel and is applied by the owner of the widget.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::ChatError;
use crate::llm::TextGenerator;
use crate::session::ChatSession;
use crate::types::{ChatMessage, ChatReply, PendingRequest};

pub struct ChatWidget {
    session: ChatSession,
    open: bool,
    generator: Arc<dyn TextGenerator>,
    replies_tx: mpsc::UnboundedSender<ChatReply>,
    replies_rx: mpsc::UnboundedReceiver<ChatReply>,
}

impl ChatWidget {
    /// Create a closed widget with a freshly seeded session
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_session(ChatSession::new(), generator)
    }

    pub fn with_session(session: ChatSession, generator: Arc<dyn TextGenerator>) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            session,
            open: false,
            generator,
            replies_tx,
            replies_rx,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.session.messages()
    }

    pub fn is_awaiting(&self) -> bool {
        self.session.is_awaiting()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the panel. An in-flight request keeps running.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Send user text. Returns whether a request was issued.
    pub fn send(&mut self, text: &str) -> bool {
        match self.session.begin_send(text) {
            Some(pending) => {
                self.dispatch(pending);
                true
            }
            None => false,
        }
    }

    /// Wait for the next request to resolve
    pub async fn next_reply(&mut self) -> Option<ChatReply> {
        self.replies_rx.recv().await
    }

    /// Apply a resolved request. Returns whether it changed the session.
    pub fn apply(&mut self, reply: ChatReply) -> bool {
        self.session.complete(reply)
    }

    /// Send and wait for the reply, returning the assistant message.
    ///
    /// Returns `None` when the send was rejected.
    pub async fn send_and_wait(&mut self, text: &str) -> Option<&ChatMessage> {
        if !self.send(text) {
            return None;
        }
        while self.session.is_awaiting() {
            let reply = self.next_reply().await?;
            self.apply(reply);
        }
        self.session.messages().last()
    }

    // Spawn the request. The outer task guarantees a reply even if the
    // generator panics, so the session can never stay stuck awaiting.
    fn dispatch(&self, pending: PendingRequest) {
        let generator = Arc::clone(&self.generator);
        let tx = self.replies_tx.clone();
        let PendingRequest { token, prompt } = pending;

        tokio::spawn(async move {
            let request = tokio::spawn(async move { generator.generate(&prompt).await });
            let outcome = match request.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    debug!(%token, "Chat request task ended abnormally: {}", e);
                    Err(ChatError::Cancelled)
                }
            };
            if tx.send(ChatReply { token, outcome }).is_err() {
                debug!(%token, "Chat widget dropped before reply arrived");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockTextGenerator;
    use crate::mock::MockGenerator;
    use crate::persona::{FALLBACK_REPLY, GREETING};
    use crate::types::Author;

    #[tokio::test]
    async fn test_send_issues_exactly_one_request() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt: &str| prompt == "Hello")
            .times(1)
            .returning(|_| Ok("Try icing the knee".to_string()));

        let mut widget = ChatWidget::new(Arc::new(generator));
        assert!(widget.send("Hello"));
        assert!(!widget.send("ignored"));

        let reply = widget.next_reply().await.unwrap();
        assert!(widget.apply(reply));

        let texts: Vec<_> = widget.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec![GREETING, "Hello", "Try icing the knee"]);
        assert!(!widget.is_awaiting());
    }

    #[tokio::test]
    async fn test_blank_send_issues_nothing() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(0);

        let mut widget = ChatWidget::new(Arc::new(generator));
        assert!(!widget.send(""));
        assert!(!widget.send("   "));
        assert_eq!(widget.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_becomes_fallback_message() {
        let mock = MockGenerator::new().with_failure("connection refused");
        let mut widget = ChatWidget::new(Arc::new(mock));

        let reply = widget.send_and_wait("Hello").await.unwrap();
        assert_eq!(reply.author, Author::Assistant);
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert!(!widget.is_awaiting());
    }

    #[tokio::test]
    async fn test_panicking_generator_still_resolves() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| panic!("generator crashed"));
        let mut widget = ChatWidget::new(Arc::new(generator));

        let reply = widget.send_and_wait("Hello").await.unwrap();
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert!(!widget.is_awaiting());
    }

    #[tokio::test]
    async fn test_held_request_keeps_session_awaiting() {
        let mock = MockGenerator::new().with_reply("Rest and hydrate").held();
        let mut widget = ChatWidget::new(Arc::new(mock.clone()));

        assert!(widget.send("Hello"));
        assert!(!widget.send("second"));
        assert!(widget.is_awaiting());
        assert_eq!(widget.messages().len(), 2);

        mock.release(1);
        let reply = widget.next_reply().await.unwrap();
        widget.apply(reply);

        assert_eq!(widget.messages()[2].text, "Rest and hydrate");
        assert_eq!(mock.prompts(), vec!["Hello"]);
    }

    #[tokio::test]
    async fn test_closing_panel_does_not_cancel_request() {
        let mock = MockGenerator::new().with_reply("still delivered");
        let mut widget = ChatWidget::new(Arc::new(mock));

        widget.open();
        assert!(widget.send("Hello"));
        widget.close();
        assert!(!widget.is_open());

        let reply = widget.next_reply().await.unwrap();
        assert!(widget.apply(reply));
        assert_eq!(widget.messages().last().unwrap().text, "still delivered");
    }

    #[tokio::test]
    async fn test_toggle() {
        let mut widget = ChatWidget::new(Arc::new(MockGenerator::new()));
        assert!(!widget.is_open());
        widget.toggle();
        assert!(widget.is_open());
        widget.toggle();
        assert!(!widget.is_open());
    }
}
