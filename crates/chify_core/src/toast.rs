//! Auto-expiring notifications.
//!
//! Every toast owns one timer task that reports its expiry on the queue's
//! channel after the configured TTL. The owner of the queue applies the
//! expiry with [`ToastQueue::expire`]. Dismissing a toast aborts its timer.
//! Removal is idempotent, so an expiry that raced a dismiss is harmless.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Default lifetime of a toast
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(5000);

/// Opaque unique toast identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToastId(uuid::Uuid);

impl ToastId {
    fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Success,
    Error,
}

/// A visible notification
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    #[serde(skip)]
    pub created_at: Instant,
}

pub struct ToastQueue {
    toasts: Vec<Toast>,
    timers: HashMap<ToastId, JoinHandle<()>>,
    ttl: Duration,
    /// Oldest toasts are dropped beyond this count; `None` is unbounded.
    max_visible: Option<usize>,
    expiries_tx: mpsc::UnboundedSender<ToastId>,
    expiries_rx: mpsc::UnboundedReceiver<ToastId>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        let (expiries_tx, expiries_rx) = mpsc::unbounded_channel();
        Self {
            toasts: Vec::new(),
            timers: HashMap::new(),
            ttl,
            max_visible: None,
            expiries_tx,
            expiries_rx,
        }
    }

    /// Cap the number of visible toasts
    pub fn with_max_visible(mut self, max: Option<usize>) -> Self {
        self.max_visible = max.filter(|m| *m > 0);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Visible toasts in creation order
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Show a notification and start its expiry timer.
    ///
    /// Must be called within a tokio runtime.
    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        let id = ToastId::new();
        let message = message.into();
        debug!(%id, ?kind, "Toast shown: {}", message);

        self.toasts.push(Toast {
            id,
            message,
            kind,
            created_at: Instant::now(),
        });
        self.timers.insert(id, self.spawn_timer(id));

        if let Some(max) = self.max_visible {
            while self.toasts.len() > max {
                let oldest = self.toasts.remove(0);
                self.abort_timer(oldest.id);
                debug!(id = %oldest.id, "Toast dropped over cap");
            }
        }

        id
    }

    pub fn notify_success(&mut self, message: impl Into<String>) -> ToastId {
        self.notify(message, ToastKind::Success)
    }

    pub fn notify_error(&mut self, message: impl Into<String>) -> ToastId {
        self.notify(message, ToastKind::Error)
    }

    /// Remove a toast early and cancel its timer. Absent ids are ignored.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        self.abort_timer(id);
        self.remove(id)
    }

    /// Apply a fired timer. Absent ids are ignored.
    pub fn expire(&mut self, id: ToastId) -> bool {
        self.timers.remove(&id);
        let removed = self.remove(id);
        if removed {
            debug!(%id, "Toast expired");
        }
        removed
    }

    /// Wait for the next timer to fire.
    ///
    /// Pending forever while no timers are running.
    pub async fn next_expiry(&mut self) -> Option<ToastId> {
        self.expiries_rx.recv().await
    }

    fn remove(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    fn abort_timer(&mut self, id: ToastId) {
        if let Some(timer) = self.timers.remove(&id) {
            timer.abort();
        }
    }

    fn spawn_timer(&self, id: ToastId) -> JoinHandle<()> {
        let tx = self.expiries_tx.clone();
        let deadline = Instant::now() + self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(id);
        })
    }
}

impl Drop for ToastQueue {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}
