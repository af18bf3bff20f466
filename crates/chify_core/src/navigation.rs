//! Navigation state.
//!
//! Tracks the active [`View`] and resets the scroll position on every
//! navigation request, including one to the view already shown.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::view::View;

/// Scroll control implemented by the presentation layer
pub trait Viewport: Send + Sync {
    /// Jump to the top of the page
    fn scroll_to_top(&self);
}

/// Viewport that only counts scroll resets.
///
/// Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct RecordingViewport {
    resets: Arc<AtomicUsize>,
}

impl RecordingViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scroll resets so far
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl Viewport for RecordingViewport {
    fn scroll_to_top(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Navigation {
    current: View,
    viewport: Arc<dyn Viewport>,
}

impl Navigation {
    /// Start on the home view
    pub fn new(viewport: Arc<dyn Viewport>) -> Self {
        Self {
            current: View::Home,
            viewport,
        }
    }

    pub fn current_view(&self) -> View {
        self.current
    }

    /// Show `view` and scroll to the top. Returns the previous view.
    pub fn navigate(&mut self, view: View) -> View {
        let previous = std::mem::replace(&mut self.current, view);
        self.viewport.scroll_to_top();
        info!(from = %previous, to = %view, "Navigated");
        previous
    }
}
