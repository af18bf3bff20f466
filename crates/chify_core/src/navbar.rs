//! Navbar presentation state.

use serde::Serialize;

use crate::view::View;

/// Scroll offset (px) past which the navbar switches to its solid style
pub const SCROLL_THRESHOLD: f64 = 20.0;

/// A navbar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub view: View,
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navbar {
    scrolled: bool,
    menu_open: bool,
}

impl Navbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the page scroll offset. Returns whether the style changed.
    pub fn on_scroll(&mut self, offset_y: f64) -> bool {
        let scrolled = offset_y > SCROLL_THRESHOLD;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn links() -> impl Iterator<Item = NavLink> {
        View::ALL.into_iter().map(|view| NavLink {
            view,
            label: view.label(),
            href: view.anchor(),
        })
    }
}
