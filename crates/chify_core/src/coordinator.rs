//! Root coordinator.
//!
//! Owns every piece of site state and is the only thing that mutates it.
//! Presentation layers read a [`SiteSnapshot`] (or subscribe to one per
//! change) and request changes through the mutators below.
//!
//! Background work (toast timers, chat requests, the carousel interval)
//! reports back as [`SiteEvent`]s. The owner drives them with
//! [`SiteCoordinator::next_event`] and [`SiteCoordinator::apply`], or
//! [`SiteCoordinator::process_next`], on a single task.

use std::sync::Arc;

use chify_chat::{ChatMessage, ChatReply, ChatWidget, GeminiAdapter, TextGenerator};
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use crate::carousel::{default_slides, HeroCarousel, Slide};
use crate::catalog::{ServiceCatalog, ServiceRecord};
use crate::config::SiteConfig;
use crate::error::CoreResult;
use crate::navbar::Navbar;
use crate::navigation::{Navigation, Viewport};
use crate::selection::ServiceDialog;
use crate::stats::{expertise_stats, headline_stats, StatBoard, StatReading};
use crate::toast::{Toast, ToastId, ToastKind, ToastQueue};
use crate::view::View;

/// Result of background work, to be applied by the coordinator's owner
#[derive(Debug)]
pub enum SiteEvent {
    ToastExpired(ToastId),
    ChatReply(ChatReply),
    SlideAdvanced,
}

/// Discriminant of a [`SiteEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ToastExpired,
    ChatReply,
    SlideAdvanced,
}

impl SiteEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ToastExpired(_) => EventKind::ToastExpired,
            Self::ChatReply(_) => EventKind::ChatReply,
            Self::SlideAdvanced => EventKind::SlideAdvanced,
        }
    }
}

/// Which stats group to reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatSection {
    Headline,
    Expertise,
}

/// Everything a presentation layer needs to render
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSnapshot {
    pub view: View,
    pub toasts: Vec<Toast>,
    pub dialog: ServiceDialog,
    pub chat_open: bool,
    pub chat_awaiting: bool,
    pub chat_messages: Vec<ChatMessage>,
    pub navbar: Navbar,
    pub slide: usize,
    /// Empty until the group is revealed
    pub headline_stats: Vec<StatReading>,
    pub expertise_stats: Vec<StatReading>,
}

pub struct SiteCoordinator {
    navigation: Navigation,
    navbar: Navbar,
    toasts: ToastQueue,
    dialog: ServiceDialog,
    chat: ChatWidget,
    carousel: HeroCarousel,
    headline_stats: StatBoard,
    expertise_stats: StatBoard,
    catalog: Arc<ServiceCatalog>,
    snapshots: watch::Sender<SiteSnapshot>,
}

impl SiteCoordinator {
    /// Build a coordinator with an explicit collaborator.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(
        config: &SiteConfig,
        viewport: Arc<dyn Viewport>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self::with_catalog(config, viewport, generator, ServiceCatalog::builtin(), default_slides())
    }

    /// Build a coordinator talking to the Gemini API
    pub fn from_config(config: &SiteConfig, viewport: Arc<dyn Viewport>) -> CoreResult<Self> {
        let adapter = GeminiAdapter::new(config.chat.gemini_config(), config.chat.persona())?;
        info!(model = %adapter.model(), "Chat collaborator configured");
        Ok(Self::new(config, viewport, Arc::new(adapter)))
    }

    pub fn with_catalog(
        config: &SiteConfig,
        viewport: Arc<dyn Viewport>,
        generator: Arc<dyn TextGenerator>,
        catalog: ServiceCatalog,
        slides: Vec<Slide>,
    ) -> Self {
        let counter_duration = config.counter_duration();
        let mut coordinator = Self {
            navigation: Navigation::new(viewport),
            navbar: Navbar::new(),
            toasts: ToastQueue::new(config.toast_ttl()).with_max_visible(config.max_toasts),
            dialog: ServiceDialog::Closed,
            chat: ChatWidget::new(generator),
            carousel: HeroCarousel::new(slides, config.slide_interval()),
            headline_stats: StatBoard::new(headline_stats()).with_duration(counter_duration),
            expertise_stats: StatBoard::new(expertise_stats()).with_duration(counter_duration),
            catalog: Arc::new(catalog),
            snapshots: watch::channel(SiteSnapshot::empty()).0,
        };
        coordinator.publish();
        coordinator
    }

    // Reads

    pub fn current_view(&self) -> View {
        self.navigation.current_view()
    }

    pub fn toasts(&self) -> &[Toast] {
        self.toasts.toasts()
    }

    pub fn dialog(&self) -> &ServiceDialog {
        &self.dialog
    }

    pub fn chat(&self) -> &ChatWidget {
        &self.chat
    }

    pub fn navbar(&self) -> &Navbar {
        &self.navbar
    }

    pub fn carousel(&self) -> &HeroCarousel {
        &self.carousel
    }

    pub fn catalog(&self) -> &Arc<ServiceCatalog> {
        &self.catalog
    }

    pub fn stats(&self, section: StatSection) -> &StatBoard {
        match section {
            StatSection::Headline => &self.headline_stats,
            StatSection::Expertise => &self.expertise_stats,
        }
    }

    /// Current state, assembled in one read
    pub fn snapshot(&self) -> SiteSnapshot {
        SiteSnapshot {
            view: self.navigation.current_view(),
            toasts: self.toasts.toasts().to_vec(),
            dialog: self.dialog.clone(),
            chat_open: self.chat.is_open(),
            chat_awaiting: self.chat.is_awaiting(),
            chat_messages: self.chat.messages().to_vec(),
            navbar: self.navbar,
            slide: self.carousel.current_index(),
            headline_stats: revealed_readings(&self.headline_stats),
            expertise_stats: revealed_readings(&self.expertise_stats),
        }
    }

    /// Receive a fresh snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<SiteSnapshot> {
        self.snapshots.subscribe()
    }

    // Navigation

    /// Show `view`, close the mobile menu and scroll to the top
    pub fn navigate(&mut self, view: View) {
        self.navbar.close_menu();
        self.navigation.navigate(view);
        self.publish();
    }

    pub fn scroll_to(&mut self, offset_y: f64) {
        if self.navbar.on_scroll(offset_y) {
            self.publish();
        }
    }

    pub fn toggle_menu(&mut self) {
        self.navbar.toggle_menu();
        self.publish();
    }

    // Toasts

    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        let id = self.toasts.notify(message, kind);
        self.publish();
        id
    }

    pub fn dismiss_toast(&mut self, id: ToastId) -> bool {
        let removed = self.toasts.dismiss(id);
        if removed {
            self.publish();
        }
        removed
    }

    // Service dialog

    pub fn open_service(&mut self, record: Arc<ServiceRecord>) {
        self.dialog.open(record);
        self.publish();
    }

    /// Open the dialog on a catalog record found by slug or title
    pub fn open_service_by_slug(&mut self, key: &str) -> CoreResult<Arc<ServiceRecord>> {
        let record = self.catalog.find(key)?;
        self.open_service(Arc::clone(&record));
        Ok(record)
    }

    pub fn close_service(&mut self) {
        self.dialog.close();
        self.publish();
    }

    // Chat

    /// Send chat text. Returns whether a request was issued.
    pub fn send_chat(&mut self, text: &str) -> bool {
        let sent = self.chat.send(text);
        if sent {
            self.publish();
        }
        sent
    }

    pub fn open_chat(&mut self) {
        self.chat.open();
        self.publish();
    }

    pub fn close_chat(&mut self) {
        self.chat.close();
        self.publish();
    }

    pub fn toggle_chat(&mut self) {
        self.chat.toggle();
        self.publish();
    }

    // Hero and stats

    pub fn select_slide(&mut self, index: usize) -> bool {
        let changed = self.carousel.select(index);
        if changed {
            self.publish();
        }
        changed
    }

    pub fn next_slide(&mut self) -> usize {
        let index = self.carousel.advance();
        self.publish();
        index
    }

    /// Start a stats group counting up. Only the first call has an effect.
    pub fn reveal_stats(&mut self, section: StatSection) -> bool {
        let revealed = match section {
            StatSection::Headline => self.headline_stats.reveal(),
            StatSection::Expertise => self.expertise_stats.reveal(),
        };
        if revealed {
            self.publish();
        }
        revealed
    }

    // Events

    /// Wait for the next piece of background work to finish
    pub async fn next_event(&mut self) -> SiteEvent {
        tokio::select! {
            Some(id) = self.toasts.next_expiry() => SiteEvent::ToastExpired(id),
            Some(reply) = self.chat.next_reply() => SiteEvent::ChatReply(reply),
            _ = self.carousel.tick() => SiteEvent::SlideAdvanced,
        }
    }

    /// Apply an event. Returns whether it changed any state.
    pub fn apply(&mut self, event: SiteEvent) -> bool {
        let changed = match event {
            SiteEvent::ToastExpired(id) => self.toasts.expire(id),
            SiteEvent::ChatReply(reply) => self.chat.apply(reply),
            SiteEvent::SlideAdvanced => {
                self.carousel.advance();
                true
            }
        };
        if changed {
            self.publish();
        }
        changed
    }

    /// Wait for and apply the next event
    pub async fn process_next(&mut self) -> EventKind {
        let event = self.next_event().await;
        let kind = event.kind();
        self.apply(event);
        kind
    }

    /// Process events until no chat request is in flight
    pub async fn settle_chat(&mut self) {
        while self.chat.is_awaiting() {
            self.process_next().await;
        }
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.snapshots.send_replace(snapshot);
    }
}

impl SiteSnapshot {
    fn empty() -> Self {
        Self {
            view: View::Home,
            toasts: Vec::new(),
            dialog: ServiceDialog::Closed,
            chat_open: false,
            chat_awaiting: false,
            chat_messages: Vec::new(),
            navbar: Navbar::new(),
            slide: 0,
            headline_stats: Vec::new(),
            expertise_stats: Vec::new(),
        }
    }
}

fn revealed_readings(board: &StatBoard) -> Vec<StatReading> {
    if board.is_revealed() {
        board.readings()
    } else {
        Vec::new()
    }
}
