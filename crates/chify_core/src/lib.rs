//! # chify_core
//!
//! View and session coordinator for the Chify rehabilitation site.
//!
//! One [`SiteCoordinator`] owns all transient UI state: the active view,
//! the toast queue, the service dialog, the chat widget, the hero carousel
//! and the count-up statistics. Presentation layers render from a
//! [`SiteSnapshot`] and call back into the coordinator's mutators.
//!
//! # Architecture
//!
//! - **Navigation**: single active [`View`], scroll reset via a [`Viewport`]
//! - **Toasts**: timed notifications with cancellable expiry
//! - **Selection**: the service detail dialog, closed or open on one record
//! - **Chat**: delegated to `chify_chat`
//! - **Coordinator**: applies background [`SiteEvent`]s on the owner's task
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chify_core::{RecordingViewport, SiteConfig, SiteCoordinator, ToastKind, View};
//!
//! let config = SiteConfig::load(".")?;
//! let mut site = SiteCoordinator::from_config(&config, Arc::new(RecordingViewport::new()))?;
//!
//! site.navigate(View::Services);
//! site.notify("Appointment requested", ToastKind::Success);
//! site.send_chat("Do you treat sports injuries?");
//! site.settle_chat().await;
//! ```

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod navbar;
pub mod navigation;
pub mod selection;
pub mod stats;
pub mod toast;
pub mod view;

pub use carousel::{default_slides, HeroCarousel, Slide, DEFAULT_SLIDE_INTERVAL};
pub use catalog::{ServiceCatalog, ServiceRecord};
pub use config::{ChatSettings, SiteConfig, SETTINGS_FILE};
pub use coordinator::{EventKind, SiteCoordinator, SiteEvent, SiteSnapshot, StatSection};
pub use error::{CoreError, CoreResult};
pub use navbar::{NavLink, Navbar, SCROLL_THRESHOLD};
pub use navigation::{Navigation, RecordingViewport, Viewport};
pub use selection::ServiceDialog;
pub use stats::{
    expertise_stats, headline_stats, StatBoard, StatCounter, StatReading, DEFAULT_COUNTER_DURATION,
};
pub use toast::{Toast, ToastId, ToastKind, ToastQueue, DEFAULT_TOAST_TTL};
pub use view::View;
