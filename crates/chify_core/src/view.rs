//! Top-level screens of the site.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the fixed top-level screens. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    About,
    Services,
    Expertise,
    Contact,
}

impl View {
    /// All views in navbar order
    pub const ALL: [View; 5] = [
        View::Home,
        View::About,
        View::Services,
        View::Expertise,
        View::Contact,
    ];

    /// Get the navbar label for this view
    pub fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Services => "Services",
            Self::Expertise => "Expertise",
            Self::Contact => "Contact",
        }
    }

    /// In-page anchor of the view's section
    pub fn anchor(&self) -> &'static str {
        match self {
            Self::Home => "#",
            Self::About => "#about",
            Self::Services => "#services",
            Self::Expertise => "#expertise",
            Self::Contact => "#contact",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Services => "services",
            Self::Expertise => "expertise",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('#');
        if wanted.is_empty() {
            return Ok(View::Home);
        }
        View::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::InvalidView(s.to_string()))
    }
}
