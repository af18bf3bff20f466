//! Site configuration.
//!
//! Layered as: built-in defaults, then an optional JSON settings file
//! (`.chify/settings.json` under the site root, or an explicit path), then
//! `CHIFY_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chify_chat::{GeminiConfig, Persona, DEFAULT_TEMPERATURE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};

/// Settings file location relative to the site root
pub const SETTINGS_FILE: &str = ".chify/settings.json";

const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// Chat collaborator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
    pub timeout_secs: u64,
    pub credential_vars: Vec<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        let gemini = GeminiConfig::default();
        Self {
            model: gemini.model,
            temperature: DEFAULT_TEMPERATURE,
            base_url: gemini.base_url,
            timeout_secs: gemini.timeout_secs,
            credential_vars: gemini.credential_vars,
        }
    }
}

impl ChatSettings {
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            credential_vars: self.credential_vars.clone(),
        }
    }

    pub fn persona(&self) -> Persona {
        Persona::default().with_temperature(self.temperature)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub toast_ttl_ms: u64,
    /// `None` leaves the toast list unbounded
    pub max_toasts: Option<usize>,
    pub slide_interval_ms: u64,
    pub counter_duration_ms: u64,
    pub chat: ChatSettings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            toast_ttl_ms: 5000,
            max_toasts: None,
            slide_interval_ms: 8000,
            counter_duration_ms: 2000,
            chat: ChatSettings::default(),
        }
    }
}

impl SiteConfig {
    /// Load defaults, the settings file under `root` if present, then env
    pub fn load(root: impl AsRef<Path>) -> CoreResult<Self> {
        let path = root.as_ref().join(SETTINGS_FILE);
        let config = if path.exists() {
            Self::from_file(&path)?
        } else {
            debug!("No settings file at {}", path.display());
            Self::default()
        };
        Ok(config.with_env())
    }

    /// Read a JSON settings file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!("malformed {}: {}", path.display(), e))
        })?;
        debug!("Loaded settings from {}", path.display());
        config.validated()
    }

    /// Apply `CHIFY_*` overrides from the process environment
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Unparseable or out-of-range
    /// values are skipped with a warning.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(ms) = parse_var(&lookup, "CHIFY_TOAST_TTL_MS", |ms: &u64| *ms > 0) {
            self.toast_ttl_ms = ms;
        }
        if let Some(max) = parse_var::<usize>(&lookup, "CHIFY_MAX_TOASTS", |_| true) {
            self.max_toasts = (max > 0).then_some(max);
        }
        if let Some(ms) = parse_var(&lookup, "CHIFY_SLIDE_INTERVAL_MS", |ms: &u64| *ms > 0) {
            self.slide_interval_ms = ms;
        }
        if let Some(model) = lookup("CHIFY_LLM_MODEL").filter(|m| !m.trim().is_empty()) {
            self.chat.model = model.trim().to_string();
        }
        if let Some(temperature) =
            parse_var(&lookup, "CHIFY_LLM_TEMPERATURE", |t: &f32| TEMPERATURE_RANGE.contains(t))
        {
            self.chat.temperature = temperature;
        }
        self
    }

    fn validated(self) -> CoreResult<Self> {
        if self.toast_ttl_ms == 0 {
            return Err(CoreError::Config("toastTtlMs must be greater than zero".to_string()));
        }
        if self.slide_interval_ms == 0 {
            return Err(CoreError::Config("slideIntervalMs must be greater than zero".to_string()));
        }
        if !TEMPERATURE_RANGE.contains(&self.chat.temperature) {
            return Err(CoreError::Config(format!(
                "chat.temperature must be within 0.0..=2.0, got {}",
                self.chat.temperature
            )));
        }
        Ok(self)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    pub fn slide_interval(&self) -> Duration {
        Duration::from_millis(self.slide_interval_ms)
    }

    pub fn counter_duration(&self) -> Duration {
        Duration::from_millis(self.counter_duration_ms)
    }

    /// Default settings path under a root
    pub fn settings_path(root: impl AsRef<Path>) -> PathBuf {
        root.as_ref().join(SETTINGS_FILE)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    valid: impl Fn(&T) -> bool,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) if valid(&value) => Some(value),
        _ => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
