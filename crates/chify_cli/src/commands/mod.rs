//! CLI command definitions.
//!
//! Each subcommand drives the site coordinator, or one of its parts, from
//! the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use chify_chat::{GeminiAdapter, MockGenerator, TextGenerator};
use chify_core::SiteConfig;

pub mod ask;
pub mod browse;
pub mod service;
pub mod services;

/// Chify - rehabilitation site coordinator
#[derive(Parser)]
#[command(name = "chify")]
#[command(version, about = "Chify - rehabilitation site coordinator")]
#[command(long_about = r#"
Chify drives the Chify Rehabilitation site from a terminal: page
navigation, notifications, the service catalog and the Rehab AI Guide chat.

COMMANDS:
  browse      → Interactive session against the full site coordinator
  services    → List the service catalog
  service     → Show one service in detail
  ask         → Ask the Rehab AI Guide a single question

CONFIGURATION:
  .chify/settings.json (or --config), then CHIFY_* environment variables.
  The chat credential is read from API_KEY or GEMINI_API_KEY.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Configuration error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Settings file (defaults to .chify/settings.json in the current directory)
    #[arg(short, long, global = true, env = "CHIFY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session
    Browse(browse::BrowseArgs),

    /// List the service catalog
    Services(services::ServicesArgs),

    /// Show details for one service
    Service(service::ServiceArgs),

    /// Ask the Rehab AI Guide one question
    Ask(ask::AskArgs),
}

impl Cli {
    /// Load settings from `--config` or the current directory, then env
    pub fn site_config(&self) -> Result<SiteConfig> {
        let config = match &self.config {
            Some(path) => SiteConfig::from_file(path)?.with_env(),
            None => {
                let root = std::env::current_dir().context("cannot resolve current directory")?;
                SiteConfig::load(root)?
            }
        };
        Ok(config)
    }
}

/// Chat collaborator for a session: canned replies when offline, Gemini
/// otherwise
pub fn text_generator(config: &SiteConfig, offline: bool) -> Result<Arc<dyn TextGenerator>> {
    if offline {
        info!("Chat running offline with canned replies");
        return Ok(Arc::new(MockGenerator::new()));
    }
    let adapter = GeminiAdapter::new(config.chat.gemini_config(), config.chat.persona())?;
    info!(model = %adapter.model(), "Chat collaborator configured");
    Ok(Arc::new(adapter))
}
