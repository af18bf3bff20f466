//! Chify CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Configuration error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chify_core::CoreError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let result = match cli.command {
        Commands::Browse(ref args) => commands::browse::execute(args, &cli).await,
        Commands::Services(ref args) => commands::services::execute(args),
        Commands::Service(ref args) => commands::service::execute(args),
        Commands::Ask(ref args) => commands::ask::execute(args, &cli).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "chify=debug" } else { "chify=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},warn", default_level)));

    let registry = tracing_subscriber::registry().with(filter);
    let log_result = if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<CoreError>() {
        Some(CoreError::Config(_)) => ExitCodes::CONFIG_ERROR,
        Some(CoreError::ServiceNotFound(_)) | Some(CoreError::InvalidView(_)) => {
            ExitCodes::INVALID_ARGS
        }
        _ => ExitCodes::GENERAL_ERROR,
    }
}
