//! MediMate CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Backend failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use medimate_chat::{ChatError, SubmitRejected};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const BACKEND_FAILURE: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("medimate_cli={level},medimate_chat={level},warn"))
        }))
        .try_init();

    match run(cli).await {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.backend_config()?;

    match cli.command {
        Commands::Chat(args) => commands::chat::execute(args, config).await,
        Commands::Send(args) => commands::send::execute(args, config).await,
        Commands::Route(args) => commands::route::execute(args),
        Commands::Register(args) => commands::register::execute(args, config).await,
        Commands::Emergency(args) => commands::emergency::execute(args, config).await,
        Commands::Remind(args) => commands::remind::execute(args, config).await,
    }
}

/// Map an error to its exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(chat_error) = e.downcast_ref::<ChatError>() {
        return match chat_error {
            ChatError::Validation(_) | ChatError::Rejected(SubmitRejected::Invalid(_)) => {
                ExitCodes::VALIDATION_FAILURE
            }
            ChatError::Network(_) | ChatError::Http { .. } => ExitCodes::BACKEND_FAILURE,
            ChatError::UnknownAgent(_) | ChatError::Config(_) => ExitCodes::INVALID_ARGS,
            ChatError::Rejected(SubmitRejected::EmptyInput) => ExitCodes::INVALID_ARGS,
            _ => ExitCodes::GENERAL_ERROR,
        };
    }
    if let Some(rejected) = e.downcast_ref::<SubmitRejected>() {
        return match rejected {
            SubmitRejected::Invalid(_) => ExitCodes::VALIDATION_FAILURE,
            SubmitRejected::EmptyInput => ExitCodes::INVALID_ARGS,
            _ => ExitCodes::GENERAL_ERROR,
        };
    }
    ExitCodes::GENERAL_ERROR
}
