//! Command-line front end for tensu.
//!
//! `main.rs` parses arguments, installs logging and hands the parsed command
//! to [`run`]. Everything else (adapter wiring, handlers, terminal output)
//! lives in this library so it can be tested without a terminal.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings
#[cfg(test)]
use tempfile as _;

// Used by main.rs only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod settings_store;

pub use bootstrap::{AudioStack, CliConfig, CliContext, bootstrap};
pub use commands::{Commands, HandArgs, Payer, SettingsCommand, Win};
pub use error::CliError;
pub use parser::Cli;
pub use settings_store::JsonSettingsRepository;

/// Dispatch one parsed command.
///
/// Commands that need neither settings nor the cache run without touching
/// the data directory.
pub async fn run(config: CliConfig, command: Commands) -> Result<(), CliError> {
    match &command {
        Commands::Phrase(args) => return handlers::phrase::execute(args),
        Commands::Scores { all, honba } => {
            handlers::scores::execute(*all, *honba);
            return Ok(());
        }
        _ => {}
    }

    let ctx = bootstrap(config).await?;
    match command {
        Commands::Announce(args) => handlers::announce::execute(&ctx, &args).await,
        Commands::Warm { check, quiet } => handlers::warm::execute(&ctx, check, quiet).await,
        Commands::Settings { command } => handlers::settings::execute(&ctx, command).await,
        Commands::Interactive => handlers::interactive::execute(&ctx).await,
        Commands::Phrase(_) | Commands::Scores { .. } => Ok(()),
    }
}
