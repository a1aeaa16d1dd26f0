//! # scribe
//!
//! Ethereum transaction, signature and typed-data toolkit.
//!
//! ## Usage
//!
//! ```bash
//! # Decode a raw transaction
//! scribe tx decode 0x02f8...
//!
//! # Signing hash and transaction hash
//! scribe tx hash 0xf86c...
//!
//! # Validate a request and encode the unsigned transaction
//! scribe tx build request.json
//!
//! # Recover a signer
//! scribe signature recover 0x... --hash 0x...
//!
//! # EIP-712 digest of a wallet payload
//! scribe typed-data hash mail.json
//!
//! # Verify a personal message signature
//! scribe message verify "gm" --address 0x... --signature 0x...
//! ```
//!
//! ## Exit Codes
//!
//! - `0` - Success
//! - `1` - A well-formed signature recovered to another address
//! - `2` - Any other error

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use clap::Parser;
use scribe::cli::commands::{
    CommandError, ConfigCommand, MessageCommand, SignatureCommand, TxCommand, TypedDataCommand,
    EXIT_ERROR,
};
use scribe::cli::{Cli, Commands, ConfigAction};
use scribe::logging::{init_logging, LogConfig, LogGuard};
use scribe_core::config::Config;

/// Load configuration and install the subscriber.
///
/// # Errors
///
/// Returns the message to print if the configuration or logging setup fails.
fn setup(cli: &Cli) -> Result<(Config, LogGuard), String> {
    // `config init --force` must be able to replace a broken file.
    let repairing = matches!(
        cli.command,
        Commands::Config {
            action: ConfigAction::Init { .. }
        }
    );
    let config = match ConfigCommand::new(ConfigAction::Show, cli.config.clone()).load() {
        Ok(config) => config,
        Err(_) if repairing => Config::default(),
        Err(e) => return Err(format!("Failed to load configuration: {e}")),
    };

    let log_config = LogConfig::from_settings(&config.logging, cli.verbose)
        .map_err(|e| e.to_string())?;
    let guard = init_logging(&log_config).map_err(|e| e.to_string())?;

    Ok((config, guard))
}

/// Main entry point for the scribe application.
fn main() {
    let cli = Cli::parse();

    let (config, guard) = match setup(&cli) {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(EXIT_ERROR);
        }
    };

    let result: Result<String, CommandError> = match cli.command {
        Commands::Tx { command } => TxCommand::new(command, config.codec).run(),
        Commands::Signature { command } => SignatureCommand::new(command).run(),
        Commands::TypedData { command } => TypedDataCommand::new(command).run(),
        Commands::Message { command } => MessageCommand::new(command).run(),
        Commands::Config { action } => ConfigCommand::new(action, cli.config).run(),
    };

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {e}");
            drop(guard);
            std::process::exit(e.exit_code());
        }
    }
}
