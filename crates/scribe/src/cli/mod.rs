//! # CLI Module
//!
//! Command-line interface for scribe.
//!
//! ## Module Structure
//!
//! - [`args`] - Argument parsing and CLI structure definitions
//! - [`commands`] - Command handler implementations
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use scribe::cli::{Cli, Commands};
//!
//! let cli = Cli::parse();
//! if let Commands::Tx { command } = cli.command {
//!     println!("{command:?}");
//! }
//! ```

pub mod args;
pub mod commands;

// Re-export main types for convenience
pub use args::{
    Cli, Commands, ConfigAction, MessageCommands, OutputFormat, SignatureCommands, TxCommands,
    TypedDataCommands,
};
