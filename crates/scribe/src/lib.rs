//! # scribe
//!
//! Command-line front end for the scribe Ethereum toolkit.
//!
//! The library half exposes argument parsing, command handlers and logging
//! setup so they can be driven and tested without spawning the binary.
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions and handlers
//! - [`logging`] - Subscriber initialisation

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod logging;

// Re-export key logging types for convenience
pub use logging::{
    init_logging, verbosity_to_level, LogConfig, LogError, LogFormat, LogGuard, LogLevel,
};
