//! # CLI Command Handlers
//!
//! - [`tx`] - Transaction decoding and hashing
//! - [`signature`] - Signature parsing, compaction and recovery
//! - [`typed_data`] - EIP-712 hashing and verification
//! - [`message`] - EIP-191 hashing and verification
//! - [`config`] - Configuration file management
//!
//! ## Error Handling
//!
//! Handlers return the text to print on success, or a [`CommandError`]. The
//! main function prints errors to stderr and exits with
//! [`CommandError::exit_code`].

pub mod config;
pub mod exit_codes;
pub mod message;
pub mod signature;
pub mod tx;
pub mod typed_data;

use std::io::Read;
use std::path::Path;

use alloy_primitives::Address;
use scribe_core::error::ScribeError;

pub use config::ConfigCommand;
pub use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_VERIFICATION_FAILED};
pub use message::MessageCommand;
pub use signature::SignatureCommand;
pub use tx::TxCommand;
pub use typed_data::TypedDataCommand;

// ============================================================================
// CommandError
// ============================================================================

/// Errors that can occur while running a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Decoding, hashing or recovery failed.
    #[error(transparent)]
    Scribe(#[from] ScribeError),

    /// The signature is valid but was produced by another key.
    #[error("signature recovers to {recovered}, expected {expected}")]
    VerificationFailed {
        /// The address the caller expected.
        expected: Address,
        /// The address the signature recovers to.
        recovered: Address,
    },

    /// The configuration file already exists.
    #[error("{0} already exists. Use --force to overwrite.")]
    AlreadyExists(String),

    /// Reading input failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::VerificationFailed { .. } => EXIT_VERIFICATION_FAILED,
            _ => EXIT_ERROR,
        }
    }
}

macro_rules! impl_from_domain_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for CommandError {
                fn from(err: $error) -> Self {
                    Self::Scribe(err.into())
                }
            }
        )*
    };
}

impl_from_domain_error!(
    scribe_core::PrimitiveError,
    scribe_core::TransactionError,
    scribe_core::SignatureError,
    scribe_core::TypedDataError,
    scribe_core::ConfigError,
);

// ============================================================================
// Helpers
// ============================================================================

/// Read a file, or stdin when `path` is `-`.
pub(crate) fn read_input(path: &Path) -> Result<String, CommandError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Turn a verification result into output or [`CommandError::VerificationFailed`].
pub(crate) fn verification_outcome(
    valid: bool,
    expected: Address,
    recovered: impl FnOnce() -> Option<Address>,
) -> Result<String, CommandError> {
    if valid {
        return Ok(format!("valid: {expected}"));
    }
    Err(CommandError::VerificationFailed {
        expected,
        recovered: recovered().unwrap_or(Address::ZERO),
    })
}
