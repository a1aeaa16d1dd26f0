//! # Message Command
//!
//! ```text
//! scribe message hash <MESSAGE> [--hex]
//! scribe message verify <MESSAGE> --address <ADDRESS> --signature <SIG_HEX> [--hex]
//! ```

use scribe_core::primitives::{decode_hex, parse_address};
use scribe_crypto::{hash_message, recover_message_address, verify_message};

use super::signature::parse_signature;
use super::{verification_outcome, CommandError};
use crate::cli::args::MessageCommands;

/// The `scribe message` command handler.
#[derive(Debug, Clone)]
pub struct MessageCommand {
    /// The subcommand to run.
    pub action: MessageCommands,
}

impl MessageCommand {
    /// Create a new `MessageCommand`.
    #[must_use]
    pub const fn new(action: MessageCommands) -> Self {
        Self { action }
    }

    /// Run the command and return the text to print.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed input, or for `verify` when the
    /// signature recovers to another address.
    pub fn run(&self) -> Result<String, CommandError> {
        match &self.action {
            MessageCommands::Hash { message, hex } => {
                let bytes = message_bytes(message, *hex)?;
                Ok(hash_message(bytes).to_string())
            }
            MessageCommands::Verify {
                message,
                address,
                signature,
                hex,
            } => {
                let bytes = message_bytes(message, *hex)?;
                let expected = parse_address(address.trim())?;
                let raw = decode_hex(signature.trim())?;

                let valid = verify_message(&expected, &bytes, &raw)?;
                verification_outcome(valid, expected, || {
                    let (_, signature) = parse_signature(signature).ok()?;
                    recover_message_address(&bytes, &signature).ok()
                })
            }
        }
    }
}

fn message_bytes(message: &str, hex: bool) -> Result<Vec<u8>, CommandError> {
    if hex {
        Ok(decode_hex(message.trim())?)
    } else {
        Ok(message.as_bytes().to_vec())
    }
}
