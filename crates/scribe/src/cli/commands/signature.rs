//! # Signature Command
//!
//! ```text
//! scribe signature parse <SIG_HEX> [--format json|hex]
//! scribe signature compact <SIG_HEX>
//! scribe signature recover <SIG_HEX> --hash <HASH>
//! ```
//!
//! Every subcommand accepts raw 65-byte, compact 64-byte and ERC-6492 wrapped
//! signatures.

use alloy_primitives::{Address, Bytes, U256};
use serde::Serialize;

use scribe_core::primitives::{decode_hex, encode_hex, parse_b256};
use scribe_core::SignatureError;
use scribe_crypto::{recover_address, Erc6492Signature, Signature};

use super::CommandError;
use crate::cli::args::{OutputFormat, SignatureCommands};

/// JSON output of `signature parse`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseOutput {
    r: U256,
    s: U256,
    y_parity: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    v: Option<u64>,
    /// Absent when `s` has its top bit set and has no compact form.
    #[serde(skip_serializing_if = "Option::is_none")]
    compact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    factory: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    factory_data: Option<Bytes>,
}

/// Unwrap ERC-6492 if present and parse the inner signature.
pub(crate) fn parse_signature(input: &str) -> Result<(Erc6492Signature, Signature), CommandError> {
    let bytes = decode_hex(input.trim())?;
    let envelope = Erc6492Signature::parse(&bytes)?;
    let signature = Signature::from_slice(&envelope.signature)?;
    Ok((envelope, signature))
}

/// The `scribe signature` command handler.
#[derive(Debug, Clone)]
pub struct SignatureCommand {
    /// The subcommand to run.
    pub action: SignatureCommands,
}

impl SignatureCommand {
    /// Create a new `SignatureCommand`.
    #[must_use]
    pub const fn new(action: SignatureCommands) -> Self {
        Self { action }
    }

    /// Run the command and return the text to print.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed signatures or digests.
    pub fn run(&self) -> Result<String, CommandError> {
        match &self.action {
            SignatureCommands::Parse { signature, format } => {
                let (envelope, signature) = parse_signature(signature)?;
                match format {
                    OutputFormat::Hex => Ok(signature.to_hex()),
                    OutputFormat::Json => {
                        let output = ParseOutput {
                            r: signature.r(),
                            s: signature.s(),
                            y_parity: signature.y_parity(),
                            v: signature.v(),
                            compact: compact_hex(&signature)?,
                            factory: envelope.address,
                            factory_data: envelope.data,
                        };
                        Ok(serde_json::to_string_pretty(&output)?)
                    }
                }
            }
            SignatureCommands::Compact { signature } => {
                let (_, signature) = parse_signature(signature)?;
                Ok(encode_hex(signature.to_compact()?.to_bytes()))
            }
            SignatureCommands::Recover { signature, hash } => {
                let (_, signature) = parse_signature(signature)?;
                let hash = parse_b256(hash.trim())?;
                Ok(recover_address(&hash, &signature)?.to_string())
            }
        }
    }
}

fn compact_hex(signature: &Signature) -> Result<Option<String>, CommandError> {
    match signature.to_compact() {
        Ok(compact) => Ok(Some(encode_hex(compact.to_bytes()))),
        Err(e @ SignatureError::InvalidScalar { .. }) => {
            tracing::debug!(error = %e, "signature has no compact form");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
