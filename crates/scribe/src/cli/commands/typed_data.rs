//! # Typed-Data Command
//!
//! ```text
//! scribe typed-data hash <FILE> [--format hex|json]
//! scribe typed-data verify <FILE> --address <ADDRESS> --signature <SIG_HEX>
//! ```
//!
//! `FILE` holds an `eth_signTypedData_v4` payload; `-` reads stdin.

use std::path::Path;

use alloy_primitives::B256;
use serde::Serialize;

use scribe_chain::typed_data::{hash_typed_data, verify_typed_data, TypedData, EIP712_DOMAIN};
use scribe_core::primitives::{decode_hex, parse_address};
use scribe_crypto::recover_address;

use super::signature::parse_signature;
use super::{read_input, verification_outcome, CommandError};
use crate::cli::args::{OutputFormat, TypedDataCommands};

/// JSON output of `typed-data hash`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HashOutput<'a> {
    primary_type: &'a str,
    domain_separator: B256,
    #[serde(skip_serializing_if = "Option::is_none")]
    struct_hash: Option<B256>,
    digest: B256,
}

/// The `scribe typed-data` command handler.
#[derive(Debug, Clone)]
pub struct TypedDataCommand {
    /// The subcommand to run.
    pub action: TypedDataCommands,
}

impl TypedDataCommand {
    /// Create a new `TypedDataCommand`.
    #[must_use]
    pub const fn new(action: TypedDataCommands) -> Self {
        Self { action }
    }

    /// Run the command and return the text to print.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the payload is invalid,
    /// or, for `verify`, the signature recovers to another address.
    pub fn run(&self) -> Result<String, CommandError> {
        match &self.action {
            TypedDataCommands::Hash { file, format } => {
                let typed = load(file)?;
                let digest = hash_typed_data(&typed)?;
                match format {
                    OutputFormat::Hex => Ok(digest.to_string()),
                    OutputFormat::Json => {
                        let struct_hash = if typed.primary_type == EIP712_DOMAIN {
                            None
                        } else {
                            Some(typed.struct_hash()?)
                        };
                        let output = HashOutput {
                            primary_type: &typed.primary_type,
                            domain_separator: typed.domain.separator()?,
                            struct_hash,
                            digest,
                        };
                        Ok(serde_json::to_string_pretty(&output)?)
                    }
                }
            }
            TypedDataCommands::Verify {
                file,
                address,
                signature,
            } => {
                let typed = load(file)?;
                let expected = parse_address(address.trim())?;
                let bytes = decode_hex(signature.trim())?;

                let valid = verify_typed_data(&expected, &typed, &bytes)?;
                verification_outcome(valid, expected, || {
                    let (_, signature) = parse_signature(signature).ok()?;
                    let digest = hash_typed_data(&typed).ok()?;
                    recover_address(&digest, &signature).ok()
                })
            }
        }
    }
}

fn load(path: &Path) -> Result<TypedData, CommandError> {
    let json = read_input(path)?;
    let typed = TypedData::from_json(&json)?;
    tracing::debug!(
        primary_type = %typed.primary_type,
        types = typed.types.len(),
        "loaded typed data"
    );
    Ok(typed)
}
