//! # Tx Command
//!
//! ```text
//! scribe tx decode <TX_HEX> [--format json|hex]
//! scribe tx hash <TX_HEX> [--format hex|json]
//! scribe tx rlp <TX_HEX>
//! scribe tx build <FILE> [--format hex|json]
//! ```
//!
//! The `[codec]` section of the configuration applies: `legacy_v = "lenient"`
//! lets non-canonical legacy `v` values through decoding, and
//! `require_replay_protection = true` makes `build` reject requests without a
//! non-zero chain id.

use std::path::Path;

use alloy_primitives::{Address, B256};
use serde::Serialize;

use scribe_chain::{Transaction, TransactionRequest};
use scribe_core::config::CodecConfig;
use scribe_core::primitives::{decode_hex, encode_hex};
use scribe_core::rlp::{detect_tx_type, RlpItem};

use super::{read_input, CommandError};
use crate::cli::args::{OutputFormat, TxCommands};

/// JSON output of `tx decode`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodeOutput<'a> {
    transaction: &'a Transaction,
    signing_hash: B256,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<B256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<Address>,
}

/// JSON output of `tx hash`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HashOutput {
    signing_hash: B256,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<B256>,
}

/// JSON output of `tx rlp`.
#[derive(Debug, Serialize)]
struct RlpOutput {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    tx_type: Option<u8>,
    items: RlpItem,
}

/// JSON output of `tx build`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildOutput<'a> {
    transaction: &'a Transaction,
    signing_hash: B256,
    unsigned: String,
}

/// The `scribe tx` command handler.
#[derive(Debug, Clone)]
pub struct TxCommand {
    /// The subcommand to run.
    pub action: TxCommands,
    /// Codec settings from the configuration file.
    pub codec: CodecConfig,
}

impl TxCommand {
    /// Create a new `TxCommand`.
    #[must_use]
    pub const fn new(action: TxCommands, codec: CodecConfig) -> Self {
        Self { action, codec }
    }

    /// Run the command and return the text to print.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not hex or not a valid transaction,
    /// or if a request file cannot be read or fails validation.
    pub fn run(&self) -> Result<String, CommandError> {
        match &self.action {
            TxCommands::Decode {
                transaction,
                format,
            } => self.decode(transaction, *format),
            TxCommands::Hash {
                transaction,
                format,
            } => self.hash(transaction, *format),
            TxCommands::Rlp { transaction } => Self::rlp(transaction),
            TxCommands::Build { file, format } => self.build(file, *format),
        }
    }

    fn parse(&self, transaction: &str) -> Result<Transaction, CommandError> {
        let raw = decode_hex(transaction.trim())?;
        Ok(Transaction::decode_with(&raw, &self.codec)?)
    }

    fn decode(&self, transaction: &str, format: OutputFormat) -> Result<String, CommandError> {
        let tx = self.parse(transaction)?;
        match format {
            OutputFormat::Hex => Ok(encode_hex(tx.encode())),
            OutputFormat::Json => {
                let from = if tx.is_signed() {
                    match tx.recover_signer() {
                        Ok(address) => Some(address),
                        Err(e) => {
                            tracing::warn!(error = %e, "signer recovery failed");
                            None
                        }
                    }
                } else {
                    None
                };
                let output = DecodeOutput {
                    transaction: &tx,
                    signing_hash: tx.signing_hash(),
                    hash: tx.tx_hash(),
                    from,
                };
                Ok(serde_json::to_string_pretty(&output)?)
            }
        }
    }

    fn hash(&self, transaction: &str, format: OutputFormat) -> Result<String, CommandError> {
        let tx = self.parse(transaction)?;
        let output = HashOutput {
            signing_hash: tx.signing_hash(),
            hash: tx.tx_hash(),
        };
        match format {
            OutputFormat::Hex => {
                let mut lines = vec![output.signing_hash.to_string()];
                lines.extend(output.hash.map(|hash| hash.to_string()));
                Ok(lines.join("\n"))
            }
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&output)?),
        }
    }

    fn rlp(transaction: &str) -> Result<String, CommandError> {
        let raw = decode_hex(transaction.trim())?;
        let tx_type = detect_tx_type(&raw);
        let payload = if tx_type.is_some() { &raw[1..] } else { &raw[..] };

        let items = RlpItem::decode(payload)?;
        tracing::debug!(?tx_type, items = ?items.list_len(), "decoded RLP tree");
        Ok(serde_json::to_string_pretty(&RlpOutput { tx_type, items })?)
    }

    fn build(&self, file: &Path, format: OutputFormat) -> Result<String, CommandError> {
        let request: TransactionRequest = serde_json::from_str(&read_input(file)?)?;
        let tx = request.build(self.codec.require_replay_protection)?;
        let unsigned = encode_hex(tx.encode());
        match format {
            OutputFormat::Hex => Ok(unsigned),
            OutputFormat::Json => {
                let output = BuildOutput {
                    transaction: &tx,
                    signing_hash: tx.signing_hash(),
                    unsigned,
                };
                Ok(serde_json::to_string_pretty(&output)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use scribe_core::config::LegacyVPolicy;
    use scribe_core::TransactionError;
    use scribe_core::ScribeError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::cli::commands::EXIT_ERROR;

    const EIP155_TX: &str = "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";

    fn run(action: TxCommands) -> Result<String, CommandError> {
        TxCommand::new(action, CodecConfig::default()).run()
    }

    #[test]
    fn test_decode_json() {
        let out = run(TxCommands::Decode {
            transaction: EIP155_TX.to_string(),
            format: OutputFormat::Json,
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["transaction"]["type"], "0x0");
        assert_eq!(
            value["from"].as_str().unwrap().to_lowercase(),
            "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"
        );
        assert!(value["hash"].is_string());
    }

    #[test]
    fn test_decode_hex_is_canonical() {
        let out = run(TxCommands::Decode {
            transaction: EIP155_TX.trim_start_matches("0x").to_string(),
            format: OutputFormat::Hex,
        })
        .unwrap();
        assert_eq!(out, EIP155_TX);
    }

    #[test]
    fn test_hash_lines() {
        let out = run(TxCommands::Hash {
            transaction: EIP155_TX.to_string(),
            format: OutputFormat::Hex,
        })
        .unwrap();
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_lenient_policy_applies() {
        // v = 29, r = s = 1
        let raw = "0xdf800182520894111111111111111111111111111111111111111180801d0101";
        let strict = run(TxCommands::Decode {
            transaction: raw.to_string(),
            format: OutputFormat::Hex,
        });
        assert!(strict.is_err());

        let codec = CodecConfig {
            legacy_v: LegacyVPolicy::Lenient,
            ..CodecConfig::default()
        };
        let lenient = TxCommand::new(
            TxCommands::Decode {
                transaction: raw.to_string(),
                format: OutputFormat::Hex,
            },
            codec,
        )
        .run();
        assert!(lenient.is_ok());
    }

    fn request_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn build(file: &NamedTempFile, codec: CodecConfig) -> Result<String, CommandError> {
        TxCommand::new(
            TxCommands::Build {
                file: file.path().to_path_buf(),
                format: OutputFormat::Hex,
            },
            codec,
        )
        .run()
    }

    #[test]
    fn test_build_then_decode() {
        let file = request_file(
            r#"{
                "chainId": 1,
                "nonce": 9,
                "gas": 21000,
                "maxFeePerGas": 100,
                "maxPriorityFeePerGas": 2,
                "to": "0x3535353535353535353535353535353535353535",
                "value": "0xde0b6b3a7640000"
            }"#,
        );
        let raw = build(&file, CodecConfig::default()).unwrap();
        assert!(raw.starts_with("0x02"));

        let decoded = run(TxCommands::Decode {
            transaction: raw,
            format: OutputFormat::Json,
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(value["transaction"]["type"], "0x2");
        assert!(value.get("hash").is_none());
    }

    #[test]
    fn test_build_honours_replay_protection_setting() {
        let file = request_file(r#"{ "gasPrice": 1, "gas": 21000 }"#);

        assert!(build(&file, CodecConfig::default()).is_ok());

        let codec = CodecConfig {
            require_replay_protection: true,
            ..CodecConfig::default()
        };
        let err = build(&file, codec).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Scribe(ScribeError::Transaction(
                TransactionError::InvalidChainId { .. }
            ))
        ));
        assert_eq!(err.exit_code(), EXIT_ERROR);
    }

    #[test]
    fn test_build_rejects_conflicting_fees() {
        let file = request_file(
            r#"{ "chainId": 1, "gasPrice": 1, "maxFeePerGas": 2, "maxPriorityFeePerGas": 1 }"#,
        );
        assert!(matches!(
            build(&file, CodecConfig::default()).unwrap_err(),
            CommandError::Scribe(ScribeError::Transaction(
                TransactionError::ConflictingFeeFields { .. }
            ))
        ));
    }

    #[test]
    fn test_rlp_tree_of_typed_envelope() {
        let out = run(TxCommands::Rlp {
            transaction: "0x02c3c10180".to_string(),
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["type"], 2);
        assert_eq!(value["items"], serde_json::json!([["0x01"], "0x"]));
    }

    #[test]
    fn test_rlp_tree_of_legacy() {
        let out = run(TxCommands::Rlp {
            transaction: EIP155_TX.to_string(),
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert!(value.get("type").is_none());
        assert_eq!(value["items"].as_array().unwrap().len(), 9);
        assert_eq!(value["items"][0], "0x09");
    }

    #[test]
    fn test_garbage_rejected() {
        let err = run(TxCommands::Hash {
            transaction: "0x05c0".to_string(),
            format: OutputFormat::Hex,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Scribe(ScribeError::Transaction(
                TransactionError::InvalidSerializedTransaction { .. }
            ))
        ));
    }
}
