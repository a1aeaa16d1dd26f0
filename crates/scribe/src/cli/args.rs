//! # CLI Argument Definitions
//!
//! - `scribe tx decode|hash|rlp <TX_HEX>` - Decode, hash or dump a raw transaction
//! - `scribe tx build <FILE>` - Validate a transaction request and encode it
//! - `scribe signature parse|compact|recover <SIG_HEX>` - Signature codec
//! - `scribe typed-data hash|verify <FILE>` - EIP-712 digests
//! - `scribe message hash|verify <MESSAGE>` - EIP-191 personal messages
//! - `scribe config show|path|init` - Configuration file
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level
//! - `-c, --config <PATH>` - Path to configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Ethereum transaction, signature and typed-data toolkit.
#[derive(Debug, Parser)]
#[command(name = "scribe")]
#[command(author, version, about = "Ethereum transaction, signature and typed-data toolkit")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    ///
    /// Overrides `logging.level` from the configuration file:
    /// - `-v` - Show info messages
    /// - `-vv` - Show debug messages
    /// - `-vvv` - Show trace messages
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    ///
    /// Defaults to `~/.scribe/config.toml`. A missing default file means
    /// built-in defaults.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode, hash and build transactions
    Tx {
        /// Transaction command to execute
        #[command(subcommand)]
        command: TxCommands,
    },

    /// Parse, convert and recover signatures
    Signature {
        /// Signature command to execute
        #[command(subcommand)]
        command: SignatureCommands,
    },

    /// Hash and verify EIP-712 typed data
    TypedData {
        /// Typed-data command to execute
        #[command(subcommand)]
        command: TypedDataCommands,
    },

    /// Hash and verify EIP-191 personal messages
    Message {
        /// Message command to execute
        #[command(subcommand)]
        command: MessageCommands,
    },

    /// View or create the configuration file
    Config {
        /// Configuration action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Transaction commands.
#[derive(Debug, Clone, Subcommand)]
pub enum TxCommands {
    /// Decode a raw transaction
    ///
    /// Accepts legacy and typed (0x01-0x04) envelopes, including the
    /// EIP-4844 network form with blob sidecars.
    Decode {
        /// Raw transaction hex (with or without 0x prefix)
        #[arg(value_name = "TX_HEX")]
        transaction: String,

        /// Output format
        ///
        /// - `json` - Decoded fields, hashes and signer (default)
        /// - `hex` - Canonical re-encoding
        #[arg(short, long, default_value = "json", value_name = "FORMAT")]
        format: OutputFormat,
    },

    /// Print the signing hash and, if signed, the transaction hash
    Hash {
        /// Raw transaction hex (with or without 0x prefix)
        #[arg(value_name = "TX_HEX")]
        transaction: String,

        /// Output format
        #[arg(short, long, default_value = "hex", value_name = "FORMAT")]
        format: OutputFormat,
    },

    /// Print the raw RLP tree of a payload as JSON
    ///
    /// The type byte of a typed envelope is reported separately.
    Rlp {
        /// Raw transaction hex (with or without 0x prefix)
        #[arg(value_name = "TX_HEX")]
        transaction: String,
    },

    /// Validate a transaction request and encode the unsigned transaction
    ///
    /// The envelope type is inferred from the fields that are set.
    /// `require_replay_protection` in the `[codec]` section rejects requests
    /// without a non-zero chain id.
    Build {
        /// Request JSON file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        ///
        /// - `hex` - Unsigned encoding (default)
        /// - `json` - Transaction fields and signing hash
        #[arg(short, long, default_value = "hex", value_name = "FORMAT")]
        format: OutputFormat,
    },
}

/// Signature commands.
#[derive(Debug, Clone, Subcommand)]
pub enum SignatureCommands {
    /// Parse a 65-byte, 64-byte compact or ERC-6492 wrapped signature
    Parse {
        /// Signature hex (with or without 0x prefix)
        #[arg(value_name = "SIG_HEX")]
        signature: String,

        /// Output format
        ///
        /// - `json` - Components (default)
        /// - `hex` - Canonical 65-byte form
        #[arg(short, long, default_value = "json", value_name = "FORMAT")]
        format: OutputFormat,
    },

    /// Convert a signature to its 64-byte EIP-2098 form
    Compact {
        /// Signature hex (with or without 0x prefix)
        #[arg(value_name = "SIG_HEX")]
        signature: String,
    },

    /// Recover the signer address of a 32-byte digest
    Recover {
        /// Signature hex (with or without 0x prefix)
        #[arg(value_name = "SIG_HEX")]
        signature: String,

        /// The signed 32-byte digest
        #[arg(long, value_name = "HASH")]
        hash: String,
    },
}

/// EIP-712 commands.
#[derive(Debug, Clone, Subcommand)]
pub enum TypedDataCommands {
    /// Compute the signing digest of an `eth_signTypedData_v4` JSON file
    Hash {
        /// JSON file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        ///
        /// - `hex` - Digest only (default)
        /// - `json` - Domain separator, struct hash and digest
        #[arg(short, long, default_value = "hex", value_name = "FORMAT")]
        format: OutputFormat,
    },

    /// Check that a signature over the typed data recovers to an address
    ///
    /// Exits with status 1 when the signature is valid but by another key.
    Verify {
        /// JSON file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Expected signer
        #[arg(long, value_name = "ADDRESS")]
        address: String,

        /// Signature hex
        #[arg(long, value_name = "SIG_HEX")]
        signature: String,
    },
}

/// EIP-191 personal message commands.
#[derive(Debug, Clone, Subcommand)]
pub enum MessageCommands {
    /// Compute `keccak256("\x19Ethereum Signed Message:\n" ‖ len ‖ message)`
    Hash {
        /// The message
        #[arg(value_name = "MESSAGE")]
        message: String,

        /// Treat MESSAGE as hex-encoded bytes
        #[arg(long)]
        hex: bool,
    },

    /// Check that a personal-message signature recovers to an address
    ///
    /// Exits with status 1 when the signature is valid but by another key.
    Verify {
        /// The message
        #[arg(value_name = "MESSAGE")]
        message: String,

        /// Expected signer
        #[arg(long, value_name = "ADDRESS")]
        address: String,

        /// Signature hex
        #[arg(long, value_name = "SIG_HEX")]
        signature: String,

        /// Treat MESSAGE as hex-encoded bytes
        #[arg(long)]
        hex: bool,
    },
}

/// Configuration-related actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Print the configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Hex string.
    #[default]
    Hex,
    /// Pretty-printed JSON.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hex => write!(f, "hex"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["scribe", "tx", "decode", "0xc0", "-vv", "-c", "/tmp/c.toml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_tx_decode_defaults_to_json() {
        match parse(&["scribe", "tx", "decode", "0xc0"]).command {
            Commands::Tx {
                command: TxCommands::Decode { transaction, format },
            } => {
                assert_eq!(transaction, "0xc0");
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_typed_data_is_kebab_case() {
        let cli = parse(&["scribe", "typed-data", "hash", "mail.json", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Commands::TypedData {
                command: TypedDataCommands::Hash {
                    format: OutputFormat::Json,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_verify_requires_address() {
        assert!(Cli::try_parse_from(["scribe", "message", "verify", "hi", "--signature", "0x00"])
            .is_err());
    }

    #[test]
    fn test_config_init_force() {
        assert!(matches!(
            parse(&["scribe", "config", "init", "--force"]).command,
            Commands::Config {
                action: ConfigAction::Init { force: true }
            }
        ));
    }

    #[test]
    fn test_tx_build_reads_file() {
        match parse(&["scribe", "tx", "build", "request.json", "--format", "json"]).command {
            Commands::Tx {
                command: TxCommands::Build { file, format },
            } => {
                assert_eq!(file, PathBuf::from("request.json"));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["scribe", "tx", "hash", "0xc0", "--format", "yaml"]).is_err());
    }
}
