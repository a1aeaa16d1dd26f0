//! # scribe-core
//!
//! Foundation layer shared by every scribe crate.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and result aliases
//! - [`primitives`] - Hex and number parsing helpers
//! - [`rlp`] - RLP list builder, field cursor and type detection
//! - [`abi`] - ABI word encoding for static types and the ERC-6492 tuple
//! - [`config`] - Configuration types
//! - [`config_loader`] - Reading and writing `~/.scribe/config.toml`
//!
//! ## Error Handling
//!
//! ```rust
//! use scribe_core::{ScribeError, SignatureError};
//!
//! let err: ScribeError = SignatureError::invalid_length(65, 12).into();
//! assert!(err.to_string().contains("65"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod abi;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod primitives;
pub mod rlp;

pub use error::{
    ConfigError, PrimitiveError, Result, ScribeError, SignatureError, TransactionError,
    TypedDataError,
};

pub use config::{CodecConfig, Config, LegacyVPolicy, LoggingConfig};

pub use config_loader::{expand_path, load_config, ConfigLoader};

// Re-export the primitive types used throughout the public API
pub use alloy_primitives::{Address, Bytes, B256, I256, U256};
