//! Error types for the scribe codec.
//!
//! Errors are organized by the layer that reports them:
//!
//! - [`PrimitiveError`] - Hex, length and address conversion failures
//! - [`TransactionError`] - Transaction envelope encoding/decoding and request validation
//! - [`SignatureError`] - Signature parsing, conversion and recovery failures
//! - [`TypedDataError`] - EIP-712 schema and value failures
//! - [`ConfigError`] - Configuration loading failures
//! - [`ScribeError`] - Top-level error that wraps all error types
//!
//! Every operation in this workspace is a pure transform, so an error is always
//! returned to the caller as-is. Nothing is retried or silently corrected.
//!
//! # Example
//!
//! ```rust
//! use scribe_core::error::{ScribeError, TransactionError};
//!
//! fn decode(data: &[u8]) -> Result<(), ScribeError> {
//!     if data.is_empty() {
//!         return Err(TransactionError::invalid_serialized("empty transaction data").into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(decode(&[]).is_err());
//! ```

/// Top-level error type for the scribe workspace.
///
/// Wraps all domain-specific error types with automatic `#[from]` conversion.
#[derive(Debug, thiserror::Error)]
pub enum ScribeError {
    /// A primitive conversion failed.
    #[error("Primitive error: {0}")]
    Primitive(#[from] PrimitiveError),

    /// Transaction encoding, decoding or validation failed.
    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    /// Signature handling failed.
    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),

    /// Typed data hashing failed.
    #[error("Typed data error: {0}")]
    TypedData(#[from] TypedDataError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// ============================================================================
// PrimitiveError
// ============================================================================

/// Errors raised by the hex, byte and address helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitiveError {
    /// The input is not valid hexadecimal.
    #[error("invalid hex: {context}")]
    InvalidHex {
        /// Context about what was being decoded.
        context: String,
    },

    /// The input is not a 20-byte hex address.
    #[error("invalid address format: {address}")]
    InvalidAddressFormat {
        /// The malformed address string.
        address: String,
    },

    /// A byte string has the wrong length.
    #[error("invalid length for {context}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// What was being read.
        context: String,
        /// The required length.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },

    /// A value does not fit in the target integer width.
    #[error("integer overflow: {context}")]
    Overflow {
        /// Context about the value.
        context: String,
    },
}

impl PrimitiveError {
    /// Create an `InvalidHex` error with context.
    #[must_use]
    pub fn invalid_hex(context: impl Into<String>) -> Self {
        Self::InvalidHex {
            context: context.into(),
        }
    }

    /// Create an `InvalidAddressFormat` error.
    #[must_use]
    pub fn invalid_address(address: impl Into<String>) -> Self {
        Self::InvalidAddressFormat {
            address: address.into(),
        }
    }

    /// Create an `InvalidLength` error.
    #[must_use]
    pub fn invalid_length(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Create an `Overflow` error with context.
    #[must_use]
    pub fn overflow(context: impl Into<String>) -> Self {
        Self::Overflow {
            context: context.into(),
        }
    }
}

// ============================================================================
// TransactionError
// ============================================================================

/// Errors raised while encoding, decoding or validating transactions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    /// The byte string is not a structurally valid transaction
    /// (wrong item count, unknown type marker, missing fields).
    #[error("invalid serialized transaction: {context}")]
    InvalidSerializedTransaction {
        /// Context about what was malformed.
        context: String,
    },

    /// RLP decoding failed.
    #[error("RLP decoding failed: {context}")]
    InvalidRlp {
        /// Context about what was being decoded.
        context: String,
    },

    /// Fee fields contradict each other: `gasPrice` alongside an EIP-1559
    /// fee, or `maxPriorityFeePerGas` above `maxFeePerGas`.
    #[error("conflicting fee fields: {context}")]
    ConflictingFeeFields {
        /// Which fields collided.
        context: String,
    },

    /// The chain id is missing or zero where replay protection is required.
    #[error("invalid chain id: {context}")]
    InvalidChainId {
        /// Context about the chain id.
        context: String,
    },

    /// No fee field was set, so the envelope type cannot be inferred.
    #[error("missing fee fields: {context}")]
    MissingFeeFields {
        /// Context about the request.
        context: String,
    },

    /// A field required by the inferred envelope is absent.
    #[error("missing field: {field}")]
    MissingField {
        /// Name of the absent field.
        field: String,
    },

    /// A blob sidecar is malformed.
    #[error("invalid blob sidecar: {context}")]
    InvalidSidecar {
        /// Context about the sidecar.
        context: String,
    },

    /// The KZG capability failed.
    #[error("KZG operation failed: {context}")]
    Kzg {
        /// Context reported by the KZG backend.
        context: String,
    },

    /// A signature field is invalid.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// A primitive conversion failed.
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
}

impl TransactionError {
    /// Create an `InvalidSerializedTransaction` error with context.
    #[must_use]
    pub fn invalid_serialized(context: impl Into<String>) -> Self {
        Self::InvalidSerializedTransaction {
            context: context.into(),
        }
    }

    /// Create an `InvalidRlp` error with context.
    #[must_use]
    pub fn invalid_rlp(context: impl Into<String>) -> Self {
        Self::InvalidRlp {
            context: context.into(),
        }
    }

    /// Create a `ConflictingFeeFields` error with context.
    #[must_use]
    pub fn conflicting_fee_fields(context: impl Into<String>) -> Self {
        Self::ConflictingFeeFields {
            context: context.into(),
        }
    }

    /// Create an `InvalidChainId` error with context.
    #[must_use]
    pub fn invalid_chain_id(context: impl Into<String>) -> Self {
        Self::InvalidChainId {
            context: context.into(),
        }
    }

    /// Create a `MissingFeeFields` error with context.
    #[must_use]
    pub fn missing_fee_fields(context: impl Into<String>) -> Self {
        Self::MissingFeeFields {
            context: context.into(),
        }
    }

    /// Create a `MissingField` error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an `InvalidSidecar` error with context.
    #[must_use]
    pub fn invalid_sidecar(context: impl Into<String>) -> Self {
        Self::InvalidSidecar {
            context: context.into(),
        }
    }

    /// Create a `Kzg` error with context.
    #[must_use]
    pub fn kzg(context: impl Into<String>) -> Self {
        Self::Kzg {
            context: context.into(),
        }
    }
}

// ============================================================================
// SignatureError
// ============================================================================

/// Errors raised by the signature codec and address recovery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The signature has the wrong byte length.
    #[error("invalid signature length: expected {expected} bytes, got {actual}")]
    InvalidSignatureLength {
        /// The length the format requires.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },

    /// The recovery byte is not a valid `yParity` or `v`.
    #[error("invalid yParity or v: {value}")]
    InvalidYParityOrV {
        /// The rejected value.
        value: u64,
    },

    /// An `r` or `s` scalar is out of range.
    #[error("invalid signature scalar: {context}")]
    InvalidScalar {
        /// Which scalar and why.
        context: String,
    },

    /// Public key recovery failed.
    #[error("address recovery failed: {context}")]
    RecoveryFailed {
        /// Context reported by the curve backend.
        context: String,
    },

    /// An ERC-6492 wrapper could not be decoded.
    #[error("invalid ERC-6492 signature: {context}")]
    InvalidErc6492 {
        /// Context about the ABI payload.
        context: String,
    },

    /// A primitive conversion failed.
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
}

impl SignatureError {
    /// Create an `InvalidSignatureLength` error.
    #[must_use]
    pub const fn invalid_length(expected: usize, actual: usize) -> Self {
        Self::InvalidSignatureLength { expected, actual }
    }

    /// Create an `InvalidYParityOrV` error.
    #[must_use]
    pub const fn invalid_y_parity_or_v(value: u64) -> Self {
        Self::InvalidYParityOrV { value }
    }

    /// Create an `InvalidScalar` error with context.
    #[must_use]
    pub fn invalid_scalar(context: impl Into<String>) -> Self {
        Self::InvalidScalar {
            context: context.into(),
        }
    }

    /// Create a `RecoveryFailed` error with context.
    #[must_use]
    pub fn recovery_failed(context: impl Into<String>) -> Self {
        Self::RecoveryFailed {
            context: context.into(),
        }
    }

    /// Create an `InvalidErc6492` error with context.
    #[must_use]
    pub fn invalid_erc6492(context: impl Into<String>) -> Self {
        Self::InvalidErc6492 {
            context: context.into(),
        }
    }
}

// ============================================================================
// TypedDataError
// ============================================================================

/// Errors raised while validating or hashing EIP-712 typed data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypedDataError {
    /// The primary type is not declared in `types`.
    #[error("invalid primary type: {primary_type}")]
    InvalidPrimaryType {
        /// The primary type that was requested.
        primary_type: String,
    },

    /// A message field is missing or cannot be converted to its declared type.
    #[error("invalid field {field}: {context}")]
    InvalidField {
        /// The field path (e.g. `Mail.from.wallet`).
        field: String,
        /// Why the value was rejected.
        context: String,
    },

    /// The `types` map itself is malformed.
    #[error("invalid type definition: {context}")]
    InvalidTypeDefinition {
        /// Context about the definition.
        context: String,
    },

    /// A signature used for verification is malformed.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// A primitive conversion failed.
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
}

impl TypedDataError {
    /// Create an `InvalidPrimaryType` error.
    #[must_use]
    pub fn invalid_primary_type(primary_type: impl Into<String>) -> Self {
        Self::InvalidPrimaryType {
            primary_type: primary_type.into(),
        }
    }

    /// Create an `InvalidField` error.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Create an `InvalidTypeDefinition` error.
    #[must_use]
    pub fn invalid_type_definition(context: impl Into<String>) -> Self {
        Self::InvalidTypeDefinition {
            context: context.into(),
        }
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {context}")]
    ParseFailed {
        /// Context about the parsing failure.
        context: String,
    },

    /// A configuration value is invalid.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The field name with the invalid value.
        field: String,
        /// The invalid value.
        value: String,
    },

    /// Reading or writing the configuration failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being done.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}

impl ConfigError {
    /// Create a `FileNotFound` error.
    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a `ParseFailed` error.
    #[must_use]
    pub fn parse_failed(context: impl Into<String>) -> Self {
        Self::ParseFailed {
            context: context.into(),
        }
    }

    /// Create an `InvalidValue` error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an `Io` error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a `NoHomeDirectory` error.
    #[must_use]
    pub const fn no_home_directory() -> Self {
        Self::NoHomeDirectory
    }
}

// ============================================================================
// Result type aliases
// ============================================================================

/// A `Result` type alias using [`ScribeError`] as the error type.
pub type Result<T> = std::result::Result<T, ScribeError>;

/// A `Result` type alias for primitive conversions.
pub type PrimitiveResult<T> = std::result::Result<T, PrimitiveError>;

/// A `Result` type alias for transaction operations.
pub type TransactionResult<T> = std::result::Result<T, TransactionError>;

/// A `Result` type alias for signature operations.
pub type SignatureResult<T> = std::result::Result<T, SignatureError>;

/// A `Result` type alias for typed data operations.
pub type TypedDataResult<T> = std::result::Result<T, TypedDataError>;

/// A `Result` type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    // ------------------------------------------------------------------------
    // ScribeError tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_scribe_error_from_transaction_error() {
        let err: ScribeError = TransactionError::invalid_serialized("10 items").into();

        assert!(matches!(
            err,
            ScribeError::Transaction(TransactionError::InvalidSerializedTransaction { .. })
        ));
        assert_eq!(
            err.to_string(),
            "Transaction error: invalid serialized transaction: 10 items"
        );
    }

    #[test]
    fn test_scribe_error_from_signature_error() {
        let err: ScribeError = SignatureError::invalid_length(65, 64).into();

        assert_eq!(
            err.to_string(),
            "Signature error: invalid signature length: expected 65 bytes, got 64"
        );
    }

    #[test]
    fn test_scribe_error_from_typed_data_error() {
        let err: ScribeError = TypedDataError::invalid_primary_type("Mail").into();

        assert_eq!(
            err.to_string(),
            "Typed data error: invalid primary type: Mail"
        );
    }

    #[test]
    fn test_scribe_error_from_config_error() {
        let err: ScribeError = ConfigError::parse_failed("bad toml").into();

        assert_eq!(
            err.to_string(),
            "Configuration error: failed to parse configuration: bad toml"
        );
    }

    // ------------------------------------------------------------------------
    // Nested conversions
    // ------------------------------------------------------------------------

    #[test]
    fn test_signature_error_is_transparent_inside_transaction_error() {
        let err: TransactionError = SignatureError::invalid_y_parity_or_v(31).into();

        assert_eq!(err.to_string(), "invalid yParity or v: 31");
        assert!(matches!(
            err,
            TransactionError::Signature(SignatureError::InvalidYParityOrV { value: 31 })
        ));
    }

    #[test]
    fn test_primitive_error_is_transparent_inside_typed_data_error() {
        let err: TypedDataError = PrimitiveError::invalid_address("0x1234").into();

        assert_eq!(err.to_string(), "invalid address format: 0x1234");
    }

    #[test]
    fn test_conflicting_fee_fields_message() {
        let err = TransactionError::conflicting_fee_fields(
            "maxPriorityFeePerGas (2) exceeds maxFeePerGas (1)",
        );

        assert_eq!(
            err.to_string(),
            "conflicting fee fields: maxPriorityFeePerGas (2) exceeds maxFeePerGas (1)"
        );
    }

    #[test]
    fn test_config_io_error_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::io("failed to read config.toml", io);

        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "failed to read config.toml: denied");
    }
}
