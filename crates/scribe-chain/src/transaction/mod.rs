//! Ethereum transaction envelopes.
//!
//! [`Transaction`] is a closed sum over the five envelope kinds. Every
//! operation dispatches through a single `match`, so adding a kind is a
//! compile error until each operation handles it.
//!
//! # Supported Transaction Types
//!
//! - **Legacy (Type 0)**: RLP list without a type byte, EIP-155 aware
//! - **EIP-2930 (Type 1)**: access list transactions, prefixed with `0x01`
//! - **EIP-1559 (Type 2)**: dynamic fee transactions, prefixed with `0x02`
//! - **EIP-4844 (Type 3)**: blob transactions, prefixed with `0x03`
//! - **EIP-7702 (Type 4)**: set-code transactions, prefixed with `0x04`
//!
//! # Signing Flow
//!
//! ```
//! use scribe_chain::transaction::{Transaction, TxEip1559};
//! use scribe_crypto::Secp256k1KeyPair;
//! use alloy_primitives::{Address, U256};
//!
//! let keypair = Secp256k1KeyPair::from_bytes([0x01; 32]).unwrap();
//! let tx = Transaction::Eip1559(TxEip1559 {
//!     chain_id: 1,
//!     nonce: 0,
//!     max_priority_fee_per_gas: 1_000_000_000,
//!     max_fee_per_gas: 20_000_000_000,
//!     gas: 21_000,
//!     to: Some(Address::ZERO),
//!     value: U256::from(1u64),
//!     ..Default::default()
//! });
//!
//! let signature = keypair.sign_hash(&tx.signing_hash()).unwrap();
//! let signed = tx.with_signature(signature);
//!
//! let raw = signed.encode();
//! let decoded = Transaction::decode(&raw).unwrap();
//! assert_eq!(decoded, signed);
//! assert_eq!(decoded.recover_signer().unwrap(), keypair.address());
//! ```
//!
//! # Hashes
//!
//! - [`Transaction::signing_hash`] is over the unsigned encoding.
//! - [`Transaction::tx_hash`] is over the signed encoding. Blob sidecars are
//!   never part of either.

use std::fmt;

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use scribe_core::config::CodecConfig;
use scribe_core::error::{SignatureError, TransactionError, TransactionResult};
use scribe_core::rlp::{detect_tx_type, is_list};
use scribe_crypto::{recover_address, Signature};

pub mod access_list;
pub mod authorization;
pub mod eip1559;
pub mod eip2930;
pub mod eip4844;
pub mod eip7702;
pub mod legacy;
pub mod request;
pub mod sidecar;
mod typed;

pub use access_list::{AccessList, AccessListItem};
pub use authorization::{Authorization, SignedAuthorization, AUTHORIZATION_MAGIC};
pub use eip1559::TxEip1559;
pub use eip2930::TxEip2930;
pub use eip4844::TxEip4844;
pub use eip7702::TxEip7702;
pub use legacy::TxLegacy;
pub use request::{assert_request, TransactionRequest};
pub use sidecar::{versioned_hash, BlobSidecar, Kzg, KzgCommitment, KzgProof, BLOB_SIZE};
pub use typed::SIGNATURE_ITEMS;

use typed::{decode_envelope, encode_envelope};

// ============================================================================
// TxType
// ============================================================================

/// EIP-2718 transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TxType {
    /// Legacy, no type byte on the wire.
    Legacy = 0x00,
    /// EIP-2930 access list.
    Eip2930 = 0x01,
    /// EIP-1559 dynamic fee.
    Eip1559 = 0x02,
    /// EIP-4844 blob.
    Eip4844 = 0x03,
    /// EIP-7702 set code.
    Eip7702 = 0x04,
}

impl TryFrom<u8> for TxType {
    type Error = TransactionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Legacy),
            0x01 => Ok(Self::Eip2930),
            0x02 => Ok(Self::Eip1559),
            0x03 => Ok(Self::Eip4844),
            0x04 => Ok(Self::Eip7702),
            other => Err(TransactionError::invalid_serialized(format!(
                "unknown transaction type 0x{other:02x}"
            ))),
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Legacy => "legacy",
            Self::Eip2930 => "eip2930",
            Self::Eip1559 => "eip1559",
            Self::Eip4844 => "eip4844",
            Self::Eip7702 => "eip7702",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Transaction
// ============================================================================

/// A transaction of any supported envelope kind, signed or unsigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Transaction {
    /// Legacy transaction.
    #[serde(rename = "0x0")]
    Legacy(TxLegacy),
    /// EIP-2930 transaction.
    #[serde(rename = "0x1")]
    Eip2930(TxEip2930),
    /// EIP-1559 transaction.
    #[serde(rename = "0x2")]
    Eip1559(TxEip1559),
    /// EIP-4844 transaction.
    #[serde(rename = "0x3")]
    Eip4844(TxEip4844),
    /// EIP-7702 transaction.
    #[serde(rename = "0x4")]
    Eip7702(TxEip7702),
}

impl Transaction {
    // ------------------------------------------------------------------------
    // Decoding
    // ------------------------------------------------------------------------

    /// Decode raw transaction bytes with the default codec settings.
    ///
    /// # Errors
    ///
    /// See [`decode_with`](Self::decode_with).
    pub fn decode(raw: &[u8]) -> TransactionResult<Self> {
        Self::decode_with(raw, &CodecConfig::default())
    }

    /// Decode raw transaction bytes.
    ///
    /// A leading RLP list prefix means legacy; a leading `0x01..=0x04` selects
    /// the typed envelope. EIP-4844 payloads are accepted in both the canonical
    /// and the network-wrapper form.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::InvalidSerializedTransaction`] for empty input, an
    ///   unknown type byte or a wrong item count
    /// - [`TransactionError::InvalidRlp`] for malformed RLP or non-canonical integers
    /// - [`TransactionError::Signature`] for an invalid `yParity` or `v`
    /// - [`TransactionError::InvalidSidecar`] for malformed blob sidecars
    pub fn decode_with(raw: &[u8], config: &CodecConfig) -> TransactionResult<Self> {
        let Some(&first) = raw.first() else {
            return Err(TransactionError::invalid_serialized(
                "empty transaction data",
            ));
        };

        let tx = if is_list(raw) {
            Self::Legacy(TxLegacy::decode(raw, config.legacy_v)?)
        } else {
            let payload = &raw[1..];
            match detect_tx_type(raw).map(TxType::try_from) {
                Some(Ok(TxType::Eip2930)) => Self::Eip2930(decode_envelope(payload)?),
                Some(Ok(TxType::Eip1559)) => Self::Eip1559(decode_envelope(payload)?),
                Some(Ok(TxType::Eip4844)) => Self::Eip4844(TxEip4844::decode_network(payload)?),
                Some(Ok(TxType::Eip7702)) => Self::Eip7702(decode_envelope(payload)?),
                _ => {
                    return Err(TransactionError::invalid_serialized(format!(
                        "unknown transaction type 0x{first:02x}"
                    )))
                }
            }
        };

        tracing::debug!(
            tx_type = %tx.tx_type(),
            signed = tx.is_signed(),
            len = raw.len(),
            "decoded transaction"
        );
        Ok(tx)
    }

    // ------------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------------

    /// Encode for broadcast: the signed form if a signature is attached, and
    /// the EIP-4844 network wrapper if sidecars are attached.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Legacy(tx) => tx.signed_rlp().finish(),
            Self::Eip2930(tx) => encode_envelope(tx, true),
            Self::Eip1559(tx) => encode_envelope(tx, true),
            Self::Eip4844(tx) => tx.encode_network(true),
            Self::Eip7702(tx) => encode_envelope(tx, true),
        }
    }

    /// Encode the unsigned form that is hashed for signing.
    #[must_use]
    pub fn encode_for_signing(&self) -> Vec<u8> {
        match self {
            Self::Legacy(tx) => tx.signing_rlp().finish(),
            Self::Eip2930(tx) => encode_envelope(tx, false),
            Self::Eip1559(tx) => encode_envelope(tx, false),
            Self::Eip4844(tx) => encode_envelope(tx, false),
            Self::Eip7702(tx) => encode_envelope(tx, false),
        }
    }

    /// The digest a sender signs: `keccak256(encode_for_signing())`.
    #[must_use]
    pub fn signing_hash(&self) -> B256 {
        keccak256(self.encode_for_signing())
    }

    /// The transaction hash, or `None` while unsigned.
    ///
    /// Computed over the signed canonical encoding; the EIP-4844 network
    /// wrapper is never hashed.
    #[must_use]
    pub fn tx_hash(&self) -> Option<B256> {
        if !self.is_signed() {
            return None;
        }
        let encoded = match self {
            Self::Eip4844(tx) => encode_envelope(tx, true),
            other => other.encode(),
        };
        Some(keccak256(encoded))
    }

    // ------------------------------------------------------------------------
    // Signing
    // ------------------------------------------------------------------------

    /// Attach a signature. Any `v` on the signature is dropped; legacy `v` is
    /// derived from the parity and chain id on encode.
    #[must_use]
    pub fn with_signature(mut self, signature: Signature) -> Self {
        let signature = Some(signature.without_v());
        match &mut self {
            Self::Legacy(tx) => tx.signature = signature,
            Self::Eip2930(tx) => tx.signature = signature,
            Self::Eip1559(tx) => tx.signature = signature,
            Self::Eip4844(tx) => tx.signature = signature,
            Self::Eip7702(tx) => tx.signature = signature,
        }
        self
    }

    /// Recover the sender of a signed transaction.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::RecoveryFailed`] if the transaction is unsigned
    /// or the signature does not recover.
    pub fn recover_signer(&self) -> TransactionResult<Address> {
        let signature = self
            .signature()
            .ok_or_else(|| SignatureError::recovery_failed("transaction is not signed"))?;
        Ok(recover_address(&self.signing_hash(), signature)?)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The envelope kind.
    #[must_use]
    pub const fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(_) => TxType::Legacy,
            Self::Eip2930(_) => TxType::Eip2930,
            Self::Eip1559(_) => TxType::Eip1559,
            Self::Eip4844(_) => TxType::Eip4844,
            Self::Eip7702(_) => TxType::Eip7702,
        }
    }

    /// The attached signature, if any.
    #[must_use]
    pub const fn signature(&self) -> Option<&Signature> {
        match self {
            Self::Legacy(tx) => tx.signature.as_ref(),
            Self::Eip2930(tx) => tx.signature.as_ref(),
            Self::Eip1559(tx) => tx.signature.as_ref(),
            Self::Eip4844(tx) => tx.signature.as_ref(),
            Self::Eip7702(tx) => tx.signature.as_ref(),
        }
    }

    /// Whether a signature is attached.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.signature().is_some()
    }

    /// Chain id. `None` only for legacy transactions without replay protection.
    #[must_use]
    pub const fn chain_id(&self) -> Option<u64> {
        match self {
            Self::Legacy(tx) => tx.chain_id,
            Self::Eip2930(tx) => Some(tx.chain_id),
            Self::Eip1559(tx) => Some(tx.chain_id),
            Self::Eip4844(tx) => Some(tx.chain_id),
            Self::Eip7702(tx) => Some(tx.chain_id),
        }
    }

    /// Sender nonce.
    #[must_use]
    pub const fn nonce(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.nonce,
            Self::Eip2930(tx) => tx.nonce,
            Self::Eip1559(tx) => tx.nonce,
            Self::Eip4844(tx) => tx.nonce,
            Self::Eip7702(tx) => tx.nonce,
        }
    }

    /// Gas limit.
    #[must_use]
    pub const fn gas(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.gas,
            Self::Eip2930(tx) => tx.gas,
            Self::Eip1559(tx) => tx.gas,
            Self::Eip4844(tx) => tx.gas,
            Self::Eip7702(tx) => tx.gas,
        }
    }

    /// Recipient; `None` for contract creation.
    #[must_use]
    pub const fn to(&self) -> Option<Address> {
        match self {
            Self::Legacy(tx) => tx.to,
            Self::Eip2930(tx) => tx.to,
            Self::Eip1559(tx) => tx.to,
            Self::Eip4844(tx) => Some(tx.to),
            Self::Eip7702(tx) => Some(tx.to),
        }
    }

    /// Value in wei.
    #[must_use]
    pub const fn value(&self) -> U256 {
        match self {
            Self::Legacy(tx) => tx.value,
            Self::Eip2930(tx) => tx.value,
            Self::Eip1559(tx) => tx.value,
            Self::Eip4844(tx) => tx.value,
            Self::Eip7702(tx) => tx.value,
        }
    }

    /// Calldata.
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        match self {
            Self::Legacy(tx) => &tx.data,
            Self::Eip2930(tx) => &tx.data,
            Self::Eip1559(tx) => &tx.data,
            Self::Eip4844(tx) => &tx.data,
            Self::Eip7702(tx) => &tx.data,
        }
    }

    /// Access list, if the envelope has one.
    #[must_use]
    pub const fn access_list(&self) -> Option<&AccessList> {
        match self {
            Self::Legacy(_) => None,
            Self::Eip2930(tx) => Some(&tx.access_list),
            Self::Eip1559(tx) => Some(&tx.access_list),
            Self::Eip4844(tx) => Some(&tx.access_list),
            Self::Eip7702(tx) => Some(&tx.access_list),
        }
    }
}

impl From<TxLegacy> for Transaction {
    fn from(tx: TxLegacy) -> Self {
        Self::Legacy(tx)
    }
}

impl From<TxEip2930> for Transaction {
    fn from(tx: TxEip2930) -> Self {
        Self::Eip2930(tx)
    }
}

impl From<TxEip1559> for Transaction {
    fn from(tx: TxEip1559) -> Self {
        Self::Eip1559(tx)
    }
}

impl From<TxEip4844> for Transaction {
    fn from(tx: TxEip4844) -> Self {
        Self::Eip4844(tx)
    }
}

impl From<TxEip7702> for Transaction {
    fn from(tx: TxEip7702) -> Self {
        Self::Eip7702(tx)
    }
}

// ============================================================================
// Tests
// ============================================================================
