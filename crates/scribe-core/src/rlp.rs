//! RLP encoding and decoding utilities for Ethereum transactions.
//!
//! This module wraps `alloy-rlp` with the building blocks the envelope codec
//! needs:
//!
//! - [`RlpList`] - an ordered list builder that counts its items
//! - [`RlpFields`] - a positional cursor over a decoded list
//! - [`RlpItem`] - a generic string/list tree for inspecting arbitrary payloads
//! - transaction type detection helpers
//!
//! Integers are always encoded minimally (zero is the empty string) and decoded
//! canonically: leading zero bytes are rejected.
//!
//! # Ethereum Transaction Types
//!
//! - **Legacy**: starts with an RLP list prefix (`0xc0..=0xff`)
//! - **EIP-2930 (Type 1)**, **EIP-1559 (Type 2)**, **EIP-4844 (Type 3)**,
//!   **EIP-7702 (Type 4)**: prefixed with the type byte
//!
//! # Example
//!
//! ```
//! use scribe_core::rlp::{decode_list, detect_tx_type, RlpList};
//!
//! let mut list = RlpList::new();
//! list.push(&1u64).push(&0u64).push_bytes(b"abc");
//! let encoded = list.finish();
//! assert_eq!(encoded, vec![0xc6, 0x01, 0x80, 0x83, b'a', b'b', b'c']);
//!
//! assert_eq!(decode_list(&encoded).unwrap().len(), 3);
//! assert_eq!(detect_tx_type(&[0x02, 0xc0]), Some(2));
//! assert_eq!(detect_tx_type(&encoded), None);
//! ```

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rlp::{Decodable, Encodable, Header, PayloadView};
use serde::Serialize;

use crate::error::TransactionError;

/// Result type for RLP operations.
pub type RlpResult<T> = Result<T, TransactionError>;

/// Highest EIP-2718 type byte this codec understands.
const MAX_TX_TYPE: u8 = 0x04;

// ============================================================================
// Transaction Type Detection
// ============================================================================

/// Detect the EIP-2718 transaction type from the first byte.
///
/// Returns `Some(1..=4)` for known typed envelopes and `None` for everything
/// else, including legacy transactions (which start with an RLP list prefix).
///
/// ```
/// use scribe_core::rlp::detect_tx_type;
///
/// assert_eq!(detect_tx_type(&[0x04, 0xc0]), Some(4));
/// assert_eq!(detect_tx_type(&[0xf8, 0x6c]), None);
/// assert_eq!(detect_tx_type(&[0x05]), None);
/// assert_eq!(detect_tx_type(&[]), None);
/// ```
#[must_use]
pub fn detect_tx_type(data: &[u8]) -> Option<u8> {
    data.first()
        .copied()
        .filter(|&b| (0x01..=MAX_TX_TYPE).contains(&b))
}

/// Check if data starts with an RLP list prefix.
///
/// ```
/// use scribe_core::rlp::is_list;
///
/// assert!(is_list(&[0xc0]));
/// assert!(!is_list(&[0x80]));
/// assert!(!is_list(&[]));
/// ```
#[must_use]
pub fn is_list(data: &[u8]) -> bool {
    data.first().is_some_and(|&b| b >= 0xc0)
}

// ============================================================================
// Decoding Helpers
// ============================================================================

fn rlp_error(what: &str, e: &alloy_rlp::Error) -> TransactionError {
    TransactionError::invalid_rlp(format!("failed to decode {what}: {e}"))
}

/// Decode an RLP list and return its items, each still RLP-encoded.
///
/// Trailing bytes after the list are rejected.
///
/// # Errors
///
/// Returns [`TransactionError::InvalidRlp`] if the data is not a single,
/// complete RLP list.
pub fn decode_list(data: &[u8]) -> RlpResult<Vec<&[u8]>> {
    let mut buf = data;
    let payload = Header::decode_raw(&mut buf).map_err(|e| rlp_error("list", &e))?;
    if !buf.is_empty() {
        return Err(TransactionError::invalid_rlp(format!(
            "{} trailing bytes after list",
            buf.len()
        )));
    }

    match payload {
        PayloadView::List(items) => Ok(items),
        PayloadView::String(_) => Err(TransactionError::invalid_rlp(
            "expected list, found string",
        )),
    }
}

/// Decode an RLP byte string (not a list).
///
/// # Errors
///
/// Returns [`TransactionError::InvalidRlp`] if the data is a list or truncated.
pub fn decode_bytes(data: &[u8]) -> RlpResult<Bytes> {
    let mut buf = data;
    let bytes = Header::decode_bytes(&mut buf, false).map_err(|e| rlp_error("bytes", &e))?;
    Ok(Bytes::copy_from_slice(bytes))
}

/// Decode a canonical `u64`.
///
/// # Errors
///
/// Returns [`TransactionError::InvalidRlp`] on leading zeros or overflow.
pub fn decode_u64(data: &[u8]) -> RlpResult<u64> {
    let mut buf = data;
    u64::decode(&mut buf).map_err(|e| rlp_error("u64", &e))
}

/// Decode a canonical `u128`.
///
/// # Errors
///
/// Returns [`TransactionError::InvalidRlp`] on leading zeros or overflow.
pub fn decode_u128(data: &[u8]) -> RlpResult<u128> {
    let mut buf = data;
    u128::decode(&mut buf).map_err(|e| rlp_error("u128", &e))
}

/// Decode a canonical [`U256`].
///
/// # Errors
///
/// Returns [`TransactionError::InvalidRlp`] on leading zeros or overflow.
pub fn decode_u256(data: &[u8]) -> RlpResult<U256> {
    let mut buf = data;
    U256::decode(&mut buf).map_err(|e| rlp_error("U256", &e))
}

/// Decode an exactly-20-byte address.
///
/// # Errors
///
/// Returns [`TransactionError::InvalidRlp`] if the string is not 20 bytes.
pub fn decode_address(data: &[u8]) -> RlpResult<Address> {
    let mut buf = data;
    Address::decode(&mut buf).map_err(|e| rlp_error("address", &e))
}

/// Decode an address that may be the empty string (contract creation).
///
/// # Errors
///
/// Returns [`TransactionError::InvalidRlp`] if a non-empty value is not 20 bytes.
pub fn decode_optional_address(data: &[u8]) -> RlpResult<Option<Address>> {
    if data == [alloy_rlp::EMPTY_STRING_CODE] {
        return Ok(None);
    }
    decode_address(data).map(Some)
}

/// Decode an exactly-32-byte word.
///
/// # Errors
///
/// Returns [`TransactionError::InvalidRlp`] if the string is not 32 bytes.
pub fn decode_b256(data: &[u8]) -> RlpResult<B256> {
    let mut buf = data;
    B256::decode(&mut buf).map_err(|e| rlp_error("32-byte word", &e))
}

// ============================================================================
// RlpFields
// ============================================================================

/// Positional cursor over the items of a decoded RLP list.
///
/// Each accessor consumes the next item and tags errors with the field name.
#[derive(Debug, Clone)]
pub struct RlpFields<'a> {
    items: Vec<&'a [u8]>,
    index: usize,
    context: &'static str,
}

impl<'a> RlpFields<'a> {
    /// Wrap decoded list items. `context` names the structure in error messages.
    #[must_use]
    pub const fn new(items: Vec<&'a [u8]>, context: &'static str) -> Self {
        Self {
            items,
            index: 0,
            context,
        }
    }

    /// Number of items not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.index)
    }

    /// Total number of items in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Require the list to hold exactly `expected` items.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidSerializedTransaction`] otherwise.
    pub fn expect_len(&self, expected: usize) -> RlpResult<()> {
        if self.items.len() == expected {
            Ok(())
        } else {
            Err(TransactionError::invalid_serialized(format!(
                "{}: expected {expected} items, got {}",
                self.context,
                self.items.len()
            )))
        }
    }

    fn tag(&self, field: &str, err: TransactionError) -> TransactionError {
        match err {
            TransactionError::InvalidRlp { context } => {
                TransactionError::invalid_rlp(format!("{}.{field}: {context}", self.context))
            }
            other => other,
        }
    }

    /// Take the next raw (still encoded) item.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidSerializedTransaction`] when exhausted.
    pub fn raw(&mut self, field: &str) -> RlpResult<&'a [u8]> {
        let item = self.items.get(self.index).copied().ok_or_else(|| {
            TransactionError::invalid_serialized(format!("{}: missing {field}", self.context))
        })?;
        self.index += 1;
        Ok(item)
    }

    /// Peek whether the next item is the empty string.
    #[must_use]
    pub fn next_is_empty(&self) -> bool {
        self.items
            .get(self.index)
            .is_some_and(|item| *item == [alloy_rlp::EMPTY_STRING_CODE])
    }

    /// Decode the next item as a `u64`.
    ///
    /// # Errors
    ///
    /// See [`decode_u64`].
    pub fn u64(&mut self, field: &str) -> RlpResult<u64> {
        let item = self.raw(field)?;
        decode_u64(item).map_err(|e| self.tag(field, e))
    }

    /// Decode the next item as a `u128`.
    ///
    /// # Errors
    ///
    /// See [`decode_u128`].
    pub fn u128(&mut self, field: &str) -> RlpResult<u128> {
        let item = self.raw(field)?;
        decode_u128(item).map_err(|e| self.tag(field, e))
    }

    /// Decode the next item as a [`U256`].
    ///
    /// # Errors
    ///
    /// See [`decode_u256`].
    pub fn u256(&mut self, field: &str) -> RlpResult<U256> {
        let item = self.raw(field)?;
        decode_u256(item).map_err(|e| self.tag(field, e))
    }

    /// Decode the next item as a byte string.
    ///
    /// # Errors
    ///
    /// See [`decode_bytes`].
    pub fn bytes(&mut self, field: &str) -> RlpResult<Bytes> {
        let item = self.raw(field)?;
        decode_bytes(item).map_err(|e| self.tag(field, e))
    }

    /// Decode the next item as an address.
    ///
    /// # Errors
    ///
    /// See [`decode_address`].
    pub fn address(&mut self, field: &str) -> RlpResult<Address> {
        let item = self.raw(field)?;
        decode_address(item).map_err(|e| self.tag(field, e))
    }

    /// Decode the next item as an optional address.
    ///
    /// # Errors
    ///
    /// See [`decode_optional_address`].
    pub fn optional_address(&mut self, field: &str) -> RlpResult<Option<Address>> {
        let item = self.raw(field)?;
        decode_optional_address(item).map_err(|e| self.tag(field, e))
    }

    /// Decode the next item as a 32-byte word.
    ///
    /// # Errors
    ///
    /// See [`decode_b256`].
    pub fn b256(&mut self, field: &str) -> RlpResult<B256> {
        let item = self.raw(field)?;
        decode_b256(item).map_err(|e| self.tag(field, e))
    }

    /// Decode the next item as a nested list, returning its raw items.
    ///
    /// # Errors
    ///
    /// See [`decode_list`].
    pub fn list(&mut self, field: &str) -> RlpResult<Vec<&'a [u8]>> {
        let item = self.raw(field)?;
        decode_list(item).map_err(|e| self.tag(field, e))
    }
}

// ============================================================================
// RlpList
// ============================================================================

/// Builder for an RLP list.
///
/// Items are appended in order; [`RlpList::finish`] prepends the list header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RlpList {
    payload: Vec<u8>,
    count: usize,
}

impl RlpList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            payload: Vec::new(),
            count: 0,
        }
    }

    /// Append any `alloy-rlp` encodable value (integers encode minimally).
    pub fn push<T: Encodable + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.encode(&mut self.payload);
        self.count += 1;
        self
    }

    /// Append a byte string item.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.push(bytes)
    }

    /// Append an address, or the empty string for `None`.
    pub fn push_optional_address(&mut self, address: Option<&Address>) -> &mut Self {
        match address {
            Some(address) => self.push(address),
            None => self.push_bytes(&[]),
        }
    }

    /// Append a nested list.
    pub fn push_list(&mut self, list: &Self) -> &mut Self {
        list.encode_into(&mut self.payload);
        self.count += 1;
        self
    }

    /// Append an item that is already RLP-encoded.
    pub fn push_raw(&mut self, encoded: &[u8]) -> &mut Self {
        self.payload.extend_from_slice(encoded);
        self.count += 1;
        self
    }

    /// Number of items appended so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Whether no items have been appended.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Write the list header followed by the payload into `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        Header {
            list: true,
            payload_length: self.payload.len(),
        }
        .encode(out);
        out.extend_from_slice(&self.payload);
    }

    /// Consume the builder and return the encoded list.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload.len() + 9);
        self.encode_into(&mut out);
        out
    }
}

// ============================================================================
// RlpItem
// ============================================================================

/// A generic RLP value: a byte string or a list of values.
///
/// Serializes as a hex string or a JSON array of nested items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RlpItem {
    /// A byte string.
    String(Bytes),
    /// A list of nested items.
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// Decode a complete RLP value.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidRlp`] on malformed or trailing data.
    pub fn decode(data: &[u8]) -> RlpResult<Self> {
        let mut buf = data;
        let payload = Header::decode_raw(&mut buf).map_err(|e| rlp_error("item", &e))?;
        if !buf.is_empty() {
            return Err(TransactionError::invalid_rlp(format!(
                "{} trailing bytes after item",
                buf.len()
            )));
        }
        match payload {
            PayloadView::String(bytes) => Ok(Self::String(Bytes::copy_from_slice(bytes))),
            PayloadView::List(items) => items
                .into_iter()
                .map(Self::decode)
                .collect::<RlpResult<Vec<_>>>()
                .map(Self::List),
        }
    }

    /// Number of items if this is a list.
    #[must_use]
    pub fn list_len(&self) -> Option<usize> {
        match self {
            Self::List(items) => Some(items.len()),
            Self::String(_) => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
