//! Canonical ECDSA signature and its wire formats.
//!
//! A [`Signature`] is `(r, s, yParity)` plus an optional legacy `v` byte that
//! records how the parity was supplied. Two wire formats are supported here:
//!
//! - **Raw** (65 bytes): `r ‖ s ‖ yParityOrV`. Parsing accepts `0`, `1`, `27`
//!   and `28` as the trailing byte. Serialization always emits `27`/`28`.
//! - **Compact** (EIP-2098, 64 bytes): see [`CompactSignature`].
//!
//! [`Signature::from_slice`] accepts either length.
//!
//! # Example
//!
//! ```
//! use scribe_crypto::signature::Signature;
//!
//! let hex = format!("0x{}{}1c", "11".repeat(32), "22".repeat(32));
//! let sig: Signature = hex.parse().unwrap();
//!
//! assert!(sig.y_parity());
//! assert_eq!(sig.v(), Some(28));
//! assert_eq!(sig.to_hex(), hex);
//! ```

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

use scribe_core::error::{SignatureError, SignatureResult};
use scribe_core::primitives::{decode_hex, encode_hex};

use crate::compact::CompactSignature;

/// Length of a raw `r ‖ s ‖ v` signature.
pub const RAW_SIGNATURE_LEN: usize = 65;

/// Length of an EIP-2098 compact signature.
pub const COMPACT_SIGNATURE_LEN: usize = 64;

/// Offset of legacy `v` values without replay protection.
pub const LEGACY_V_OFFSET: u64 = 27;

/// Offset of EIP-155 `v` values: `v = chainId * 2 + 35 + yParity`.
pub const EIP155_V_OFFSET: u64 = 35;

/// An ECDSA secp256k1 signature.
///
/// `r` and `s` are unsigned 256-bit scalars. `v`, when present, is the `27`/`28`
/// byte the signature was parsed from; it always agrees with `y_parity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    r: U256,
    s: U256,
    y_parity: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v: Option<u64>,
}

impl Signature {
    /// Build a signature from its scalars and parity bit.
    #[must_use]
    pub const fn new(r: U256, s: U256, y_parity: bool) -> Self {
        Self {
            r,
            s,
            y_parity,
            v: None,
        }
    }

    /// Build a signature from its scalars and a `yParityOrV` value.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidYParityOrV`] unless `value` is
    /// `0`, `1`, `27` or `28`.
    pub const fn from_parity_or_v(r: U256, s: U256, value: u64) -> SignatureResult<Self> {
        match value {
            0 | 1 => Ok(Self::new(r, s, value == 1)),
            27 | 28 => Ok(Self {
                r,
                s,
                y_parity: value == 28,
                v: Some(value),
            }),
            _ => Err(SignatureError::invalid_y_parity_or_v(value)),
        }
    }

    /// Parse a raw 65-byte `r ‖ s ‖ yParityOrV` signature.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidSignatureLength`] for any other length and
    /// [`SignatureError::InvalidYParityOrV`] for an unknown trailing byte.
    pub fn from_raw(bytes: &[u8]) -> SignatureResult<Self> {
        if bytes.len() != RAW_SIGNATURE_LEN {
            return Err(SignatureError::invalid_length(
                RAW_SIGNATURE_LEN,
                bytes.len(),
            ));
        }
        let r = U256::from_be_slice(&bytes[..32]);
        let s = U256::from_be_slice(&bytes[32..64]);
        Self::from_parity_or_v(r, s, u64::from(bytes[64]))
    }

    /// Parse a raw signature from hex (`0x` prefix optional).
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::Primitive`] for malformed hex, otherwise see
    /// [`from_raw`](Self::from_raw).
    pub fn parse_hex(input: &str) -> SignatureResult<Self> {
        let bytes = decode_hex(input)?;
        Self::from_raw(&bytes)
    }

    /// Parse either a 65-byte raw or a 64-byte compact signature.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidSignatureLength`] for other lengths.
    pub fn from_slice(bytes: &[u8]) -> SignatureResult<Self> {
        match bytes.len() {
            COMPACT_SIGNATURE_LEN => Ok(CompactSignature::from_bytes(bytes)?.to_signature()),
            _ => Self::from_raw(bytes),
        }
    }

    /// The `r` scalar.
    #[must_use]
    pub const fn r(&self) -> U256 {
        self.r
    }

    /// The `s` scalar.
    #[must_use]
    pub const fn s(&self) -> U256 {
        self.s
    }

    /// The recovery parity bit.
    #[must_use]
    pub const fn y_parity(&self) -> bool {
        self.y_parity
    }

    /// The `27`/`28` byte this signature was parsed from, if any.
    #[must_use]
    pub const fn v(&self) -> Option<u64> {
        self.v
    }

    /// Drop the recorded `v`, keeping only `(r, s, yParity)`.
    #[must_use]
    pub const fn without_v(self) -> Self {
        Self::new(self.r, self.s, self.y_parity)
    }

    /// `r` as a 32-byte big-endian word.
    #[must_use]
    pub fn r_bytes(&self) -> B256 {
        B256::from(self.r.to_be_bytes::<32>())
    }

    /// `s` as a 32-byte big-endian word.
    #[must_use]
    pub fn s_bytes(&self) -> B256 {
        B256::from(self.s.to_be_bytes::<32>())
    }

    /// The legacy transaction `v` for this signature.
    ///
    /// `27 + yParity` without a chain id, `chainId * 2 + 35 + yParity` with one.
    #[must_use]
    pub fn legacy_v(&self, chain_id: Option<u64>) -> u128 {
        let parity = u128::from(self.y_parity);
        match chain_id {
            Some(id) => u128::from(id) * 2 + u128::from(EIP155_V_OFFSET) + parity,
            None => u128::from(LEGACY_V_OFFSET) + parity,
        }
    }

    /// Serialize as 65 raw bytes. The trailing byte is always `27` or `28`.
    #[must_use]
    pub fn to_raw(&self) -> [u8; RAW_SIGNATURE_LEN] {
        let mut out = [0u8; RAW_SIGNATURE_LEN];
        out[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        out[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        out[64] = if self.y_parity { 28 } else { 27 };
        out
    }

    /// Serialize as `0x`-prefixed raw hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        encode_hex(self.to_raw())
    }

    /// Convert to the EIP-2098 compact form.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidScalar`] if the top bit of `s` is set,
    /// since that bit carries the parity in the compact form.
    pub fn to_compact(&self) -> SignatureResult<CompactSignature> {
        CompactSignature::from_signature(self)
    }
}

/// Split a legacy transaction `v` into `(yParity, chainId)`.
///
/// Returns `None` for values outside `{27, 28} ∪ [35, ∞)` and for EIP-155
/// values whose chain id does not fit in a `u64`.
///
/// ```
/// use scribe_crypto::signature::parity_from_legacy_v;
///
/// assert_eq!(parity_from_legacy_v(27), Some((false, None)));
/// assert_eq!(parity_from_legacy_v(38), Some((true, Some(1))));
/// assert_eq!(parity_from_legacy_v(30), None);
/// ```
#[must_use]
pub fn parity_from_legacy_v(v: u128) -> Option<(bool, Option<u64>)> {
    match v {
        27 | 28 => Some((v == 28, None)),
        v if v >= u128::from(EIP155_V_OFFSET) => {
            let offset = v - u128::from(EIP155_V_OFFSET);
            let chain_id = u64::try_from(offset / 2).ok()?;
            Some((offset % 2 == 1, Some(chain_id)))
        }
        _ => None,
    }
}

impl FromStr for Signature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
