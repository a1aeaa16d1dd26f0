//! EIP-2098 compact signatures.
//!
//! A compact signature packs the parity bit into the otherwise unused top bit
//! of `s`, giving a 64-byte `r ‖ yParityAndS` encoding. This is lossless for
//! canonical signatures, whose `s` is always below `n / 2`.

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

use scribe_core::error::{SignatureError, SignatureResult};

use crate::signature::{Signature, COMPACT_SIGNATURE_LEN};

/// Mask for the parity bit in the first byte of `yParityAndS`.
const PARITY_BIT: u8 = 0x80;

/// An EIP-2098 compact signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactSignature {
    /// The `r` scalar.
    pub r: B256,
    /// `s` with the parity stored in its top bit.
    pub y_parity_and_s: B256,
}

impl CompactSignature {
    /// Parse 64 compact bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidSignatureLength`] unless exactly 64 bytes are given.
    pub fn from_bytes(bytes: &[u8]) -> SignatureResult<Self> {
        if bytes.len() != COMPACT_SIGNATURE_LEN {
            return Err(SignatureError::invalid_length(
                COMPACT_SIGNATURE_LEN,
                bytes.len(),
            ));
        }
        Ok(Self {
            r: B256::from_slice(&bytes[..32]),
            y_parity_and_s: B256::from_slice(&bytes[32..]),
        })
    }

    /// Pack a [`Signature`].
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidScalar`] if the top bit of `s` is set.
    pub fn from_signature(signature: &Signature) -> SignatureResult<Self> {
        let mut y_parity_and_s = signature.s_bytes();
        if y_parity_and_s[0] & PARITY_BIT != 0 {
            return Err(SignatureError::invalid_scalar(
                "s has its top bit set and cannot be packed into a compact signature",
            ));
        }
        if signature.y_parity() {
            y_parity_and_s[0] |= PARITY_BIT;
        }
        Ok(Self {
            r: signature.r_bytes(),
            y_parity_and_s,
        })
    }

    /// The 64-byte encoding.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; COMPACT_SIGNATURE_LEN] {
        let mut out = [0u8; COMPACT_SIGNATURE_LEN];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..].copy_from_slice(self.y_parity_and_s.as_slice());
        out
    }

    /// The parity bit.
    #[must_use]
    pub fn y_parity(&self) -> bool {
        self.y_parity_and_s[0] & PARITY_BIT != 0
    }

    /// Unpack into a [`Signature`] (without a recorded `v`).
    #[must_use]
    pub fn to_signature(&self) -> Signature {
        let mut s = self.y_parity_and_s;
        s[0] &= !PARITY_BIT;
        Signature::new(
            U256::from_be_bytes(self.r.0),
            U256::from_be_bytes(s.0),
            self.y_parity(),
        )
    }
}

impl From<CompactSignature> for Signature {
    fn from(compact: CompactSignature) -> Self {
        compact.to_signature()
    }
}
