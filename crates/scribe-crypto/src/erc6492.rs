//! ERC-6492 counterfactual signature wrapper.
//!
//! A wrapped signature is `abi.encode(address factory, bytes factoryCalldata,
//! bytes signature) ‖ MAGIC`. Detection is purely structural: the trailing 32
//! bytes equal [`ERC6492_MAGIC`]. Anything else passes through as a plain
//! signature.
//!
//! # Example
//!
//! ```
//! use alloy_primitives::{Address, Bytes};
//! use scribe_crypto::erc6492::{is_erc6492_signature, Erc6492Signature};
//!
//! let wrapped = Erc6492Signature::wrap(
//!     Address::repeat_byte(0x42),
//!     Bytes::from_static(b"deploy"),
//!     Bytes::from_static(&[0xab; 65]),
//! );
//! let bytes = wrapped.serialize();
//! assert!(is_erc6492_signature(&bytes));
//! assert_eq!(Erc6492Signature::parse(&bytes).unwrap(), wrapped);
//!
//! let plain = Erc6492Signature::parse(&[0xab; 65]).unwrap();
//! assert!(!plain.is_wrapped());
//! ```

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use scribe_core::abi::{decode_address_bytes_bytes, encode_address_bytes_bytes};
use scribe_core::error::{SignatureError, SignatureResult};

/// The 32-byte ERC-6492 suffix: `0x6492` repeated sixteen times.
pub const ERC6492_MAGIC: [u8; 32] = [
    0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92,
    0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92,
];

/// Whether `bytes` ends with [`ERC6492_MAGIC`].
#[must_use]
pub fn is_erc6492_signature(bytes: &[u8]) -> bool {
    bytes.len() >= ERC6492_MAGIC.len() && bytes.ends_with(&ERC6492_MAGIC)
}

/// A possibly-wrapped signature.
///
/// `address` and `data` are `None` for a plain signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc6492Signature {
    /// Factory that deploys the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Calldata for the factory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// The inner signature.
    pub signature: Bytes,
}

impl Erc6492Signature {
    /// A wrapped signature.
    #[must_use]
    pub const fn wrap(address: Address, data: Bytes, signature: Bytes) -> Self {
        Self {
            address: Some(address),
            data: Some(data),
            signature,
        }
    }

    /// A plain, unwrapped signature.
    #[must_use]
    pub const fn plain(signature: Bytes) -> Self {
        Self {
            address: None,
            data: None,
            signature,
        }
    }

    /// Whether this carries a factory address.
    #[must_use]
    pub const fn is_wrapped(&self) -> bool {
        self.address.is_some()
    }

    /// Parse `bytes`, unwrapping if it carries the magic suffix.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidErc6492`] if the magic suffix is present
    /// but the prefix is not a valid `(address, bytes, bytes)` encoding.
    pub fn parse(bytes: &[u8]) -> SignatureResult<Self> {
        if !is_erc6492_signature(bytes) {
            return Ok(Self::plain(Bytes::copy_from_slice(bytes)));
        }

        let payload = &bytes[..bytes.len() - ERC6492_MAGIC.len()];
        let (address, data, signature) = decode_address_bytes_bytes(payload).ok_or_else(|| {
            SignatureError::invalid_erc6492(format!(
                "{} byte payload is not abi-encoded (address, bytes, bytes)",
                payload.len()
            ))
        })?;

        Ok(Self::wrap(address, data, signature))
    }

    /// Serialize. Plain signatures are returned unchanged.
    #[must_use]
    pub fn serialize(&self) -> Bytes {
        let Some(address) = self.address else {
            return self.signature.clone();
        };

        let data = self.data.as_ref().map(|d| &d[..]).unwrap_or_default();
        let mut out = encode_address_bytes_bytes(&address, data, &self.signature);
        out.extend_from_slice(&ERC6492_MAGIC);
        out.into()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_magic_constant() {
        assert_eq!(
            alloy_primitives::hex::encode(ERC6492_MAGIC),
            "6492".repeat(16)
        );
    }

    #[test]
    fn test_parse_plain_passthrough() {
        let raw = [0x11u8; 65];
        let parsed = Erc6492Signature::parse(&raw).unwrap();
        assert_eq!(parsed, Erc6492Signature::plain(Bytes::copy_from_slice(&raw)));
        assert_eq!(parsed.serialize().as_ref(), &raw);
    }

    #[test]
    fn test_parse_short_input_passthrough() {
        let parsed = Erc6492Signature::parse(&[0x64, 0x92]).unwrap();
        assert!(!parsed.is_wrapped());
    }

    #[test]
    fn test_wrap_roundtrip() {
        let wrapped = Erc6492Signature::wrap(
            Address::repeat_byte(0xcd),
            Bytes::from(vec![0x01; 100]),
            Bytes::from(vec![0x02; 65]),
        );
        let bytes = wrapped.serialize();

        assert!(bytes.ends_with(&ERC6492_MAGIC));
        assert_eq!(Erc6492Signature::parse(&bytes).unwrap(), wrapped);
    }

    #[test]
    fn test_wrap_without_data() {
        let wrapped = Erc6492Signature {
            address: Some(Address::ZERO),
            data: None,
            signature: Bytes::from_static(&[0x05]),
        };
        let parsed = Erc6492Signature::parse(&wrapped.serialize()).unwrap();
        assert_eq!(parsed.data, Some(Bytes::new()));
        assert_eq!(parsed.signature, wrapped.signature);
    }

    #[test]
    fn test_magic_with_garbage_prefix_is_error() {
        let mut bytes = vec![0xffu8; 40];
        bytes.extend_from_slice(&ERC6492_MAGIC);
        assert!(matches!(
            Erc6492Signature::parse(&bytes),
            Err(SignatureError::InvalidErc6492 { .. })
        ));
    }
}
