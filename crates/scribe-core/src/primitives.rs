//! Hex and number parsing helpers.
//!
//! These are the leaf conversions every other layer builds on. Hex strings may
//! be given with or without the `0x` prefix; output is always prefixed.
//!
//! # Example
//!
//! ```
//! use scribe_core::primitives::{decode_hex, encode_hex, parse_u256};
//!
//! let bytes = decode_hex("00012a").unwrap();
//! assert_eq!(encode_hex(&bytes), "0x00012a");
//! assert_eq!(parse_u256("0x12a").unwrap(), parse_u256("298").unwrap());
//! ```

use std::str::FromStr;

use alloy_primitives::{hex, Address, B256, U256};

use crate::error::{PrimitiveError, PrimitiveResult};

/// Decode a hex string into bytes.
///
/// # Errors
///
/// Returns [`PrimitiveError::InvalidHex`] for odd-length input or non-hex characters.
pub fn decode_hex(input: &str) -> PrimitiveResult<Vec<u8>> {
    let trimmed = input.trim();
    hex::decode(trimmed).map_err(|e| PrimitiveError::invalid_hex(format!("{trimmed:?}: {e}")))
}

/// Encode bytes as a `0x`-prefixed lowercase hex string.
#[must_use]
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode_prefixed(bytes)
}

/// Parse a `0x`-prefixed 20-byte hex address. Checksum casing is not enforced.
///
/// # Errors
///
/// Returns [`PrimitiveError::InvalidAddressFormat`] if the string is not an address.
pub fn parse_address(input: &str) -> PrimitiveResult<Address> {
    let trimmed = input.trim();
    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(PrimitiveError::invalid_address(trimmed));
    }
    Address::from_str(trimmed).map_err(|_| PrimitiveError::invalid_address(trimmed))
}

/// Parse a 32-byte hex word.
///
/// # Errors
///
/// Returns [`PrimitiveError::InvalidHex`] or [`PrimitiveError::InvalidLength`].
pub fn parse_b256(input: &str) -> PrimitiveResult<B256> {
    let bytes = decode_hex(input)?;
    if bytes.len() != 32 {
        return Err(PrimitiveError::invalid_length("32-byte word", 32, bytes.len()));
    }
    Ok(B256::from_slice(&bytes))
}

/// Parse an unsigned integer from a decimal or `0x`-prefixed hex string.
///
/// # Errors
///
/// Returns [`PrimitiveError::Overflow`] if the value does not fit in 256 bits
/// or the string is not a number.
pub fn parse_u256(input: &str) -> PrimitiveResult<U256> {
    let trimmed = input.trim();
    U256::from_str(trimmed).map_err(|e| PrimitiveError::overflow(format!("{trimmed:?}: {e}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_decode_hex_with_and_without_prefix() {
        assert_eq!(decode_hex("0xdeadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode_hex("deadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode_hex("0x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_hex_rejects_odd_length() {
        assert!(matches!(
            decode_hex("0xabc"),
            Err(PrimitiveError::InvalidHex { .. })
        ));
    }

    #[test]
    fn test_decode_hex_rejects_non_hex() {
        assert!(decode_hex("0xzz").is_err());
    }

    #[test]
    fn test_parse_address_accepts_mixed_case() {
        let addr = parse_address("0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC").unwrap();
        assert_eq!(addr, Address::repeat_byte(0xcc));
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        assert!(matches!(
            parse_address("0x1234"),
            Err(PrimitiveError::InvalidAddressFormat { .. })
        ));
        assert!(parse_address("cccccccccccccccccccccccccccccccccccccccc").is_err());
        assert!(parse_address("0xgggggggggggggggggggggggggggggggggggggggg").is_err());
    }

    #[test]
    fn test_parse_u256_decimal_and_hex() {
        assert_eq!(parse_u256("1000").unwrap(), U256::from(1000u64));
        assert_eq!(parse_u256("0x3e8").unwrap(), U256::from(1000u64));
        assert!(parse_u256("-1").is_err());
    }

    #[test]
    fn test_parse_b256_requires_32_bytes() {
        assert!(parse_b256(&format!("0x{}", "11".repeat(32))).is_ok());
        assert!(parse_b256("0x11").is_err());
    }
}
