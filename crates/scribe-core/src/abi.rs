//! Basic Solidity ABI word encoding.
//!
//! Only what the signature and typed-data layers need is provided:
//!
//! - 32-byte head words for static leaf types (`address`, `bool`, `uintN`,
//!   `intN`, `bytesN`)
//! - the `(address, bytes, bytes)` tuple used by ERC-6492 wrappers
//!
//! Full ABI parsing of arbitrary function calls is out of scope.
//!
//! # Word Layout
//!
//! - Addresses occupy bytes 12-32 of their word (left-padded with zeros)
//! - Unsigned integers are big-endian, left-padded with zeros
//! - Signed integers are two's complement, left-padded with the sign
//! - `bytesN` values are left-aligned and right-padded with zeros
//!
//! # Example
//!
//! ```rust
//! use scribe_core::abi::{decode_address_bytes_bytes, encode_address_bytes_bytes};
//! use alloy_primitives::Address;
//!
//! let encoded = encode_address_bytes_bytes(&Address::repeat_byte(0x11), b"init", b"sig");
//! let (address, data, signature) = decode_address_bytes_bytes(&encoded).unwrap();
//! assert_eq!(address, Address::repeat_byte(0x11));
//! assert_eq!(data.as_ref(), b"init");
//! assert_eq!(signature.as_ref(), b"sig");
//! ```

use alloy_primitives::{Address, Bytes, I256, U256};

/// Size of one ABI word.
pub const WORD_SIZE: usize = 32;

/// Head size of the `(address, bytes, bytes)` tuple: three words.
const TUPLE_HEAD_SIZE: usize = 3 * WORD_SIZE;

/// Encode an address as a left-padded word.
#[must_use]
pub fn encode_address(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}

/// Encode an unsigned integer as a big-endian word.
#[must_use]
pub fn encode_uint(value: U256) -> [u8; 32] {
    value.to_be_bytes::<32>()
}

/// Encode a signed integer as a two's complement word.
#[must_use]
pub fn encode_int(value: I256) -> [u8; 32] {
    value.to_be_bytes::<32>()
}

/// Encode a boolean as `0` or `1`.
#[must_use]
pub fn encode_bool(value: bool) -> [u8; 32] {
    encode_uint(U256::from(u8::from(value)))
}

/// Encode a `bytesN` value, left-aligned. Returns `None` if longer than 32 bytes.
#[must_use]
pub fn encode_fixed_bytes(value: &[u8]) -> Option<[u8; 32]> {
    if value.len() > WORD_SIZE {
        return None;
    }
    let mut word = [0u8; 32];
    word[..value.len()].copy_from_slice(value);
    Some(word)
}

/// Number of bytes `len` occupies once padded to a word boundary.
const fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD_SIZE) * WORD_SIZE
}

fn push_dynamic(out: &mut Vec<u8>, value: &[u8]) {
    out.extend_from_slice(&encode_uint(U256::from(value.len())));
    out.extend_from_slice(value);
    out.resize(out.len() + padded_len(value.len()) - value.len(), 0);
}

/// ABI-encode the tuple `(address, bytes, bytes)`.
#[must_use]
pub fn encode_address_bytes_bytes(address: &Address, first: &[u8], second: &[u8]) -> Vec<u8> {
    let first_offset = TUPLE_HEAD_SIZE;
    let second_offset = first_offset + WORD_SIZE + padded_len(first.len());

    let mut out = Vec::with_capacity(second_offset + WORD_SIZE + padded_len(second.len()));
    out.extend_from_slice(&encode_address(address));
    out.extend_from_slice(&encode_uint(U256::from(first_offset)));
    out.extend_from_slice(&encode_uint(U256::from(second_offset)));
    push_dynamic(&mut out, first);
    push_dynamic(&mut out, second);
    out
}

/// Extract the word starting at `offset`.
#[must_use]
pub fn extract_word(data: &[u8], offset: usize) -> Option<[u8; 32]> {
    let end = offset.checked_add(WORD_SIZE)?;
    data.get(offset..end)?.try_into().ok()
}

/// Extract an address word at `offset`. The 12 padding bytes must be zero.
#[must_use]
pub fn extract_address(data: &[u8], offset: usize) -> Option<Address> {
    let word = extract_word(data, offset)?;
    if word[..12].iter().any(|&b| b != 0) {
        return None;
    }
    Some(Address::from_slice(&word[12..]))
}

/// Extract a word at `offset` as a `usize` (offsets and lengths).
#[must_use]
pub fn extract_usize(data: &[u8], offset: usize) -> Option<usize> {
    let word = extract_word(data, offset)?;
    usize::try_from(U256::from_be_bytes(word)).ok()
}

fn extract_dynamic(data: &[u8], head_offset: usize) -> Option<Bytes> {
    let start = extract_usize(data, head_offset)?;
    let len = extract_usize(data, start)?;
    let body = start.checked_add(WORD_SIZE)?;
    let end = body.checked_add(len)?;
    data.get(body..end).map(Bytes::copy_from_slice)
}

/// Decode the tuple `(address, bytes, bytes)`.
///
/// Returns `None` if any offset or length points outside `data`.
#[must_use]
pub fn decode_address_bytes_bytes(data: &[u8]) -> Option<(Address, Bytes, Bytes)> {
    let address = extract_address(data, 0)?;
    let first = extract_dynamic(data, WORD_SIZE)?;
    let second = extract_dynamic(data, 2 * WORD_SIZE)?;
    Some((address, first, second))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

    use super::*;
    use alloy_primitives::hex;

    #[test]
    fn test_encode_address_is_left_padded() {
        let word = encode_address(&Address::repeat_byte(0xab));
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], &[0xab; 20]);
    }

    #[test]
    fn test_encode_bool() {
        assert_eq!(encode_bool(false), [0u8; 32]);
        assert_eq!(encode_bool(true)[31], 1);
    }

    #[test]
    fn test_encode_negative_int_is_sign_extended() {
        let word = encode_int(I256::MINUS_ONE);
        assert_eq!(word, [0xff; 32]);
    }

    #[test]
    fn test_encode_fixed_bytes_left_aligned() {
        let word = encode_fixed_bytes(&[0x12, 0x34]).unwrap();
        assert_eq!(&word[..2], &[0x12, 0x34]);
        assert_eq!(&word[2..], &[0u8; 30]);
        assert!(encode_fixed_bytes(&[0u8; 33]).is_none());
    }

    #[test]
    fn test_encode_tuple_layout() {
        let encoded = encode_address_bytes_bytes(&Address::ZERO, &[0xaa], &[]);
        // head (3 words) + len + 1 padded word + len
        assert_eq!(encoded.len(), 6 * WORD_SIZE);
        assert_eq!(extract_usize(&encoded, 32), Some(0x60));
        assert_eq!(extract_usize(&encoded, 64), Some(0xa0));
        assert_eq!(extract_usize(&encoded, 0x60), Some(1));
        assert_eq!(encoded[0x80], 0xaa);
        assert_eq!(extract_usize(&encoded, 0xa0), Some(0));
    }

    #[test]
    fn test_decode_tuple_matches_solidity_encoding() {
        // abi.encode(address(0x1111..), hex"deadbeef", hex"01")
        let encoded = hex::decode(concat!(
            "0000000000000000000000001111111111111111111111111111111111111111",
            "0000000000000000000000000000000000000000000000000000000000000060",
            "00000000000000000000000000000000000000000000000000000000000000a0",
            "0000000000000000000000000000000000000000000000000000000000000004",
            "deadbeef00000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0100000000000000000000000000000000000000000000000000000000000000",
        ))
        .unwrap();

        let (address, first, second) = decode_address_bytes_bytes(&encoded).unwrap();
        assert_eq!(address, Address::repeat_byte(0x11));
        assert_eq!(first.as_ref(), &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(second.as_ref(), &[0x01]);
        assert_eq!(
            encode_address_bytes_bytes(&address, &first, &second),
            encoded
        );
    }

    #[test]
    fn test_decode_tuple_rejects_out_of_bounds_offsets() {
        let mut encoded = encode_address_bytes_bytes(&Address::ZERO, b"a", b"b");
        encoded[63] = 0xff;
        assert!(decode_address_bytes_bytes(&encoded).is_none());
        assert!(decode_address_bytes_bytes(&[0u8; 10]).is_none());
    }

    #[test]
    fn test_extract_address_rejects_dirty_padding() {
        let mut word = encode_address(&Address::repeat_byte(0x01)).to_vec();
        word[0] = 1;
        assert!(extract_address(&word, 0).is_none());
    }
}
