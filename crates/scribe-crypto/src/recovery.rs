//! Address recovery and signature verification.
//!
//! Recovery follows `ecrecover` semantics: a high-`s` signature is normalized
//! to its low-`s` twin (flipping the parity) before recovering, so both forms
//! yield the same address.
//!
//! Verification only covers externally-owned accounts. An ERC-6492 wrapper is
//! unwrapped and its inner ECDSA signature checked; no contract is consulted.

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};
use sha3::{Digest, Keccak256};
use tracing::{debug, trace};

use scribe_core::error::{SignatureError, SignatureResult};

use crate::erc6492::Erc6492Signature;
use crate::signature::Signature;

/// Prefix for EIP-191 personal messages.
pub const MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Hash a message the way `personal_sign` does (EIP-191 version `0x45`).
///
/// `keccak256("\x19Ethereum Signed Message:\n" ‖ len(message) ‖ message)`
#[must_use]
pub fn hash_message(message: impl AsRef<[u8]>) -> B256 {
    let message = message.as_ref();
    let mut hasher = Keccak256::new();
    hasher.update(MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    B256::from_slice(&hasher.finalize())
}

/// Derive the Ethereum address of a public key.
///
/// The address is the last 20 bytes of the Keccak-256 hash of the
/// uncompressed public key without its `0x04` prefix.
#[must_use]
pub fn public_key_to_address(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Recover the public key that produced `signature` over `hash`.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidScalar`] if `r` or `s` is zero or not
/// below the curve order, and [`SignatureError::RecoveryFailed`] if no key
/// matches.
pub fn recover_public_key(hash: &B256, signature: &Signature) -> SignatureResult<VerifyingKey> {
    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(signature.r_bytes().as_slice());
    bytes[32..].copy_from_slice(signature.s_bytes().as_slice());

    let sig = K256Signature::from_slice(&bytes)
        .map_err(|e| SignatureError::invalid_scalar(format!("r or s out of range: {e}")))?;

    let mut y_parity = signature.y_parity();
    let sig = match sig.normalize_s() {
        Some(normalized) => {
            y_parity = !y_parity;
            normalized
        }
        None => sig,
    };

    let recovery_id = RecoveryId::new(y_parity, false);
    VerifyingKey::recover_from_prehash(hash.as_slice(), &sig, recovery_id)
        .map_err(|e| SignatureError::recovery_failed(e.to_string()))
}

/// Recover the signer address of `signature` over `hash`.
///
/// # Errors
///
/// See [`recover_public_key`].
pub fn recover_address(hash: &B256, signature: &Signature) -> SignatureResult<Address> {
    let key = recover_public_key(hash, signature)?;
    let address = public_key_to_address(&key);
    trace!(%hash, %address, "recovered signer");
    Ok(address)
}

/// Recover the signer of a personal message.
///
/// # Errors
///
/// See [`recover_public_key`].
pub fn recover_message_address(
    message: impl AsRef<[u8]>,
    signature: &Signature,
) -> SignatureResult<Address> {
    recover_address(&hash_message(message), signature)
}

/// Check that `signature` over `hash` was produced by `address`.
///
/// `signature` may be raw (65 bytes), compact (64 bytes) or ERC-6492 wrapped
/// around either. A well-formed signature from a different signer returns
/// `Ok(false)`.
///
/// # Errors
///
/// Returns an error only when the signature bytes are malformed or recovery
/// is impossible.
pub fn verify_hash(address: &Address, hash: &B256, signature: &[u8]) -> SignatureResult<bool> {
    let unwrapped = Erc6492Signature::parse(signature)?;
    if unwrapped.is_wrapped() {
        debug!("verifying inner signature of ERC-6492 wrapper");
    }

    let signature = Signature::from_slice(&unwrapped.signature)?;
    let recovered = recover_address(hash, &signature)?;
    let valid = recovered == *address;

    debug!(expected = %address, %recovered, valid, "verified hash signature");
    Ok(valid)
}

/// Check that `signature` over the EIP-191 hash of `message` was produced by `address`.
///
/// # Errors
///
/// See [`verify_hash`].
pub fn verify_message(
    address: &Address,
    message: impl AsRef<[u8]>,
    signature: &[u8],
) -> SignatureResult<bool> {
    verify_hash(address, &hash_message(message), signature)
}
