//! secp256k1 key pair for producing Ethereum signatures.
//!
//! Key storage and generation are left to the caller; a key pair is built
//! from 32 raw secret bytes and only ever signs 32-byte prehashes.
//!
//! # Example
//!
//! ```rust
//! use scribe_crypto::keypair::Secp256k1KeyPair;
//! use scribe_crypto::recovery::{hash_message, recover_address};
//!
//! let keypair = Secp256k1KeyPair::from_bytes([0x42; 32]).expect("valid secret key");
//! let hash = hash_message("hello");
//! let signature = keypair.sign_hash(&hash).expect("signing succeeded");
//!
//! assert_eq!(recover_address(&hash, &signature).unwrap(), keypair.address());
//! ```

use alloy_primitives::{Address, B256, U256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};

use scribe_core::error::{SignatureError, SignatureResult};

use crate::recovery::public_key_to_address;
use crate::signature::Signature;

/// A secp256k1 signing key with its cached public key and address.
#[allow(clippy::struct_field_names)]
pub struct Secp256k1KeyPair {
    /// The signing key (private key)
    signing_key: SigningKey,
    /// Cached verifying key (public key)
    verifying_key: VerifyingKey,
    /// Cached Ethereum address
    address: Address,
}

impl Secp256k1KeyPair {
    /// Create a key pair from 32 secret bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidScalar`] if the bytes are zero or not
    /// below the curve order.
    pub fn from_bytes(bytes: [u8; 32]) -> SignatureResult<Self> {
        let signing_key = SigningKey::from_bytes((&bytes).into())
            .map_err(|_| SignatureError::invalid_scalar("secret key is not a valid scalar"))?;

        let verifying_key = *signing_key.verifying_key();
        let address = public_key_to_address(&verifying_key);

        Ok(Self {
            signing_key,
            verifying_key,
            address,
        })
    }

    /// The Ethereum address of this key.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The uncompressed SEC1 public key (65 bytes, `0x04` prefix).
    #[must_use]
    pub fn public_key_uncompressed(&self) -> [u8; 65] {
        let point = self.verifying_key.to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Sign a 32-byte prehash. The result always has a low `s`.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::RecoveryFailed`] if the curve backend refuses to sign.
    pub fn sign_hash(&self, hash: &B256) -> SignatureResult<Signature> {
        let (signature, recovery_id): (K256Signature, RecoveryId) = self
            .signing_key
            .sign_prehash_recoverable(hash.as_slice())
            .map_err(|e| SignatureError::recovery_failed(format!("signing failed: {e}")))?;

        // Flip the recovery id if s had to be normalized
        let normalized = signature.normalize_s();
        let y_parity = recovery_id.is_y_odd() ^ normalized.is_some();
        let signature = normalized.unwrap_or(signature);

        let (r, s) = signature.split_bytes();
        Ok(Signature::new(
            U256::from_be_slice(&r),
            U256::from_be_slice(&s),
            y_parity,
        ))
    }
}

// Keep the secret out of debug output
impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
