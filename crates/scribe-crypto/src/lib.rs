//! # scribe-crypto
//!
//! Signature codec for Ethereum.
//!
//! ## Modules
//!
//! - [`signature`] - Canonical `(r, s, yParity)` signature and the 65-byte raw format
//! - [`compact`] - EIP-2098 64-byte compact signatures
//! - [`erc6492`] - ERC-6492 counterfactual signature wrapper
//! - [`recovery`] - EIP-191 message hashing, address recovery and verification
//! - [`keypair`] - secp256k1 key pair producing low-`s` signatures
//!
//! ## Example
//!
//! ```rust
//! use scribe_crypto::{hash_message, verify_message, Secp256k1KeyPair};
//!
//! let keypair = Secp256k1KeyPair::from_bytes([0x11; 32]).unwrap();
//! let signature = keypair.sign_hash(&hash_message("gm")).unwrap();
//!
//! assert!(verify_message(&keypair.address(), "gm", &signature.to_raw()).unwrap());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod compact;
pub mod erc6492;
pub mod keypair;
pub mod recovery;
pub mod signature;

pub use compact::CompactSignature;
pub use erc6492::{is_erc6492_signature, Erc6492Signature, ERC6492_MAGIC};
pub use keypair::Secp256k1KeyPair;
pub use recovery::{
    hash_message, public_key_to_address, recover_address, recover_message_address,
    recover_public_key, verify_hash, verify_message,
};
pub use signature::{parity_from_legacy_v, Signature};
