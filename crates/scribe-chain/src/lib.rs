//! # scribe-chain
//!
//! Ethereum transaction envelopes and EIP-712 typed data.
//!
//! ## Modules
//!
//! - [`transaction`] - Legacy, EIP-2930, EIP-1559, EIP-4844 and EIP-7702
//!   envelopes: decode, encode, hashing, signer recovery and request checks
//! - [`typed_data`] - EIP-712 domain separators, struct hashing and
//!   signature verification
//!
//! ## Decoding
//!
//! ```rust
//! use scribe_chain::{Transaction, TxType};
//! use scribe_core::primitives::decode_hex;
//!
//! let raw = decode_hex(
//!     "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83",
//! ).unwrap();
//!
//! let tx = Transaction::decode(&raw).unwrap();
//! assert_eq!(tx.tx_type(), TxType::Legacy);
//! assert_eq!(tx.chain_id(), Some(1));
//! assert_eq!(tx.encode(), raw);
//! ```
//!
//! Decoding never panics on untrusted input. Every failure is a
//! [`TransactionError`](scribe_core::TransactionError).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod transaction;
pub mod typed_data;

pub use transaction::{
    assert_request, AccessList, AccessListItem, Authorization, BlobSidecar, Kzg,
    SignedAuthorization, Transaction, TransactionRequest, TxEip1559, TxEip2930, TxEip4844,
    TxEip7702, TxLegacy, TxType,
};

pub use typed_data::{
    hash_typed_data, verify_typed_data, TypedData, TypedDataDomain, TypedDataField,
};
