//! # Test Utilities for `scribe-chain`
//!
//! Known vectors and proptest strategies shared by the integration tests.
//!
//! ## Proptest Strategies
//!
//! - [`address`] - Arbitrary 20-byte addresses
//! - [`optional_address`] - A recipient or contract creation
//! - [`wei_amount`] - Values biased towards small and boundary amounts
//! - [`calldata`] - Short byte strings
//! - [`access_list`] - Small access lists
//! - [`authorization_list`] - Small EIP-7702 authorization lists
//! - [`blob_sidecars`] - One or two full-size blob sidecars

#![allow(dead_code)]
#![allow(clippy::expect_used)]

use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256};
use proptest::prelude::*;

use scribe_chain::transaction::BLOB_SIZE;
use scribe_chain::{AccessList, AccessListItem, Authorization, BlobSidecar, SignedAuthorization};
use scribe_core::primitives::decode_hex;
use scribe_crypto::Signature;

/// Signed transfer worked through in EIP-155.
pub const EIP155_SIGNED_TX: &str = "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";

/// Signing payload of [`EIP155_SIGNED_TX`].
pub const EIP155_SIGNING_PAYLOAD: &str = "0xec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080";

/// Sender of [`EIP155_SIGNED_TX`].
pub const EIP155_SIGNER: &str = "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F";

/// Decode a hex fixture.
pub fn hex(input: &str) -> Vec<u8> {
    decode_hex(input).expect("fixture is valid hex")
}

/// A signature alloy will accept for encoding.
pub fn fake_alloy_signature(y_parity: bool) -> alloy_primitives::Signature {
    alloy_primitives::Signature::new(
        U256::from(0xffff_ffff_ffff_ffffu64),
        U256::from(0xffff_ffff_ffff_fffeu64),
        y_parity,
    )
}

// ============================================================================
// Proptest strategies
// ============================================================================

/// Arbitrary address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from)
}

/// A call recipient or `None` for contract creation.
pub fn optional_address() -> impl Strategy<Value = Option<Address>> {
    prop_oneof![Just(None), address().prop_map(Some)]
}

/// Wei amounts, including zero and the maximum.
pub fn wei_amount() -> impl Strategy<Value = U256> {
    prop_oneof![
        Just(U256::ZERO),
        Just(U256::MAX),
        any::<u64>().prop_map(U256::from),
        any::<[u8; 32]>().prop_map(U256::from_be_bytes),
    ]
}

/// Short calldata.
pub fn calldata() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..96).prop_map(Bytes::from)
}

/// Small access lists.
pub fn access_list() -> impl Strategy<Value = AccessList> {
    let item = (
        address(),
        prop::collection::vec(any::<[u8; 32]>().prop_map(B256::from), 0..3),
    )
        .prop_map(|(address, storage_keys)| AccessListItem {
            address,
            storage_keys,
        });
    prop::collection::vec(item, 0..3).prop_map(AccessList)
}

/// Signature scalars are not checked by the codec, so any values do.
fn scalar_signature() -> impl Strategy<Value = Signature> {
    (any::<[u8; 32]>(), any::<[u8; 32]>(), any::<bool>()).prop_map(|(r, s, y_parity)| {
        Signature::new(U256::from_be_bytes(r), U256::from_be_bytes(s), y_parity)
    })
}

/// Small EIP-7702 authorization lists.
pub fn authorization_list() -> impl Strategy<Value = Vec<SignedAuthorization>> {
    let entry = (wei_amount(), address(), any::<u64>(), scalar_signature()).prop_map(
        |(chain_id, address, nonce, signature)| {
            Authorization {
                chain_id,
                address,
                nonce,
            }
            .into_signed(signature)
        },
    );
    prop::collection::vec(entry, 0..3)
}

fn kzg_element() -> impl Strategy<Value = FixedBytes<48>> {
    prop::collection::vec(any::<u8>(), 48).prop_map(|bytes| FixedBytes::from_slice(&bytes))
}

/// One or two sidecars. Blobs are a repeated byte to keep cases cheap.
pub fn blob_sidecars() -> impl Strategy<Value = Vec<BlobSidecar>> {
    let sidecar = (any::<u8>(), kzg_element(), kzg_element()).prop_map(
        |(fill, commitment, proof)| BlobSidecar {
            blob: Bytes::from(vec![fill; BLOB_SIZE]),
            commitment,
            proof,
        },
    );
    prop::collection::vec(sidecar, 1..3)
}
