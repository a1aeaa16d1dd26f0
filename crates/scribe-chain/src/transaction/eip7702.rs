//! EIP-7702 set-code transactions (type `0x04`).
//!
//! `0x04 ‖ rlp([chainId, nonce, maxPriorityFeePerGas, maxFeePerGas, gas, to, value, data,
//! accessList, authorizationList, yParity?, r?, s?])`

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use scribe_core::error::TransactionResult;
use scribe_core::rlp::{RlpFields, RlpList};
use scribe_crypto::Signature;

use super::access_list::AccessList;
use super::authorization::SignedAuthorization;
use super::typed::TypedEnvelope;
use super::TxType;

/// An EIP-7702 transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxEip7702 {
    /// Chain id.
    pub chain_id: u64,
    /// Sender nonce.
    pub nonce: u64,
    /// Tip per gas paid to the block producer.
    pub max_priority_fee_per_gas: u128,
    /// Total fee cap per gas.
    pub max_fee_per_gas: u128,
    /// Gas limit.
    pub gas: u64,
    /// Recipient. Set-code transactions cannot create contracts.
    pub to: Address,
    /// Value in wei.
    pub value: U256,
    /// Calldata.
    pub data: Bytes,
    /// Pre-declared accounts and storage slots.
    #[serde(default)]
    pub access_list: AccessList,
    /// Signed delegations.
    pub authorization_list: Vec<SignedAuthorization>,
    /// Signature. Only `r`, `s` and `yParity` are encoded.
    #[serde(flatten)]
    pub signature: Option<Signature>,
}

impl TypedEnvelope for TxEip7702 {
    const TX_TYPE: TxType = TxType::Eip7702;
    const UNSIGNED_ITEMS: usize = 10;
    const CONTEXT: &'static str = "eip7702";

    fn push_fields(&self, list: &mut RlpList) {
        list.push(&self.chain_id)
            .push(&self.nonce)
            .push(&self.max_priority_fee_per_gas)
            .push(&self.max_fee_per_gas)
            .push(&self.gas)
            .push(&self.to)
            .push(&self.value)
            .push(&self.data)
            .push_list(&self.access_list.to_rlp())
            .push_list(&SignedAuthorization::list_to_rlp(&self.authorization_list));
    }

    fn decode_fields(fields: &mut RlpFields<'_>) -> TransactionResult<Self> {
        Ok(Self {
            chain_id: fields.u64("chainId")?,
            nonce: fields.u64("nonce")?,
            max_priority_fee_per_gas: fields.u128("maxPriorityFeePerGas")?,
            max_fee_per_gas: fields.u128("maxFeePerGas")?,
            gas: fields.u64("gas")?,
            to: fields.address("to")?,
            value: fields.u256("value")?,
            data: fields.bytes("data")?,
            access_list: AccessList::from_rlp_items(&fields.list("accessList")?)?,
            authorization_list: SignedAuthorization::list_from_rlp_items(
                &fields.list("authorizationList")?,
            )?,
            signature: None,
        })
    }

    fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    fn set_signature(&mut self, signature: Option<Signature>) {
        self.signature = signature;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::transaction::authorization::Authorization;
    use crate::transaction::typed::{decode_envelope, encode_envelope, rlp_list};
    use scribe_crypto::Secp256k1KeyPair;

    fn sample() -> TxEip7702 {
        let authority = Secp256k1KeyPair::from_bytes([0x11; 32]).unwrap();
        let authorization = Authorization {
            chain_id: U256::from(1u8),
            address: Address::repeat_byte(0x77),
            nonce: 0,
        }
        .sign(&authority)
        .unwrap();

        TxEip7702 {
            chain_id: 1,
            nonce: 1,
            max_priority_fee_per_gas: 1,
            max_fee_per_gas: 2,
            gas: 60_000,
            to: Address::repeat_byte(0x70),
            value: U256::ZERO,
            data: Bytes::new(),
            access_list: AccessList::default(),
            authorization_list: vec![authorization],
            signature: None,
        }
    }

    #[test]
    fn test_item_counts() {
        assert_eq!(rlp_list(&sample(), true).len(), 10);
        let signed = TxEip7702 {
            signature: Some(Signature::new(U256::from(1u8), U256::from(1u8), true)),
            ..sample()
        };
        assert_eq!(rlp_list(&signed, true).len(), 13);
    }

    #[test]
    fn test_roundtrip_keeps_authorities() {
        let tx = sample();
        let encoded = encode_envelope(&tx, true);
        let decoded = decode_envelope::<TxEip7702>(&encoded[1..]).unwrap();

        assert_eq!(encoded[0], 0x04);
        assert_eq!(decoded, tx);
        assert_eq!(
            decoded.authorization_list[0].recover_authority().unwrap(),
            Secp256k1KeyPair::from_bytes([0x11; 32]).unwrap().address()
        );
    }
}
