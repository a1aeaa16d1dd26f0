//! EIP-2930 access-list transactions (type `0x01`).
//!
//! `0x01 ‖ rlp([chainId, nonce, gasPrice, gas, to, value, data, accessList, yParity?, r?, s?])`

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use scribe_core::error::TransactionResult;
use scribe_core::rlp::{RlpFields, RlpList};
use scribe_crypto::Signature;

use super::access_list::AccessList;
use super::typed::TypedEnvelope;
use super::TxType;

/// An EIP-2930 transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxEip2930 {
    /// Chain id.
    pub chain_id: u64,
    /// Sender nonce.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas: u64,
    /// Recipient; `None` creates a contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Value in wei.
    pub value: U256,
    /// Calldata.
    pub data: Bytes,
    /// Pre-declared accounts and storage slots.
    #[serde(default)]
    pub access_list: AccessList,
    /// Signature. Only `r`, `s` and `yParity` are encoded.
    #[serde(flatten)]
    pub signature: Option<Signature>,
}

impl TypedEnvelope for TxEip2930 {
    const TX_TYPE: TxType = TxType::Eip2930;
    const UNSIGNED_ITEMS: usize = 8;
    const CONTEXT: &'static str = "eip2930";

    fn push_fields(&self, list: &mut RlpList) {
        list.push(&self.chain_id)
            .push(&self.nonce)
            .push(&self.gas_price)
            .push(&self.gas)
            .push_optional_address(self.to.as_ref())
            .push(&self.value)
            .push(&self.data)
            .push_list(&self.access_list.to_rlp());
    }

    fn decode_fields(fields: &mut RlpFields<'_>) -> TransactionResult<Self> {
        Ok(Self {
            chain_id: fields.u64("chainId")?,
            nonce: fields.u64("nonce")?,
            gas_price: fields.u128("gasPrice")?,
            gas: fields.u64("gas")?,
            to: fields.optional_address("to")?,
            value: fields.u256("value")?,
            data: fields.bytes("data")?,
            access_list: AccessList::from_rlp_items(&fields.list("accessList")?)?,
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
