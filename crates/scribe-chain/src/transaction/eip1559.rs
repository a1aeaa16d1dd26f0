//! EIP-1559 dynamic-fee transactions (type `0x02`).
//!
//! `0x02 ‖ rlp([chainId, nonce, maxPriorityFeePerGas, maxFeePerGas, gas, to, value, data,
//! accessList, yParity?, r?, s?])`

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use scribe_core::error::TransactionResult;
use scribe_core::rlp::{RlpFields, RlpList};
use scribe_crypto::Signature;

use super::access_list::AccessList;
use super::typed::TypedEnvelope;
use super::TxType;

/// An EIP-1559 transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxEip1559 {
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

impl TypedEnvelope for TxEip1559 {
    const TX_TYPE: TxType = TxType::Eip1559;
    const UNSIGNED_ITEMS: usize = 9;
    const CONTEXT: &'static str = "eip1559";

    fn push_fields(&self, list: &mut RlpList) {
        list.push(&self.chain_id)
            .push(&self.nonce)
            .push(&self.max_priority_fee_per_gas)
            .push(&self.max_fee_per_gas)
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
            max_priority_fee_per_gas: fields.u128("maxPriorityFeePerGas")?,
            max_fee_per_gas: fields.u128("maxFeePerGas")?,
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
