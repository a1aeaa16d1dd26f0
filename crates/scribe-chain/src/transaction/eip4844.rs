//! EIP-4844 blob transactions (type `0x03`).
//!
//! Canonical form:
//! `0x03 ‖ rlp([chainId, nonce, maxPriorityFeePerGas, maxFeePerGas, gas, to, value, data,
//! accessList, maxFeePerBlobGas, blobVersionedHashes, yParity?, r?, s?])`
//!
//! Network form, used only when sidecars are attached:
//! `0x03 ‖ rlp([txList, blobs, commitments, proofs])`

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use scribe_core::error::TransactionResult;
use scribe_core::rlp::{decode_b256, decode_list, is_list, RlpFields, RlpList};
use scribe_crypto::Signature;

use super::access_list::AccessList;
use super::sidecar::{sidecars_from_rlp, sidecars_to_rlp, BlobSidecar};
use super::typed::{decode_items, rlp_list, TypedEnvelope};
use super::TxType;

/// Item count of the network wrapper.
const WRAPPER_ITEMS: usize = 4;

/// An EIP-4844 transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxEip4844 {
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
    /// Recipient. Blob transactions cannot create contracts.
    pub to: Address,
    /// Value in wei.
    pub value: U256,
    /// Calldata.
    pub data: Bytes,
    /// Pre-declared accounts and storage slots.
    #[serde(default)]
    pub access_list: AccessList,
    /// Fee cap per unit of blob gas.
    pub max_fee_per_blob_gas: u128,
    /// Versioned hashes of the carried blobs.
    pub blob_versioned_hashes: Vec<B256>,
    /// Blobs, commitments and proofs. Only encoded in the network form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidecars: Option<Vec<BlobSidecar>>,
    /// Signature. Only `r`, `s` and `yParity` are encoded.
    #[serde(flatten)]
    pub signature: Option<Signature>,
}

impl TxEip4844 {
    /// Encode `0x03 ‖ ...`, using the network wrapper when sidecars are attached.
    pub(crate) fn encode_network(&self, signed: bool) -> Vec<u8> {
        let mut out = vec![TxType::Eip4844 as u8];
        match &self.sidecars {
            Some(sidecars) => {
                let [blobs, commitments, proofs] = sidecars_to_rlp(sidecars);
                let mut wrapper = RlpList::new();
                wrapper
                    .push_list(&rlp_list(self, signed))
                    .push_list(&blobs)
                    .push_list(&commitments)
                    .push_list(&proofs);
                wrapper.encode_into(&mut out);
            }
            None => rlp_list(self, signed).encode_into(&mut out),
        }
        out
    }

    /// Decode the payload after the type byte, in either form.
    pub(crate) fn decode_network(payload: &[u8]) -> TransactionResult<Self> {
        let items = decode_list(payload)?;
        if items.len() != WRAPPER_ITEMS || !is_list(items[0]) {
            return decode_items(items);
        }

        let mut wrapper = RlpFields::new(items, "eip4844 wrapper");
        let mut tx: Self = decode_items(wrapper.list("tx")?)?;
        let sidecars = sidecars_from_rlp(
            &wrapper.list("blobs")?,
            &wrapper.list("commitments")?,
            &wrapper.list("proofs")?,
        )?;
        tracing::trace!(blobs = sidecars.len(), "decoded blob sidecars");
        tx.sidecars = Some(sidecars);
        Ok(tx)
    }
}

impl TypedEnvelope for TxEip4844 {
    const TX_TYPE: TxType = TxType::Eip4844;
    const UNSIGNED_ITEMS: usize = 11;
    const CONTEXT: &'static str = "eip4844";

    fn push_fields(&self, list: &mut RlpList) {
        let mut hashes = RlpList::new();
        for hash in &self.blob_versioned_hashes {
            hashes.push(hash);
        }

        list.push(&self.chain_id)
            .push(&self.nonce)
            .push(&self.max_priority_fee_per_gas)
            .push(&self.max_fee_per_gas)
            .push(&self.gas)
            .push(&self.to)
            .push(&self.value)
            .push(&self.data)
            .push_list(&self.access_list.to_rlp())
            .push(&self.max_fee_per_blob_gas)
            .push_list(&hashes);
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
            max_fee_per_blob_gas: fields.u128("maxFeePerBlobGas")?,
            blob_versioned_hashes: fields
                .list("blobVersionedHashes")?
                .into_iter()
                .map(decode_b256)
                .collect::<TransactionResult<_>>()?,
            sidecars: None,
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
