//! Legacy (pre-EIP-2718) transactions.
//!
//! RLP layouts:
//!
//! - unsigned, no replay protection: `[nonce, gasPrice, gas, to, value, data]`
//! - unsigned, EIP-155: `[nonce, gasPrice, gas, to, value, data, chainId, "", ""]`
//! - signed: `[nonce, gasPrice, gas, to, value, data, v, r, s]`
//!
//! A signed `v` carries both the parity and, from 35 upward, the chain id:
//! `v = chainId * 2 + 35 + yParity`. `27`/`28` mean no chain id.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use scribe_core::config::LegacyVPolicy;
use scribe_core::error::{SignatureError, TransactionError, TransactionResult};
use scribe_core::rlp::{decode_list, decode_u64, RlpFields, RlpList};
use scribe_crypto::{parity_from_legacy_v, Signature};

/// Item count without signature or EIP-155 tail.
const BASE_ITEMS: usize = 6;

/// Item count with the `[v, r, s]` tail.
const FULL_ITEMS: usize = 9;

/// A legacy transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxLegacy {
    /// EIP-155 chain id. `None` signs without replay protection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
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
    /// Signature. Only `r`, `s` and `yParity` are encoded.
    #[serde(flatten)]
    pub signature: Option<Signature>,
}

impl TxLegacy {
    fn push_fields(&self, list: &mut RlpList) {
        list.push(&self.nonce)
            .push(&self.gas_price)
            .push(&self.gas)
            .push_optional_address(self.to.as_ref())
            .push(&self.value)
            .push(&self.data);
    }

    /// The list that is hashed for signing.
    pub(crate) fn signing_rlp(&self) -> RlpList {
        let mut list = RlpList::new();
        self.push_fields(&mut list);
        if let Some(chain_id) = self.chain_id {
            list.push(&chain_id).push_bytes(&[]).push_bytes(&[]);
        }
        list
    }

    /// The signed list, or the signing list when there is no signature.
    pub(crate) fn signed_rlp(&self) -> RlpList {
        let Some(signature) = &self.signature else {
            return self.signing_rlp();
        };
        let mut list = RlpList::new();
        self.push_fields(&mut list);
        list.push(&signature.legacy_v(self.chain_id))
            .push(&signature.r())
            .push(&signature.s());
        list
    }

    /// Decode a legacy RLP list.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidSerializedTransaction`] for an item
    /// count other than 6 or 9, [`TransactionError::InvalidRlp`] for malformed
    /// fields and [`SignatureError::InvalidYParityOrV`] for a non-canonical `v`
    /// under [`LegacyVPolicy::Strict`].
    pub fn decode(data: &[u8], policy: LegacyVPolicy) -> TransactionResult<Self> {
        let items = decode_list(data)?;
        let count = items.len();
        if count != BASE_ITEMS && count != FULL_ITEMS {
            return Err(TransactionError::invalid_serialized(format!(
                "legacy: expected {BASE_ITEMS} or {FULL_ITEMS} items, got {count}"
            )));
        }

        let mut fields = RlpFields::new(items, "legacy");
        let mut tx = Self {
            chain_id: None,
            nonce: fields.u64("nonce")?,
            gas_price: fields.u128("gasPrice")?,
            gas: fields.u64("gas")?,
            to: fields.optional_address("to")?,
            value: fields.u256("value")?,
            data: fields.bytes("data")?,
            signature: None,
        };
        if count == BASE_ITEMS {
            return Ok(tx);
        }

        let v_raw = fields.raw("v")?;
        let r_raw = fields.raw("r")?;
        let s_raw = fields.raw("s")?;
        if is_empty_string(r_raw) && is_empty_string(s_raw) {
            let chain_id = decode_u64(v_raw)
                .map_err(|e| TransactionError::invalid_rlp(format!("legacy.chainId: {e}")))?;
            tx.chain_id = Some(chain_id);
            return Ok(tx);
        }

        let mut tail = RlpFields::new(vec![v_raw, r_raw, s_raw], "legacy");
        let v = tail.u128("v")?;
        let r = tail.u256("r")?;
        let s = tail.u256("s")?;

        let (y_parity, chain_id) = match parity_from_legacy_v(v) {
            Some(split) => split,
            None => match policy {
                LegacyVPolicy::Strict => {
                    let value = u64::try_from(v).unwrap_or(u64::MAX);
                    return Err(SignatureError::invalid_y_parity_or_v(value).into());
                }
                LegacyVPolicy::Lenient => {
                    tracing::warn!(v = %v, "accepting non-canonical legacy v");
                    (v % 2 == 1, None)
                }
            },
        };
        tx.chain_id = chain_id;
        tx.signature = Some(Signature::new(r, s, y_parity));
        Ok(tx)
    }
}

fn is_empty_string(item: &[u8]) -> bool {
    item == [alloy_rlp::EMPTY_STRING_CODE]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn sample() -> TxLegacy {
        TxLegacy {
            chain_id: Some(1),
            nonce: 9,
            gas_price: 20_000_000_000,
            gas: 21_000,
            to: Some(Address::repeat_byte(0x35)),
            value: U256::from(1_000_000_000_000_000_000u128),
            data: Bytes::new(),
            signature: None,
        }
    }

    fn with_tail(v: &[u8], r: &[u8], s: &[u8]) -> Vec<u8> {
        let mut list = RlpList::new();
        sample().push_fields(&mut list);
        list.push_raw(v).push_raw(r).push_raw(s);
        list.finish()
    }

    // ------------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------------

    #[test]
    fn test_eip155_signing_payload() {
        // EIP-155 example transaction, signing data.
        let expected = alloy_primitives::hex!(
            "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080"
        );
        assert_eq!(sample().signing_rlp().finish(), expected.to_vec());
    }

    #[test]
    fn test_pre_eip155_signing_payload_has_six_items() {
        let tx = TxLegacy {
            chain_id: None,
            ..sample()
        };
        assert_eq!(tx.signing_rlp().len(), 6);
    }

    #[test]
    fn test_signed_v_includes_chain_id() {
        let tx = TxLegacy {
            signature: Some(Signature::new(U256::from(1u8), U256::from(2u8), true)),
            ..sample()
        };
        let items_encoded = tx.signed_rlp().finish();
        let items = decode_list(&items_encoded).unwrap();
        assert_eq!(decode_u64(items[6]).unwrap(), 38);
    }

    // ------------------------------------------------------------------------
    // Decoding
    // ------------------------------------------------------------------------

    #[test]
    fn test_empty_r_s_is_chain_id_marker() {
        let data = with_tail(&[0x81, 137], &[0x80], &[0x80]);
        let tx = TxLegacy::decode(&data, LegacyVPolicy::Strict).unwrap();

        assert_eq!(tx.chain_id, Some(137));
        assert_eq!(tx.signature, None);
    }

    #[test]
    fn test_v_28_has_no_chain_id() {
        let mut r = vec![0xa0];
        r.extend_from_slice(&[0x11; 32]);
        let mut s = vec![0xa0];
        s.extend_from_slice(&[0x22; 32]);

        let tx = TxLegacy::decode(&with_tail(&[28], &r, &s), LegacyVPolicy::Strict).unwrap();
        let signature = tx.signature.unwrap();

        assert_eq!(tx.chain_id, None);
        assert!(signature.y_parity());
        assert_eq!(signature.r(), U256::from_be_bytes([0x11; 32]));
    }

    #[test]
    fn test_eip155_v_splits_into_chain_and_parity() {
        let tx = TxLegacy::decode(&with_tail(&[37], &[0x01], &[0x02]), LegacyVPolicy::Strict)
            .unwrap();

        assert_eq!(tx.chain_id, Some(1));
        assert!(!tx.signature.unwrap().y_parity());
    }

    #[test]
    fn test_non_canonical_v_strict_rejects() {
        let err =
            TxLegacy::decode(&with_tail(&[30], &[0x01], &[0x02]), LegacyVPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            TransactionError::Signature(SignatureError::invalid_y_parity_or_v(30))
        );
    }

    #[test]
    fn test_non_canonical_v_lenient_accepts() {
        let tx = TxLegacy::decode(&with_tail(&[31], &[0x01], &[0x02]), LegacyVPolicy::Lenient)
            .unwrap();

        assert_eq!(tx.chain_id, None);
        assert!(tx.signature.unwrap().y_parity());
    }

    #[test]
    fn test_wrong_item_count_rejected() {
        let mut list = RlpList::new();
        sample().push_fields(&mut list);
        list.push(&1u64);

        assert!(matches!(
            TxLegacy::decode(&list.finish(), LegacyVPolicy::Strict),
            Err(TransactionError::InvalidSerializedTransaction { .. })
        ));
    }

    #[test]
    fn test_roundtrip_signed_and_unsigned() {
        let unsigned = sample();
        let signed = TxLegacy {
            signature: Some(Signature::new(U256::from(7u8), U256::from(9u8), false)),
            ..sample()
        };
        let pre_eip155 = TxLegacy {
            chain_id: None,
            ..signed.clone()
        };

        for tx in [unsigned, signed, pre_eip155] {
            let encoded = tx.signed_rlp().finish();
            assert_eq!(TxLegacy::decode(&encoded, LegacyVPolicy::Strict).unwrap(), tx);
        }
    }
}
