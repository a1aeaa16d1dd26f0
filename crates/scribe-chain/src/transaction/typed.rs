//! Shared plumbing for EIP-2718 typed envelopes.
//!
//! Every typed transaction is `type ‖ rlp([fields..., yParity?, r?, s?])`. The
//! per-type modules only describe their field list; the item-count check and
//! the signature tail live here.

use alloy_primitives::U256;

use scribe_core::error::{SignatureError, TransactionError, TransactionResult};
use scribe_core::rlp::{decode_list, RlpFields, RlpList};
use scribe_crypto::Signature;

use super::TxType;

/// Number of RLP items a signature adds to an envelope.
pub const SIGNATURE_ITEMS: usize = 3;

/// A typed transaction body.
pub(crate) trait TypedEnvelope: Sized {
    /// The EIP-2718 type byte.
    const TX_TYPE: TxType;

    /// Item count of the unsigned list.
    const UNSIGNED_ITEMS: usize;

    /// Name used in decode errors.
    const CONTEXT: &'static str;

    /// Append the unsigned fields in canonical order.
    fn push_fields(&self, list: &mut RlpList);

    /// Read the unsigned fields in canonical order.
    fn decode_fields(fields: &mut RlpFields<'_>) -> TransactionResult<Self>;

    fn signature(&self) -> Option<&Signature>;

    fn set_signature(&mut self, signature: Option<Signature>);
}

/// Build the RLP list of `tx`, with the signature tail if `signed` and present.
pub(crate) fn rlp_list<T: TypedEnvelope>(tx: &T, signed: bool) -> RlpList {
    let mut list = RlpList::new();
    tx.push_fields(&mut list);
    if let Some(signature) = tx.signature().filter(|_| signed) {
        push_signature(&mut list, signature);
    }
    list
}

/// `type ‖ rlp(list)`.
pub(crate) fn encode_envelope<T: TypedEnvelope>(tx: &T, signed: bool) -> Vec<u8> {
    let mut out = vec![T::TX_TYPE as u8];
    rlp_list(tx, signed).encode_into(&mut out);
    out
}

/// Decode the list payload that follows the type byte.
pub(crate) fn decode_envelope<T: TypedEnvelope>(payload: &[u8]) -> TransactionResult<T> {
    decode_items(decode_list(payload)?)
}

/// Decode an already-opened list of envelope items.
pub(crate) fn decode_items<T: TypedEnvelope>(items: Vec<&[u8]>) -> TransactionResult<T> {
    let count = items.len();
    let signed = match count {
        n if n == T::UNSIGNED_ITEMS => false,
        n if n == T::UNSIGNED_ITEMS + SIGNATURE_ITEMS => true,
        n => {
            return Err(TransactionError::invalid_serialized(format!(
                "{}: expected {} or {} items, got {n}",
                T::CONTEXT,
                T::UNSIGNED_ITEMS,
                T::UNSIGNED_ITEMS + SIGNATURE_ITEMS
            )))
        }
    };

    let mut fields = RlpFields::new(items, T::CONTEXT);
    let mut tx = T::decode_fields(&mut fields)?;
    if signed {
        tx.set_signature(Some(decode_signature(&mut fields)?));
    }

    tracing::trace!(tx_type = %T::TX_TYPE, items = count, signed, "decoded typed envelope");
    Ok(tx)
}

/// Append `[yParity, r, s]`.
pub(crate) fn push_signature(list: &mut RlpList, signature: &Signature) {
    list.push(&u8::from(signature.y_parity()))
        .push(&signature.r())
        .push(&signature.s());
}

/// Read `[yParity, r, s]`. Only `0` and `1` are valid parities.
pub(crate) fn decode_signature(fields: &mut RlpFields<'_>) -> TransactionResult<Signature> {
    let y_parity = fields.u64("yParity")?;
    let r: U256 = fields.u256("r")?;
    let s: U256 = fields.u256("s")?;
    if y_parity > 1 {
        return Err(SignatureError::invalid_y_parity_or_v(y_parity).into());
    }
    Ok(Signature::new(r, s, y_parity == 1))
}
