//! EIP-7702 authorizations.
//!
//! An authorization lets an externally-owned account delegate its code to
//! `address`. The authority signs
//! `keccak256(0x05 ‖ rlp([chainId, address, nonce]))` and the signed tuple
//! travels in the transaction as `[chainId, address, nonce, yParity, r, s]`.

use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};

use scribe_core::error::TransactionResult;
use scribe_core::rlp::{decode_list, RlpFields, RlpList};
use scribe_crypto::{recover_address, Secp256k1KeyPair, Signature};

use super::typed::{decode_signature, push_signature};

/// Domain byte prepended to the authorization payload before hashing.
pub const AUTHORIZATION_MAGIC: u8 = 0x05;

/// An unsigned delegation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    /// Chain the authorization is valid on; zero means any chain.
    pub chain_id: U256,
    /// Contract whose code is delegated to.
    pub address: Address,
    /// Nonce of the authority.
    pub nonce: u64,
}

impl Authorization {
    fn to_rlp(self) -> RlpList {
        let mut list = RlpList::new();
        list.push(&self.chain_id)
            .push(&self.address)
            .push(&self.nonce);
        list
    }

    /// The digest the authority signs.
    #[must_use]
    pub fn signing_hash(&self) -> B256 {
        let mut buf = vec![AUTHORIZATION_MAGIC];
        self.to_rlp().encode_into(&mut buf);
        keccak256(buf)
    }

    /// Attach a signature.
    #[must_use]
    pub const fn into_signed(self, signature: Signature) -> SignedAuthorization {
        SignedAuthorization {
            inner: self,
            signature: signature.without_v(),
        }
    }

    /// Sign with `keypair`.
    ///
    /// # Errors
    ///
    /// Propagates signing failures from the key pair.
    pub fn sign(self, keypair: &Secp256k1KeyPair) -> TransactionResult<SignedAuthorization> {
        let signature = keypair.sign_hash(&self.signing_hash())?;
        Ok(self.into_signed(signature))
    }
}

/// An authorization together with the authority's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedAuthorization {
    #[serde(flatten)]
    inner: Authorization,
    #[serde(flatten)]
    signature: Signature,
}

impl SignedAuthorization {
    /// The unsigned authorization.
    #[must_use]
    pub const fn authorization(&self) -> &Authorization {
        &self.inner
    }

    /// The authority's signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Recover the account that granted this authorization.
    ///
    /// # Errors
    ///
    /// Returns the signature error if recovery fails.
    pub fn recover_authority(&self) -> TransactionResult<Address> {
        Ok(recover_address(
            &self.inner.signing_hash(),
            &self.signature,
        )?)
    }

    pub(crate) fn to_rlp(self) -> RlpList {
        let mut list = self.inner.to_rlp();
        push_signature(&mut list, &self.signature);
        list
    }

    fn from_rlp(raw: &[u8]) -> TransactionResult<Self> {
        let mut fields = RlpFields::new(decode_list(raw)?, "authorization");
        fields.expect_len(6)?;

        let inner = Authorization {
            chain_id: fields.u256("chainId")?,
            address: fields.address("address")?,
            nonce: fields.u64("nonce")?,
        };
        let signature = decode_signature(&mut fields)?;
        Ok(Self { inner, signature })
    }

    /// Decode the items of an already-opened authorization list.
    ///
    /// # Errors
    ///
    /// Returns an RLP, structure or `yParity` error for the first bad entry.
    pub fn list_from_rlp_items(items: &[&[u8]]) -> TransactionResult<Vec<Self>> {
        items.iter().map(|raw| Self::from_rlp(raw)).collect()
    }

    /// Build the nested RLP list for an authorization list.
    #[must_use]
    pub fn list_to_rlp(list: &[Self]) -> RlpList {
        let mut out = RlpList::new();
        for authorization in list {
            out.push_list(&authorization.to_rlp());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use scribe_core::{SignatureError, TransactionError};

    fn authorization() -> Authorization {
        Authorization {
            chain_id: U256::from(1u8),
            address: Address::repeat_byte(0x42),
            nonce: 7,
        }
    }

    fn keypair() -> Secp256k1KeyPair {
        Secp256k1KeyPair::from_bytes([0x5a; 32]).unwrap()
    }

    #[test]
    fn test_signing_hash_layout() {
        let auth = authorization();
        let mut expected = vec![0x05, 0xd7, 0x01, 0x94];
        expected.extend_from_slice(&[0x42; 20]);
        expected.push(0x07);
        assert_eq!(auth.signing_hash(), keccak256(expected));
    }

    #[test]
    fn test_sign_and_recover_authority() {
        let keypair = keypair();
        let signed = authorization().sign(&keypair).unwrap();

        assert_eq!(signed.authorization(), &authorization());
        assert_eq!(signed.recover_authority().unwrap(), keypair.address());
    }

    #[test]
    fn test_rlp_roundtrip() {
        let signed = authorization().sign(&keypair()).unwrap();
        let encoded = SignedAuthorization::list_to_rlp(&[signed, signed]).finish();
        let items = decode_list(&encoded).unwrap();

        assert_eq!(
            SignedAuthorization::list_from_rlp_items(&items).unwrap(),
            vec![signed, signed]
        );
    }

    #[test]
    fn test_bad_y_parity_rejected() {
        let mut list = authorization().to_rlp();
        list.push(&2u8).push(&1u8).push(&1u8);
        let encoded = list.finish();

        assert_eq!(
            SignedAuthorization::from_rlp(&encoded),
            Err(TransactionError::Signature(
                SignatureError::invalid_y_parity_or_v(2)
            ))
        );
    }

    #[test]
    fn test_wrong_item_count_rejected() {
        let encoded = authorization().to_rlp().finish();
        assert!(matches!(
            SignedAuthorization::from_rlp(&encoded),
            Err(TransactionError::InvalidSerializedTransaction { .. })
        ));
    }

    #[test]
    fn test_serde_flattens_fields() {
        let signed = authorization().sign(&keypair()).unwrap();
        let json = serde_json::to_value(signed).unwrap();

        assert!(json.get("chainId").is_some());
        assert!(json.get("yParity").is_some());
        assert!(json.get("r").is_some());
        assert_eq!(serde_json::from_value::<SignedAuthorization>(json).unwrap(), signed);
    }
}
