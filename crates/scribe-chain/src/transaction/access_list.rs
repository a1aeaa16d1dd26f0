//! EIP-2930 access lists.
//!
//! RLP shape: `[[address, [storageKey, ...]], ...]`.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use scribe_core::error::TransactionResult;
use scribe_core::rlp::{decode_b256, RlpFields, RlpList};

/// One account and the storage slots it pre-declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    /// Account address.
    pub address: Address,
    /// Storage keys of that account.
    pub storage_keys: Vec<B256>,
}

/// An ordered list of [`AccessListItem`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Build the nested RLP list.
    #[must_use]
    pub fn to_rlp(&self) -> RlpList {
        let mut list = RlpList::new();
        for item in &self.0 {
            let mut keys = RlpList::new();
            for key in &item.storage_keys {
                keys.push(key);
            }

            let mut entry = RlpList::new();
            entry.push(&item.address).push_list(&keys);
            list.push_list(&entry);
        }
        list
    }

    /// Decode the items of an already-opened access list.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidRlp`](scribe_core::TransactionError::InvalidRlp)
    /// for malformed entries and
    /// [`TransactionError::InvalidSerializedTransaction`](scribe_core::TransactionError::InvalidSerializedTransaction)
    /// if an entry does not have exactly two items.
    pub fn from_rlp_items(items: &[&[u8]]) -> TransactionResult<Self> {
        items
            .iter()
            .map(|raw| {
                let mut fields = RlpFields::new(scribe_core::rlp::decode_list(raw)?, "accessList");
                fields.expect_len(2)?;
                let address = fields.address("address")?;
                let storage_keys = fields
                    .list("storageKeys")?
                    .into_iter()
                    .map(decode_b256)
                    .collect::<TransactionResult<Vec<_>>>()?;
                Ok(AccessListItem {
                    address,
                    storage_keys,
                })
            })
            .collect::<TransactionResult<Vec<_>>>()
            .map(Self)
    }
}

impl From<Vec<AccessListItem>> for AccessList {
    fn from(items: Vec<AccessListItem>) -> Self {
        Self(items)
    }
}
