//! Transaction requests and their structural validation.
//!
//! A [`TransactionRequest`] is the loosely-typed shape callers fill in before
//! a transaction is signed. [`assert_request`] rejects contradictory field
//! combinations and [`TransactionRequest::build`] turns a valid request into
//! the matching unsigned [`Transaction`].
//!
//! Filling in nonces, gas limits and fees is the caller's job; missing nonce,
//! gas, value and data default to zero or empty.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use scribe_core::error::{TransactionError, TransactionResult};

use super::{
    AccessList, BlobSidecar, SignedAuthorization, Transaction, TxEip1559, TxEip2930, TxEip4844,
    TxEip7702, TxLegacy, TxType,
};

/// A transaction under construction. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Chain id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Sender nonce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// Gas limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    /// Legacy gas price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
    /// EIP-1559 fee cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 tip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<u128>,
    /// EIP-4844 blob fee cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_blob_gas: Option<u128>,
    /// Recipient; `None` creates a contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Value in wei.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Calldata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// Access list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_list: Option<AccessList>,
    /// EIP-4844 versioned hashes. Derived from `sidecars` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_versioned_hashes: Option<Vec<B256>>,
    /// EIP-4844 sidecars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidecars: Option<Vec<BlobSidecar>>,
    /// EIP-7702 authorizations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_list: Option<Vec<SignedAuthorization>>,
}

/// Reject structurally contradictory requests.
///
/// Checks, in order:
///
/// 1. `gasPrice` together with either EIP-1559 fee field
/// 2. `maxPriorityFeePerGas` above `maxFeePerGas`
/// 3. a zero chain id, or no chain id, when `require_replay_protection` is set
///
/// # Errors
///
/// Returns [`TransactionError::ConflictingFeeFields`] for either fee
/// conflict and [`TransactionError::InvalidChainId`] for the chain id check.
pub fn assert_request(
    request: &TransactionRequest,
    require_replay_protection: bool,
) -> TransactionResult<()> {
    if request.gas_price.is_some()
        && (request.max_fee_per_gas.is_some() || request.max_priority_fee_per_gas.is_some())
    {
        return Err(TransactionError::conflicting_fee_fields(
            "gasPrice cannot be combined with maxFeePerGas or maxPriorityFeePerGas",
        ));
    }

    if let (Some(tip), Some(cap)) = (
        request.max_priority_fee_per_gas,
        request.max_fee_per_gas,
    ) {
        if tip > cap {
            return Err(TransactionError::conflicting_fee_fields(format!(
                "maxPriorityFeePerGas ({tip}) exceeds maxFeePerGas ({cap})"
            )));
        }
    }

    if require_replay_protection {
        match request.chain_id {
            Some(0) => {
                return Err(TransactionError::invalid_chain_id(
                    "chain id 0 offers no replay protection",
                ))
            }
            None => {
                return Err(TransactionError::invalid_chain_id(
                    "replay protection requires a chain id",
                ))
            }
            Some(_) => {}
        }
    }

    Ok(())
}

impl TransactionRequest {
    /// Infer the envelope kind from the fields that are set.
    ///
    /// Authorizations select EIP-7702, any blob field selects EIP-4844, an
    /// EIP-1559 fee selects EIP-1559, `gasPrice` with an access list selects
    /// EIP-2930 and a bare `gasPrice` selects legacy.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::MissingFeeFields`] when no fee field is set.
    pub fn transaction_type(&self) -> TransactionResult<TxType> {
        if self.authorization_list.is_some() {
            Ok(TxType::Eip7702)
        } else if self.blob_versioned_hashes.is_some()
            || self.sidecars.is_some()
            || self.max_fee_per_blob_gas.is_some()
        {
            Ok(TxType::Eip4844)
        } else if self.max_fee_per_gas.is_some() || self.max_priority_fee_per_gas.is_some() {
            Ok(TxType::Eip1559)
        } else if self.gas_price.is_some() {
            if self.access_list.is_some() {
                Ok(TxType::Eip2930)
            } else {
                Ok(TxType::Legacy)
            }
        } else {
            Err(TransactionError::missing_fee_fields(
                "set gasPrice or maxFeePerGas and maxPriorityFeePerGas",
            ))
        }
    }

    /// Validate and build the unsigned transaction.
    ///
    /// # Errors
    ///
    /// - anything [`assert_request`] reports
    /// - [`TransactionError::MissingFeeFields`] if no envelope can be inferred
    /// - [`TransactionError::InvalidChainId`] for a typed envelope without chain id
    /// - [`TransactionError::MissingField`] for a field the envelope requires
    /// - [`TransactionError::InvalidSidecar`] if versioned hashes disagree with sidecars
    pub fn build(&self, require_replay_protection: bool) -> TransactionResult<Transaction> {
        assert_request(self, require_replay_protection)?;
        let tx_type = self.transaction_type()?;
        tracing::debug!(%tx_type, "building transaction from request");

        let chain_id = || {
            self.chain_id.ok_or_else(|| {
                TransactionError::invalid_chain_id(format!(
                    "{tx_type} transactions require a chain id"
                ))
            })
        };
        let access_list = || self.access_list.clone().unwrap_or_default();

        let tx = match tx_type {
            TxType::Legacy => Transaction::Legacy(TxLegacy {
                chain_id: self.chain_id,
                nonce: self.nonce.unwrap_or_default(),
                gas_price: required(self.gas_price, "gasPrice")?,
                gas: self.gas.unwrap_or_default(),
                to: self.to,
                value: self.value.unwrap_or_default(),
                data: self.data.clone().unwrap_or_default(),
                signature: None,
            }),
            TxType::Eip2930 => Transaction::Eip2930(TxEip2930 {
                chain_id: chain_id()?,
                nonce: self.nonce.unwrap_or_default(),
                gas_price: required(self.gas_price, "gasPrice")?,
                gas: self.gas.unwrap_or_default(),
                to: self.to,
                value: self.value.unwrap_or_default(),
                data: self.data.clone().unwrap_or_default(),
                access_list: access_list(),
                signature: None,
            }),
            TxType::Eip1559 => Transaction::Eip1559(TxEip1559 {
                chain_id: chain_id()?,
                nonce: self.nonce.unwrap_or_default(),
                max_priority_fee_per_gas: required(
                    self.max_priority_fee_per_gas,
                    "maxPriorityFeePerGas",
                )?,
                max_fee_per_gas: required(self.max_fee_per_gas, "maxFeePerGas")?,
                gas: self.gas.unwrap_or_default(),
                to: self.to,
                value: self.value.unwrap_or_default(),
                data: self.data.clone().unwrap_or_default(),
                access_list: access_list(),
                signature: None,
            }),
            TxType::Eip4844 => Transaction::Eip4844(TxEip4844 {
                chain_id: chain_id()?,
                nonce: self.nonce.unwrap_or_default(),
                max_priority_fee_per_gas: required(
                    self.max_priority_fee_per_gas,
                    "maxPriorityFeePerGas",
                )?,
                max_fee_per_gas: required(self.max_fee_per_gas, "maxFeePerGas")?,
                gas: self.gas.unwrap_or_default(),
                to: required(self.to, "to")?,
                value: self.value.unwrap_or_default(),
                data: self.data.clone().unwrap_or_default(),
                access_list: access_list(),
                max_fee_per_blob_gas: required(self.max_fee_per_blob_gas, "maxFeePerBlobGas")?,
                blob_versioned_hashes: self.versioned_hashes()?,
                sidecars: self.sidecars.clone(),
                signature: None,
            }),
            TxType::Eip7702 => Transaction::Eip7702(TxEip7702 {
                chain_id: chain_id()?,
                nonce: self.nonce.unwrap_or_default(),
                max_priority_fee_per_gas: required(
                    self.max_priority_fee_per_gas,
                    "maxPriorityFeePerGas",
                )?,
                max_fee_per_gas: required(self.max_fee_per_gas, "maxFeePerGas")?,
                gas: self.gas.unwrap_or_default(),
                to: required(self.to, "to")?,
                value: self.value.unwrap_or_default(),
                data: self.data.clone().unwrap_or_default(),
                access_list: access_list(),
                authorization_list: self.authorization_list.clone().unwrap_or_default(),
                signature: None,
            }),
        };
        Ok(tx)
    }

    fn versioned_hashes(&self) -> TransactionResult<Vec<B256>> {
        let derived = self
            .sidecars
            .as_ref()
            .map(|sidecars| sidecars.iter().map(BlobSidecar::versioned_hash).collect::<Vec<_>>());

        match (&self.blob_versioned_hashes, derived) {
            (Some(given), Some(derived)) if *given != derived => Err(
                TransactionError::invalid_sidecar("blobVersionedHashes do not match sidecars"),
            ),
            (Some(given), _) => Ok(given.clone()),
            (None, Some(derived)) => Ok(derived),
            (None, None) => Err(TransactionError::missing_field("blobVersionedHashes")),
        }
    }
}

fn required<T>(value: Option<T>, field: &str) -> TransactionResult<T> {
    value.ok_or_else(|| TransactionError::missing_field(field))
}
