//! EIP-712 typed structured data.
//!
//! [`TypedData`] mirrors the `eth_signTypedData_v4` payload. The signing digest
//! is
//!
//! ```text
//! keccak256(0x19 ‖ 0x01 ‖ domainSeparator ‖ hashStruct(primaryType, message))
//! ```
//!
//! where the trailing struct hash is omitted when the primary type is
//! `EIP712Domain` itself. The domain type is always synthesized from the
//! populated [`TypedDataDomain`] fields.
//!
//! # Example
//!
//! ```
//! use scribe_chain::typed_data::{hash_typed_data, TypedData};
//!
//! let typed: TypedData = TypedData::from_json(r#"{
//!     "domain": { "name": "Ether Mail", "version": "1", "chainId": 1,
//!                 "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC" },
//!     "types": {
//!         "Person": [{ "name": "name", "type": "string" }, { "name": "wallet", "type": "address" }],
//!         "Mail": [{ "name": "from", "type": "Person" }, { "name": "to", "type": "Person" },
//!                  { "name": "contents", "type": "string" }]
//!     },
//!     "primaryType": "Mail",
//!     "message": {
//!         "from": { "name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826" },
//!         "to": { "name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB" },
//!         "contents": "Hello, Bob!"
//!     }
//! }"#).unwrap();
//!
//! let digest = hash_typed_data(&typed).unwrap();
//! assert_eq!(
//!     digest.to_string(),
//!     "0xbe609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2"
//! );
//! ```

mod encoder;

pub use encoder::{
    base_type, encode_field, encode_type, find_dependencies, hash_struct, type_hash, Types,
};

use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use scribe_core::error::{TypedDataError, TypedDataResult};
use scribe_core::primitives::{encode_hex, parse_address, parse_u256};
use scribe_crypto::verify_hash;

/// Name of the synthesized domain type.
pub const EIP712_DOMAIN: &str = "EIP712Domain";

/// Prefix of every EIP-712 signing digest.
const DIGEST_PREFIX: [u8; 2] = [0x19, 0x01];

// ============================================================================
// Type definitions
// ============================================================================

/// One member of a struct definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedDataField {
    /// Member name.
    pub name: String,
    /// Solidity type, e.g. `address`, `uint256[]`, `Person`.
    #[serde(rename = "type")]
    pub ty: String,
}

impl TypedDataField {
    /// Create a field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// The EIP-712 domain. Unset fields are left out of the domain type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDomain {
    /// Signing domain name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Domain version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Chain id. Accepts a JSON number or a decimal/hex string.
    #[serde(
        default,
        deserialize_with = "deserialize_chain_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub chain_id: Option<U256>,
    /// Contract that verifies the signature, as `0x`-prefixed hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_contract: Option<String>,
    /// Disambiguating salt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<B256>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

fn deserialize_chain_id<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(U256::from(n))),
        Some(NumberOrString::String(s)) => parse_u256(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl TypedDataDomain {
    fn non_empty(value: Option<&String>) -> Option<&str> {
        value.map(String::as_str).filter(|s| !s.is_empty())
    }

    /// The verifying contract, parsed.
    ///
    /// # Errors
    ///
    /// Returns [`TypedDataError::Primitive`] if the address is malformed.
    pub fn verifying_contract_address(&self) -> TypedDataResult<Option<Address>> {
        Self::non_empty(self.verifying_contract.as_ref())
            .map(parse_address)
            .transpose()
            .map_err(TypedDataError::from)
    }

    /// Synthesized `EIP712Domain` members, in canonical order.
    #[must_use]
    pub fn fields(&self) -> Vec<TypedDataField> {
        let mut fields = Vec::with_capacity(5);
        if Self::non_empty(self.name.as_ref()).is_some() {
            fields.push(TypedDataField::new("name", "string"));
        }
        if Self::non_empty(self.version.as_ref()).is_some() {
            fields.push(TypedDataField::new("version", "string"));
        }
        if self.chain_id.is_some() {
            fields.push(TypedDataField::new("chainId", "uint256"));
        }
        if Self::non_empty(self.verifying_contract.as_ref()).is_some() {
            fields.push(TypedDataField::new("verifyingContract", "address"));
        }
        if self.salt.is_some() {
            fields.push(TypedDataField::new("salt", "bytes32"));
        }
        fields
    }

    /// The domain as a message object for [`hash_struct`].
    fn to_message(&self) -> Map<String, Value> {
        let mut message = Map::new();
        if let Some(name) = Self::non_empty(self.name.as_ref()) {
            message.insert("name".into(), Value::String(name.to_string()));
        }
        if let Some(version) = Self::non_empty(self.version.as_ref()) {
            message.insert("version".into(), Value::String(version.to_string()));
        }
        if let Some(chain_id) = self.chain_id {
            message.insert("chainId".into(), Value::String(chain_id.to_string()));
        }
        if let Some(contract) = Self::non_empty(self.verifying_contract.as_ref()) {
            message.insert("verifyingContract".into(), Value::String(contract.to_string()));
        }
        if let Some(salt) = self.salt {
            message.insert("salt".into(), Value::String(encode_hex(salt)));
        }
        message
    }

    /// `hashStruct(EIP712Domain, domain)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the verifying contract is not a valid address.
    pub fn separator(&self) -> TypedDataResult<B256> {
        self.verifying_contract_address()?;
        let mut types = Types::new();
        types.insert(EIP712_DOMAIN.to_string(), self.fields());
        hash_struct(EIP712_DOMAIN, &self.to_message(), &types)
    }
}

// ============================================================================
// TypedData
// ============================================================================

/// A complete `eth_signTypedData_v4` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    /// Signing domain.
    #[serde(default)]
    pub domain: TypedDataDomain,
    /// Struct definitions. Must not declare `EIP712Domain`.
    pub types: Types,
    /// Name of the struct being signed.
    pub primary_type: String,
    /// The struct value.
    #[serde(default)]
    pub message: Map<String, Value>,
}

impl TypedData {
    /// Parse wallet JSON.
    ///
    /// Wallet payloads usually declare `EIP712Domain` in `types`. The entry is
    /// dropped when it lists exactly the members the domain populates, since
    /// the domain type is synthesized anyway.
    ///
    /// # Errors
    ///
    /// Returns [`TypedDataError::InvalidTypeDefinition`] if the JSON is
    /// malformed or the declared domain type disagrees with the domain.
    pub fn from_json(json: &str) -> TypedDataResult<Self> {
        let mut typed: Self = serde_json::from_str(json)
            .map_err(|e| TypedDataError::invalid_type_definition(e.to_string()))?;

        if let Some(declared) = typed.types.remove(EIP712_DOMAIN) {
            let expected = typed.domain.fields();
            let same_members = declared.len() == expected.len()
                && expected.iter().all(|field| declared.contains(field));
            if !same_members {
                return Err(TypedDataError::invalid_type_definition(
                    "declared EIP712Domain does not match the populated domain fields",
                ));
            }
        }
        Ok(typed)
    }

    /// Structural checks run before any hashing.
    ///
    /// # Errors
    ///
    /// - [`TypedDataError::InvalidTypeDefinition`] if `types` declares `EIP712Domain`
    /// - [`TypedDataError::InvalidPrimaryType`] if the primary type is undeclared
    /// - [`TypedDataError::Primitive`] if the verifying contract is malformed
    pub fn validate(&self) -> TypedDataResult<()> {
        if self.types.contains_key(EIP712_DOMAIN) {
            return Err(TypedDataError::invalid_type_definition(
                "EIP712Domain is synthesized from the domain and must not be declared",
            ));
        }
        if self.primary_type != EIP712_DOMAIN && !self.types.contains_key(&self.primary_type) {
            return Err(TypedDataError::invalid_primary_type(&self.primary_type));
        }
        self.domain.verifying_contract_address()?;
        Ok(())
    }

    /// `keccak256(encodeType(primaryType))`.
    ///
    /// # Errors
    ///
    /// Returns an error if the primary type is undeclared.
    pub fn type_hash(&self) -> TypedDataResult<B256> {
        type_hash(&self.primary_type, &self.types)
    }

    /// `hashStruct(primaryType, message)`.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or any field conversion fails.
    pub fn struct_hash(&self) -> TypedDataResult<B256> {
        self.validate()?;
        hash_struct(&self.primary_type, &self.message, &self.types)
    }

    /// The signing digest. See [`hash_typed_data`].
    ///
    /// # Errors
    ///
    /// Returns an error if validation or any field conversion fails.
    pub fn signing_hash(&self) -> TypedDataResult<B256> {
        hash_typed_data(self)
    }
}

/// Compute the EIP-712 signing digest.
///
/// # Errors
///
/// Returns an error if validation or any field conversion fails. No digest is
/// produced in that case.
pub fn hash_typed_data(typed: &TypedData) -> TypedDataResult<B256> {
    typed.validate()?;

    let domain_separator = typed.domain.separator()?;
    let mut buf = Vec::with_capacity(66);
    buf.extend_from_slice(&DIGEST_PREFIX);
    buf.extend_from_slice(domain_separator.as_slice());

    if typed.primary_type != EIP712_DOMAIN {
        let message_hash = hash_struct(&typed.primary_type, &typed.message, &typed.types)?;
        buf.extend_from_slice(message_hash.as_slice());
    }

    let digest = keccak256(&buf);
    tracing::debug!(
        primary_type = %typed.primary_type,
        %domain_separator,
        %digest,
        "hashed typed data"
    );
    Ok(digest)
}

/// Check that `signature` over the typed-data digest recovers to `address`.
///
/// Accepts raw, compact and ERC-6492 wrapped signatures. Address comparison is
/// byte-wise and therefore case-insensitive.
///
/// # Errors
///
/// Returns an error if hashing fails or the signature is malformed. A
/// well-formed signature by another key yields `Ok(false)`.
pub fn verify_typed_data(
    address: &Address,
    typed: &TypedData,
    signature: &[u8],
) -> TypedDataResult<bool> {
    let digest = hash_typed_data(typed)?;
    Ok(verify_hash(address, &digest, signature)?)
}
