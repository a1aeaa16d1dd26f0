//! EIP-712 type encoding and struct hashing.
//!
//! - `encodeType`: the primary type's signature followed by every
//!   transitively referenced struct type, sorted by name
//! - `hashStruct`: `keccak256(typeHash ‖ encodeData(fields...))`
//!
//! Leaf values are converted from JSON and written as 32-byte ABI words.
//! Dynamic values (`string`, `bytes`, arrays, structs) are replaced by their
//! hash.

use std::collections::{BTreeSet, HashMap};

use alloy_primitives::{keccak256, Sign, B256, I256, U256};
use serde_json::{Map, Value};

use scribe_core::abi::{encode_address, encode_bool, encode_fixed_bytes, encode_int, encode_uint};
use scribe_core::error::{TypedDataError, TypedDataResult};
use scribe_core::primitives::{decode_hex, parse_address, parse_u256};

use super::TypedDataField;

/// Struct definitions keyed by type name.
pub type Types = HashMap<String, Vec<TypedDataField>>;

/// Strip every array suffix: `Person[][3]` becomes `Person`.
#[must_use]
pub fn base_type(ty: &str) -> &str {
    ty.split('[').next().unwrap_or(ty)
}

/// Every struct type reachable from `primary`, including `primary` itself.
///
/// Names that are not keys of `types` are leaf ABI types and end the walk.
#[must_use]
pub fn find_dependencies(primary: &str, types: &Types) -> BTreeSet<String> {
    collect_dependencies(primary, types, BTreeSet::new())
}

fn collect_dependencies(ty: &str, types: &Types, found: BTreeSet<String>) -> BTreeSet<String> {
    let name = base_type(ty);
    let Some(fields) = types.get(name) else {
        return found;
    };
    if found.contains(name) {
        return found;
    }

    let mut found = found;
    found.insert(name.to_string());
    fields
        .iter()
        .fold(found, |acc, field| collect_dependencies(&field.ty, types, acc))
}

fn type_signature(name: &str, fields: &[TypedDataField]) -> String {
    let members = fields
        .iter()
        .map(|field| format!("{} {}", field.ty, field.name))
        .collect::<Vec<_>>()
        .join(",");
    format!("{name}({members})")
}

/// `encodeType(primary)`.
///
/// ```
/// use scribe_chain::typed_data::{encode_type, TypedDataField, Types};
///
/// let mut types = Types::new();
/// types.insert("Mail".into(), vec![
///     TypedDataField::new("from", "Person"),
///     TypedDataField::new("contents", "string"),
/// ]);
/// types.insert("Person".into(), vec![TypedDataField::new("wallet", "address")]);
///
/// assert_eq!(
///     encode_type("Mail", &types).unwrap(),
///     "Mail(Person from,string contents)Person(address wallet)"
/// );
/// ```
///
/// # Errors
///
/// Returns [`TypedDataError::InvalidPrimaryType`] if `primary` is not in `types`.
pub fn encode_type(primary: &str, types: &Types) -> TypedDataResult<String> {
    let fields = types
        .get(primary)
        .ok_or_else(|| TypedDataError::invalid_primary_type(primary))?;

    let mut dependencies = find_dependencies(primary, types);
    dependencies.remove(primary);

    let mut out = type_signature(primary, fields);
    for name in &dependencies {
        if let Some(fields) = types.get(name) {
            out.push_str(&type_signature(name, fields));
        }
    }
    Ok(out)
}

/// `keccak256(encodeType(primary))`.
///
/// # Errors
///
/// See [`encode_type`].
pub fn type_hash(primary: &str, types: &Types) -> TypedDataResult<B256> {
    Ok(keccak256(encode_type(primary, types)?))
}

/// `hashStruct(name, data)`.
///
/// Message keys that are not declared fields are ignored.
///
/// # Errors
///
/// Returns [`TypedDataError::InvalidField`] for a missing or unconvertible
/// value and [`TypedDataError::InvalidTypeDefinition`] for an unknown leaf type.
pub fn hash_struct(name: &str, data: &Map<String, Value>, types: &Types) -> TypedDataResult<B256> {
    let fields = types
        .get(name)
        .ok_or_else(|| TypedDataError::invalid_primary_type(name))?;

    let mut buf = Vec::with_capacity(32 * (fields.len() + 1));
    buf.extend_from_slice(type_hash(name, types)?.as_slice());
    for field in fields {
        let path = format!("{name}.{}", field.name);
        let value = data
            .get(&field.name)
            .ok_or_else(|| TypedDataError::invalid_field(&path, "missing value"))?;
        buf.extend_from_slice(&encode_field(&field.ty, value, types, &path)?);
    }
    Ok(keccak256(buf))
}

/// Encode one member value as a 32-byte word.
///
/// # Errors
///
/// See [`hash_struct`].
pub fn encode_field(
    ty: &str,
    value: &Value,
    types: &Types,
    path: &str,
) -> TypedDataResult<[u8; 32]> {
    if let Some((element, length)) = split_array(ty) {
        let items = value
            .as_array()
            .ok_or_else(|| TypedDataError::invalid_field(path, "expected an array"))?;
        if let Some(length) = length.transpose().map_err(|_| {
            TypedDataError::invalid_type_definition(format!("bad array length in {ty}"))
        })? {
            if items.len() != length {
                return Err(TypedDataError::invalid_field(
                    path,
                    format!("expected {length} elements, got {}", items.len()),
                ));
            }
        }

        let mut buf = Vec::with_capacity(32 * items.len());
        for (index, item) in items.iter().enumerate() {
            let path = format!("{path}[{index}]");
            buf.extend_from_slice(&encode_field(element, item, types, &path)?);
        }
        return Ok(keccak256(buf).0);
    }

    if types.contains_key(ty) {
        let data = value
            .as_object()
            .ok_or_else(|| TypedDataError::invalid_field(path, "expected an object"))?;
        return Ok(hash_struct(ty, data, types)?.0);
    }

    encode_leaf(ty, value, path)
}

/// Split `T[]` / `T[N]` into `T` and the optional length text.
fn split_array(ty: &str) -> Option<(&str, Option<Result<usize, std::num::ParseIntError>>)> {
    let inner = ty.strip_suffix(']')?;
    let open = inner.rfind('[')?;
    let length = &inner[open + 1..];
    let length = (!length.is_empty()).then(|| length.parse::<usize>());
    Some((&inner[..open], length))
}

fn encode_leaf(ty: &str, value: &Value, path: &str) -> TypedDataResult<[u8; 32]> {
    match ty {
        "string" => {
            let text = value
                .as_str()
                .ok_or_else(|| TypedDataError::invalid_field(path, "expected a string"))?;
            Ok(keccak256(text.as_bytes()).0)
        }
        "bytes" => Ok(keccak256(hex_value(value, path)?).0),
        "bool" => match value {
            Value::Bool(flag) => Ok(encode_bool(*flag)),
            Value::String(text) if text == "true" || text == "false" => {
                Ok(encode_bool(text == "true"))
            }
            _ => Err(TypedDataError::invalid_field(path, "expected a boolean")),
        },
        "address" => {
            let text = value
                .as_str()
                .ok_or_else(|| TypedDataError::invalid_field(path, "expected an address string"))?;
            let address = parse_address(text)
                .map_err(|e| TypedDataError::invalid_field(path, e.to_string()))?;
            Ok(encode_address(&address))
        }
        _ => {
            if let Some(size) = ty.strip_prefix("bytes") {
                let size = parse_width(ty, size, 1, 32)?;
                let bytes = hex_value(value, path)?;
                if bytes.len() != size {
                    return Err(TypedDataError::invalid_field(
                        path,
                        format!("expected {size} bytes, got {}", bytes.len()),
                    ));
                }
                return encode_fixed_bytes(&bytes)
                    .ok_or_else(|| TypedDataError::invalid_field(path, "value exceeds 32 bytes"));
            }
            if let Some(bits) = ty.strip_prefix("uint") {
                let bits = parse_int_width(ty, bits)?;
                return Ok(encode_uint(uint_value(value, bits, path)?));
            }
            if let Some(bits) = ty.strip_prefix("int") {
                let bits = parse_int_width(ty, bits)?;
                return Ok(encode_int(int_value(value, bits, path)?));
            }
            Err(TypedDataError::invalid_type_definition(format!(
                "unknown type {ty:?} at {path}"
            )))
        }
    }
}

fn parse_width(ty: &str, digits: &str, min: usize, max: usize) -> TypedDataResult<usize> {
    digits
        .parse::<usize>()
        .ok()
        .filter(|width| (min..=max).contains(width))
        .ok_or_else(|| TypedDataError::invalid_type_definition(format!("unknown type {ty:?}")))
}

/// `uint`/`int` widths: a multiple of 8 up to 256. A bare `uint` is 256 bits.
fn parse_int_width(ty: &str, digits: &str) -> TypedDataResult<usize> {
    if digits.is_empty() {
        return Ok(256);
    }
    let bits = parse_width(ty, digits, 8, 256)?;
    if bits % 8 == 0 {
        Ok(bits)
    } else {
        Err(TypedDataError::invalid_type_definition(format!(
            "unknown type {ty:?}"
        )))
    }
}

fn hex_value(value: &Value, path: &str) -> TypedDataResult<Vec<u8>> {
    let text = value
        .as_str()
        .ok_or_else(|| TypedDataError::invalid_field(path, "expected a hex string"))?;
    decode_hex(text).map_err(|e| TypedDataError::invalid_field(path, e.to_string()))
}

fn uint_value(value: &Value, bits: usize, path: &str) -> TypedDataResult<U256> {
    let parsed = match value {
        Value::Number(number) => number.as_u64().map(U256::from),
        Value::String(text) => parse_u256(text).ok(),
        _ => None,
    }
    .ok_or_else(|| TypedDataError::invalid_field(path, "expected an unsigned integer"))?;

    if bits < 256 && parsed >= U256::from(1u8) << bits {
        return Err(TypedDataError::invalid_field(
            path,
            format!("{parsed} does not fit in uint{bits}"),
        ));
    }
    Ok(parsed)
}

fn int_value(value: &Value, bits: usize, path: &str) -> TypedDataResult<I256> {
    let parsed = match value {
        Value::Number(number) => number.as_i64().and_then(|n| {
            let sign = if n < 0 { Sign::Negative } else { Sign::Positive };
            I256::checked_from_sign_and_abs(sign, U256::from(n.unsigned_abs()))
        }),
        Value::String(text) => {
            let (sign, magnitude) = match text.trim().strip_prefix('-') {
                Some(rest) => (Sign::Negative, rest),
                None => (Sign::Positive, text.as_str()),
            };
            parse_u256(magnitude)
                .ok()
                .and_then(|abs| I256::checked_from_sign_and_abs(sign, abs))
        }
        _ => None,
    }
    .ok_or_else(|| TypedDataError::invalid_field(path, "expected a signed integer"))?;

    if bits < 256 {
        let bound = I256::from_raw(U256::from(1u8) << (bits - 1));
        if parsed < -bound || parsed >= bound {
            return Err(TypedDataError::invalid_field(
                path,
                format!("{parsed} does not fit in int{bits}"),
            ));
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use alloy_primitives::b256;
    use serde_json::json;

    fn mail_types() -> Types {
        let mut types = Types::new();
        types.insert(
            "Person".to_string(),
            vec![
                TypedDataField::new("name", "string"),
                TypedDataField::new("wallet", "address"),
            ],
        );
        types.insert(
            "Mail".to_string(),
            vec![
                TypedDataField::new("from", "Person"),
                TypedDataField::new("to", "Person"),
                TypedDataField::new("contents", "string"),
            ],
        );
        types
    }

    // ------------------------------------------------------------------------
    // encodeType
    // ------------------------------------------------------------------------

    #[test]
    fn test_encode_type_mail() {
        assert_eq!(
            encode_type("Mail", &mail_types()).unwrap(),
            "Mail(Person from,Person to,string contents)Person(string name,address wallet)"
        );
    }

    #[test]
    fn test_type_hashes() {
        let types = mail_types();
        assert_eq!(
            type_hash("Mail", &types).unwrap(),
            b256!("a0cedeb2dc280ba39b857546d74f5549c3a1d7bdc2dd96bf881f76108e23dac2")
        );
        assert_eq!(
            type_hash("Person", &types).unwrap(),
            b256!("b9d8c78acf9b987311de6c7b45bb6a9c8e1bf361fa7fd3467a2163f994c79500")
        );
    }

    #[test]
    fn test_dependencies_sorted_and_through_arrays() {
        let mut types = Types::new();
        types.insert(
            "Root".to_string(),
            vec![
                TypedDataField::new("zs", "Zebra[]"),
                TypedDataField::new("a", "Apple[2]"),
            ],
        );
        types.insert("Zebra".to_string(), vec![TypedDataField::new("a", "Apple")]);
        types.insert("Apple".to_string(), vec![TypedDataField::new("x", "uint8")]);
        types.insert("Unused".to_string(), vec![TypedDataField::new("x", "bool")]);

        let deps = find_dependencies("Root", &types);
        assert_eq!(
            deps.into_iter().collect::<Vec<_>>(),
            vec!["Apple", "Root", "Zebra"]
        );
        assert_eq!(
            encode_type("Root", &types).unwrap(),
            "Root(Zebra[] zs,Apple[2] a)Apple(uint8 x)Zebra(Apple a)"
        );
    }

    #[test]
    fn test_recursive_type_terminates() {
        let mut types = Types::new();
        types.insert(
            "Node".to_string(),
            vec![
                TypedDataField::new("value", "uint256"),
                TypedDataField::new("children", "Node[]"),
            ],
        );
        assert_eq!(
            encode_type("Node", &types).unwrap(),
            "Node(uint256 value,Node[] children)"
        );
    }

    #[test]
    fn test_unknown_primary_type() {
        assert_eq!(
            encode_type("Letter", &mail_types()),
            Err(TypedDataError::invalid_primary_type("Letter"))
        );
    }

    // ------------------------------------------------------------------------
    // hashStruct
    // ------------------------------------------------------------------------

    #[test]
    fn test_hash_struct_mail() {
        let message = json!({
            "from": { "name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826" },
            "to": { "name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB" },
            "contents": "Hello, Bob!"
        });
        assert_eq!(
            hash_struct("Mail", message.as_object().unwrap(), &mail_types()).unwrap(),
            b256!("c52c0ee5d84264471806290a3f2c4cecfc5490626bf912d01f240d7a274b371e")
        );
    }

    #[test]
    fn test_missing_field_names_path() {
        let message = json!({ "name": "Cow" });
        let err = hash_struct("Person", message.as_object().unwrap(), &mail_types()).unwrap_err();
        assert_eq!(err, TypedDataError::invalid_field("Person.wallet", "missing value"));
    }

    // ------------------------------------------------------------------------
    // Leaf encoding
    // ------------------------------------------------------------------------

    #[test]
    fn test_uint_range_checked() {
        let types = Types::new();
        assert!(encode_field("uint8", &json!(255), &types, "x").is_ok());
        assert!(encode_field("uint8", &json!(256), &types, "x").is_err());
        assert!(encode_field("uint256", &json!("0xff"), &types, "x").is_ok());
        assert!(encode_field("uint", &json!("12345678901234567890123"), &types, "x").is_ok());
        assert!(encode_field("uint8", &json!(-1), &types, "x").is_err());
    }

    #[test]
    fn test_int_two_complement() {
        let types = Types::new();
        assert_eq!(encode_field("int8", &json!(-1), &types, "x").unwrap(), [0xff; 32]);
        assert_eq!(encode_field("int16", &json!("-128"), &types, "x").unwrap()[31], 0x80);
        assert!(encode_field("int8", &json!(-129), &types, "x").is_err());
        assert!(encode_field("int8", &json!(128), &types, "x").is_err());
        assert!(encode_field("int8", &json!(127), &types, "x").is_ok());
    }

    #[test]
    fn test_fixed_bytes_exact_length() {
        let types = Types::new();
        let word = encode_field("bytes4", &json!("0xdeadbeef"), &types, "x").unwrap();
        assert_eq!(&word[..4], &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(&word[4..], &[0u8; 28]);

        assert!(encode_field("bytes4", &json!("0xdead"), &types, "x").is_err());
        assert!(encode_field("bytes33", &json!("0x00"), &types, "x").is_err());
    }

    #[test]
    fn test_dynamic_values_are_hashed() {
        let types = Types::new();
        assert_eq!(
            encode_field("string", &json!("abc"), &types, "x").unwrap(),
            keccak256("abc").0
        );
        assert_eq!(
            encode_field("bytes", &json!("0x616263"), &types, "x").unwrap(),
            keccak256("abc").0
        );
    }

    #[test]
    fn test_arrays() {
        let types = Types::new();
        let words = [encode_bool(true), encode_bool(false)].concat();
        assert_eq!(
            encode_field("bool[]", &json!([true, false]), &types, "x").unwrap(),
            keccak256(words).0
        );
        assert_eq!(
            encode_field("bool[2]", &json!([true]), &types, "flags").unwrap_err(),
            TypedDataError::invalid_field("flags", "expected 2 elements, got 1")
        );
        assert!(encode_field("uint8[][]", &json!([[1], [2, 3]]), &types, "x").is_ok());
    }

    #[test]
    fn test_wrong_json_kind_rejected() {
        let types = mail_types();
        assert!(encode_field("address", &json!(5), &types, "x").is_err());
        assert!(encode_field("address", &json!("0x1234"), &types, "x").is_err());
        assert!(encode_field("Person", &json!("Cow"), &types, "x").is_err());
        assert!(matches!(
            encode_field("fixed128x18", &json!(1), &types, "x"),
            Err(TypedDataError::InvalidTypeDefinition { .. })
        ));
    }
}
