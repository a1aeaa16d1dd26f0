//! Property tests for EIP-712 hashing.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use proptest::prelude::*;
use serde_json::{json, Value};

use scribe_chain::typed_data::Types;
use scribe_chain::{hash_typed_data, TypedData};

use common::address;

fn types_json() -> Value {
    json!({
        "Mail": [
            { "name": "from", "type": "Person" },
            { "name": "to", "type": "Person[]" },
            { "name": "contents", "type": "string" },
            { "name": "tags", "type": "Tag[]" }
        ],
        "Person": [
            { "name": "name", "type": "string" },
            { "name": "wallet", "type": "address" }
        ],
        "Tag": [
            { "name": "label", "type": "string" },
            { "name": "weight", "type": "uint8" }
        ],
        "Unused": [
            { "name": "flag", "type": "bool" }
        ]
    })
}

fn person() -> impl Strategy<Value = Value> {
    ("[A-Za-z]{0,12}", address())
        .prop_map(|(name, wallet)| json!({ "name": name, "wallet": wallet.to_string() }))
}

fn tag() -> impl Strategy<Value = Value> {
    ("[a-z ]{0,8}", any::<u8>())
        .prop_map(|(label, weight)| json!({ "label": label, "weight": weight }))
}

fn mail() -> impl Strategy<Value = TypedData> {
    (
        person(),
        prop::collection::vec(person(), 0..3),
        ".{0,40}",
        prop::collection::vec(tag(), 0..3),
        1u64..100_000,
    )
        .prop_map(|(from, to, contents, tags, chain_id)| {
            let payload = json!({
                "types": types_json(),
                "primaryType": "Mail",
                "domain": { "name": "Ether Mail", "version": "1", "chainId": chain_id },
                "message": { "from": from, "to": to, "contents": contents, "tags": tags }
            });
            TypedData::from_json(&payload.to_string()).unwrap()
        })
}

/// The same typed data with its type map rebuilt in a shuffled insertion order.
fn with_shuffled_types() -> impl Strategy<Value = (TypedData, TypedData)> {
    mail().prop_flat_map(|typed| {
        let entries: Vec<_> = typed.types.clone().into_iter().collect();
        (Just(typed), Just(entries).prop_shuffle()).prop_map(|(typed, entries)| {
            let mut types = Types::with_capacity(entries.len());
            for (name, fields) in entries {
                types.insert(name, fields);
            }
            let shuffled = TypedData {
                types,
                ..typed.clone()
            };
            (typed, shuffled)
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn digest_ignores_type_map_order((typed, shuffled) in with_shuffled_types()) {
        let digest = hash_typed_data(&typed).unwrap();

        prop_assert_eq!(hash_typed_data(&typed).unwrap(), digest);
        prop_assert_eq!(hash_typed_data(&shuffled).unwrap(), digest);
        prop_assert_eq!(shuffled.type_hash().unwrap(), typed.type_hash().unwrap());
    }
}
