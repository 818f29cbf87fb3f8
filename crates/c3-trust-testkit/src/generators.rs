//! Proptest generators for property-based testing.

use base64::{engine::general_purpose::STANDARD, Engine};
use proptest::prelude::*;

use c3_trust::{EnvelopeHeader, Order};
use c3_trust_codec::{FieldDescriptor, HashValue, Record, Schema, Value};

/// Generate a descriptor with no nested schema.
pub fn leaf_descriptor() -> impl Strategy<Value = FieldDescriptor> {
    let fixed = prop_oneof![
        Just(FieldDescriptor::FixedAddress),
        Just(FieldDescriptor::Byte),
        Just(FieldDescriptor::Double),
        Just(FieldDescriptor::Boolean),
        Just(FieldDescriptor::EmptyString),
        Just(FieldDescriptor::uint()),
        (1u8..=8).prop_map(FieldDescriptor::uint_width),
        prop::collection::vec(any::<u8>(), 1..4).prop_map(FieldDescriptor::literal),
    ];
    let variable = prop_oneof![
        Just(FieldDescriptor::bytes()),
        (1usize..16).prop_map(FieldDescriptor::sized_bytes),
        Just(FieldDescriptor::string()),
        (1usize..16).prop_map(FieldDescriptor::sized_string),
        Just(FieldDescriptor::base64()),
        (1usize..12).prop_map(|n| FieldDescriptor::Base64Bytes { size: Some(n) }),
    ];
    prop_oneof![fixed, variable]
}

/// Generate a descriptor, nesting objects, arrays and hashes a few levels.
pub fn descriptor() -> impl Strategy<Value = FieldDescriptor> {
    leaf_descriptor().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4)
                .prop_map(|ds| FieldDescriptor::object(schema_from(ds))),
            inner.clone().prop_map(FieldDescriptor::array),
            prop::collection::vec(inner, 1..3)
                .prop_map(|ds| FieldDescriptor::hash(schema_from(ds))),
        ]
    })
}

/// Generate a schema of up to `max_fields` fields.
pub fn schema(max_fields: usize) -> impl Strategy<Value = Schema> {
    prop::collection::vec(descriptor(), 0..=max_fields).prop_map(schema_from)
}

fn schema_from(descriptors: Vec<FieldDescriptor>) -> Schema {
    descriptors
        .into_iter()
        .enumerate()
        .map(|(i, d)| (format!("f{i}"), d))
        .collect()
}

fn lowercase_text(len: usize) -> BoxedStrategy<String> {
    prop::collection::vec(b'a'..=b'z', len)
        .prop_map(|raw| raw.into_iter().map(char::from).collect())
        .boxed()
}

fn unsized_len() -> std::ops::Range<usize> {
    0..24
}

/// Generate a value that conforms to `descriptor` and decodes back to
/// itself.
///
/// `Hash` fields get digests, since decoding cannot recover a preimage.
pub fn value_for(descriptor: &FieldDescriptor) -> BoxedStrategy<Value> {
    match descriptor {
        FieldDescriptor::FixedAddress => any::<[u8; 32]>().prop_map(Value::Address).boxed(),
        FieldDescriptor::Byte => (0u64..=255).prop_map(Value::UInt).boxed(),
        FieldDescriptor::Double => (-1.0e12f64..1.0e12).prop_map(Value::Double).boxed(),
        FieldDescriptor::Boolean => any::<bool>().prop_map(Value::Boolean).boxed(),
        FieldDescriptor::EmptyString => Just(Value::Text(String::new())).boxed(),
        FieldDescriptor::VariableBytes { size } => {
            let len = size.map_or(unsized_len(), |n| n..n + 1);
            prop::collection::vec(any::<u8>(), len)
                .prop_map(Value::Bytes)
                .boxed()
        }
        FieldDescriptor::Utf8String { size } => match size {
            Some(n) => lowercase_text(*n).prop_map(Value::Text).boxed(),
            None => unsized_len()
                .prop_flat_map(lowercase_text)
                .prop_map(Value::Text)
                .boxed(),
        },
        FieldDescriptor::Base64Bytes { size } => {
            let len = size.map_or(unsized_len(), |n| n..n + 1);
            prop::collection::vec(any::<u8>(), len)
                .prop_map(|raw| Value::Base64(STANDARD.encode(raw)))
                .boxed()
        }
        FieldDescriptor::UnsignedInt { width } => {
            let width = u32::from(width.unwrap_or(8));
            let max = if width >= 8 {
                u64::MAX
            } else {
                (1u64 << (8 * width)) - 1
            };
            (0..=max).prop_map(Value::UInt).boxed()
        }
        FieldDescriptor::Object(schema) => record_for(schema).prop_map(Value::Object).boxed(),
        FieldDescriptor::Array(element) => prop::collection::vec(value_for(element), 0..4)
            .prop_map(Value::Array)
            .boxed(),
        FieldDescriptor::Hash(_) => any::<[u8; 32]>()
            .prop_map(|d| Value::Hash(HashValue::Digest(d)))
            .boxed(),
        FieldDescriptor::FixedLiteral(bytes) => Just(Value::Bytes(bytes.clone())).boxed(),
    }
}

/// Generate a record conforming to `schema`, in the shape decoding
/// produces (fixed literals omitted).
pub fn record_for(schema: &Schema) -> BoxedStrategy<Record> {
    let fields: Vec<BoxedStrategy<(String, Value)>> = schema
        .fields()
        .filter(|(_, d)| !matches!(d, FieldDescriptor::FixedLiteral(_)))
        .map(|(name, d)| {
            let name = name.to_string();
            value_for(d).prop_map(move |v| (name.clone(), v)).boxed()
        })
        .collect();
    fields
        .prop_map(|pairs| pairs.into_iter().collect::<Record>())
        .boxed()
}

/// Generate a schema together with a conforming record.
pub fn schema_and_record() -> impl Strategy<Value = (Schema, Record)> {
    schema(6).prop_flat_map(|s| {
        let record = record_for(&s);
        (Just(s), record)
    })
}

/// Generate an envelope header.
pub fn envelope_header() -> impl Strategy<Value = EnvelopeHeader> {
    (any::<[u8; 32]>(), any::<[u8; 32]>(), any::<u64>())
        .prop_map(|(target, lease, expiry)| EnvelopeHeader::new(target, lease, expiry))
}

/// Generate an order.
pub fn order() -> impl Strategy<Value = Order> {
    (
        any::<[u8; 32]>(),
        (any::<u64>(), any::<u64>()),
        (any::<u8>(), any::<u64>(), any::<u64>()),
        (any::<u8>(), any::<u64>(), any::<u64>()),
    )
        .prop_map(|(account, (nonce, expires_on), sell, buy)| Order {
            account,
            nonce,
            expires_on,
            sell_slot_id: sell.0,
            sell_amount: sell.1,
            max_borrow: sell.2,
            buy_slot_id: buy.0,
            buy_amount: buy.1,
            max_repay: buy.2,
        })
}

/// Generate operation payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use c3_trust_codec::{decode, decode_schema, encode, encode_schema};

    proptest! {
        #[test]
        fn test_codec_roundtrip((schema, record) in schema_and_record()) {
            let bytes = encode(&record, &schema).unwrap();
            let (decoded, consumed) = decode(&bytes, &schema, 0).unwrap();
            prop_assert_eq!(decoded, record);
            prop_assert_eq!(consumed, bytes.len());
        }

        #[test]
        fn test_codec_is_deterministic((schema, record) in schema_and_record()) {
            prop_assert_eq!(encode(&record, &schema).unwrap(), encode(&record, &schema).unwrap());
        }

        #[test]
        fn test_schema_roundtrip(schema in schema(6)) {
            let bytes = encode_schema(&schema).unwrap();
            prop_assert_eq!(decode_schema(&bytes).unwrap(), schema);
        }

        #[test]
        fn test_back_to_back_decoding(
            (schema, first) in schema_and_record(),
            tail in payload(16),
        ) {
            let mut bytes = encode(&first, &schema).unwrap();
            let first_len = bytes.len();
            bytes.extend_from_slice(&tail);
            let (decoded, consumed) = decode(&bytes, &schema, 0).unwrap();
            prop_assert_eq!(decoded, first);
            prop_assert_eq!(consumed, first_len);
        }
    }
}
