//! Self-describing blobs and hash commitments.
//!
//! A self-describing blob carries its own schema so it stays decodable after
//! the schema that produced it has evolved:
//!
//! ```text
//! [8-byte BE schema length][serialized schema][packed data]
//! ```
//!
//! `Hash` fields commit to the SHA-512/256 digest of such a blob. SHA-512/256
//! is the hash the on-chain verifier computes natively.

use sha2::{Digest, Sha512_256};

use crate::error::{CodecError, Result};
use crate::packed::{decode, encode_into};
use crate::read::{take, take_uint};
use crate::schema::{decode_schema, encode_schema, Schema};
use crate::value::Record;

/// Width of the schema length prefix.
pub const SCHEMA_LENGTH_BYTES: usize = 8;

/// Encode `record` together with its schema.
pub fn encode_self_describing(record: &Record, schema: &Schema) -> Result<Vec<u8>> {
    let schema_bytes = encode_schema(schema)?;
    let mut buf = Vec::with_capacity(SCHEMA_LENGTH_BYTES + schema_bytes.len());
    buf.extend_from_slice(&(schema_bytes.len() as u64).to_be_bytes());
    buf.extend_from_slice(&schema_bytes);
    encode_into(&mut buf, record, schema)?;
    Ok(buf)
}

/// Decode a self-describing blob starting at `offset`.
///
/// Returns the embedded schema, the record, and the bytes consumed.
pub fn decode_self_describing(bytes: &[u8], offset: usize) -> Result<(Schema, Record, usize)> {
    let schema_len = take_uint(bytes, offset, SCHEMA_LENGTH_BYTES)?;
    let schema_len = usize::try_from(schema_len).map_err(|_| {
        CodecError::out_of_range("<schema>", format!("schema length {schema_len} too large"))
    })?;
    let schema_start = offset + SCHEMA_LENGTH_BYTES;
    let schema = decode_schema(take(bytes, schema_start, schema_len)?)?;

    let data_start = schema_start + schema_len;
    let (record, consumed) = decode(bytes, &schema, data_start)?;
    Ok((schema, record, data_start + consumed - offset))
}

/// The 32-byte commitment to `record` under `schema`.
pub fn hash_record(record: &Record, schema: &Schema) -> Result<[u8; 32]> {
    let blob = encode_self_describing(record, schema)?;
    Ok(sha512_256(&blob))
}

/// SHA-512/256 of `data`.
pub fn sha512_256(data: &[u8]) -> [u8; 32] {
    Sha512_256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, TypeTag};
    use crate::value::{record, Value};

    fn schema() -> Schema {
        Schema::new()
            .field("owner", FieldDescriptor::FixedAddress)
            .field("amount", FieldDescriptor::uint_width(4))
    }

    #[test]
    fn test_blob_layout() {
        let r = record([
            ("owner", Value::Address([0x22; 32])),
            ("amount", Value::UInt(5)),
        ]);
        let blob = encode_self_describing(&r, &schema()).unwrap();
        let schema_bytes = encode_schema(&schema()).unwrap();

        assert_eq!(&blob[..8], &(schema_bytes.len() as u64).to_be_bytes());
        assert_eq!(&blob[8..8 + schema_bytes.len()], schema_bytes.as_slice());
        assert_eq!(blob.len(), 8 + schema_bytes.len() + 32 + 4);
    }

    #[test]
    fn test_blob_roundtrip_without_schema() {
        let r = record([
            ("owner", Value::Address([0x33; 32])),
            ("amount", Value::UInt(77)),
        ]);
        let blob = encode_self_describing(&r, &schema()).unwrap();

        let (decoded_schema, decoded, consumed) = decode_self_describing(&blob, 0).unwrap();
        assert_eq!(decoded_schema, schema());
        assert_eq!(decoded, r);
        assert_eq!(consumed, blob.len());
    }

    #[test]
    fn test_hash_depends_on_schema() {
        let r = record([
            ("owner", Value::Address([0x33; 32])),
            ("amount", Value::UInt(77)),
        ]);
        let wider = Schema::new()
            .field("owner", FieldDescriptor::FixedAddress)
            .field("amount", FieldDescriptor::uint());

        let h1 = hash_record(&r, &schema()).unwrap();
        let h2 = hash_record(&r, &wider).unwrap();
        assert_ne!(h1, h2);
        assert_eq!(h1, hash_record(&r, &schema()).unwrap());
    }

    #[test]
    fn test_sha512_256_known_vector() {
        assert_eq!(
            hex::encode(sha512_256(b"abc")),
            "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
        );
    }

    #[test]
    fn test_deeply_nested_blob_is_an_error() {
        let mut schema_bytes = vec![1, 1, b'x'];
        schema_bytes.extend(std::iter::repeat(TypeTag::Object.to_u8()).take(50_000));
        let mut blob = (schema_bytes.len() as u64).to_be_bytes().to_vec();
        blob.extend_from_slice(&schema_bytes);

        assert!(matches!(
            decode_self_describing(&blob, 0),
            Err(CodecError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_offset_past_end() {
        assert!(matches!(
            decode_self_describing(&[0u8; 4], 9),
            Err(CodecError::InsufficientBytes { .. })
        ));
    }
}
