//! Packed encoding: schema-ordered, big-endian, no padding.
//!
//! | descriptor | wire form |
//! |---|---|
//! | `FixedAddress` | 32 bytes |
//! | `Byte`, `Boolean` | 1 byte |
//! | `Double` | 8 bytes, IEEE-754 BE |
//! | `EmptyString` | nothing |
//! | sized bytes/string/base64 | exactly `size` bytes |
//! | unsized bytes/string/base64 | 2-byte BE length, then bytes |
//! | `UnsignedInt` | `width` bytes BE (default 8) |
//! | `Object` | nested fields in schema order |
//! | `Array` | 1-byte count (max 127), then elements |
//! | `Hash` | 32-byte SHA-512/256 of the self-describing nested record |
//! | `FixedLiteral` | the literal bytes |
//!
//! Decoding takes and returns explicit offsets so fixed-shape records can be
//! read back-to-back out of one buffer.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{CodecError, Result};
use crate::read::{take, take_uint};
use crate::schema::{FieldDescriptor, Schema, DEFAULT_UINT_WIDTH, MAX_UINT_WIDTH};
use crate::self_describing::hash_record;
use crate::value::{HashValue, Record, Value};

/// Maximum element count of an `Array` field.
pub const MAX_ARRAY_LEN: usize = 127;

/// Maximum length of an unsized variable-length field.
pub const MAX_VARIABLE_LEN: usize = u16::MAX as usize;

/// Encode `record` according to `schema`.
pub fn encode(record: &Record, schema: &Schema) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_into(&mut buf, record, schema)?;
    Ok(buf)
}

/// Decode one record starting at `offset`.
///
/// Returns the record and the number of bytes consumed, so the next record
/// of a sequence starts at `offset + consumed`.
pub fn decode(bytes: &[u8], schema: &Schema, offset: usize) -> Result<(Record, usize)> {
    let (record, end) = decode_record(bytes, schema, offset)?;
    Ok((record, end - offset))
}

/// Decode a buffer holding back-to-back records of one schema.
pub fn decode_all(bytes: &[u8], schema: &Schema) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (record, consumed) = decode(bytes, schema, offset)?;
        if consumed == 0 {
            return Err(CodecError::mismatch(
                "<schema>",
                "schema consumes no bytes, cannot decode a sequence",
            ));
        }
        records.push(record);
        offset += consumed;
    }
    Ok(records)
}

/// The encoded size of `schema` if every field has a fixed size.
pub fn fixed_size(schema: &Schema) -> Option<usize> {
    schema
        .fields()
        .map(|(_, d)| descriptor_fixed_size(d))
        .sum()
}

fn descriptor_fixed_size(descriptor: &FieldDescriptor) -> Option<usize> {
    match descriptor {
        FieldDescriptor::FixedAddress | FieldDescriptor::Hash(_) => Some(32),
        FieldDescriptor::Byte | FieldDescriptor::Boolean => Some(1),
        FieldDescriptor::Double => Some(8),
        FieldDescriptor::EmptyString => Some(0),
        FieldDescriptor::VariableBytes { size }
        | FieldDescriptor::Utf8String { size }
        | FieldDescriptor::Base64Bytes { size } => *size,
        FieldDescriptor::UnsignedInt { width } => {
            Some(width.unwrap_or(DEFAULT_UINT_WIDTH) as usize)
        }
        FieldDescriptor::Object(schema) => fixed_size(schema),
        FieldDescriptor::Array(_) => None,
        FieldDescriptor::FixedLiteral(bytes) => Some(bytes.len()),
    }
}

pub(crate) fn encode_into(buf: &mut Vec<u8>, record: &Record, schema: &Schema) -> Result<()> {
    for (name, descriptor) in schema.fields() {
        encode_field(buf, name, descriptor, record.get(name))?;
    }
    Ok(())
}

fn encode_field(
    buf: &mut Vec<u8>,
    path: &str,
    descriptor: &FieldDescriptor,
    value: Option<&Value>,
) -> Result<()> {
    match (descriptor, value) {
        (FieldDescriptor::FixedLiteral(literal), value) => {
            match value {
                None => {}
                Some(Value::Bytes(b)) if b == literal => {}
                Some(_) => {
                    return Err(CodecError::mismatch(path, "value differs from fixed literal"))
                }
            }
            buf.extend_from_slice(literal);
            Ok(())
        }
        (FieldDescriptor::EmptyString, None) => Ok(()),
        (_, Some(value)) => encode_value(buf, path, descriptor, value),
        (_, None) => Err(CodecError::mismatch(path, "missing value")),
    }
}

fn encode_value(
    buf: &mut Vec<u8>,
    path: &str,
    descriptor: &FieldDescriptor,
    value: &Value,
) -> Result<()> {
    match (descriptor, value) {
        (FieldDescriptor::FixedAddress, Value::Address(bytes)) => {
            buf.extend_from_slice(bytes);
        }
        (FieldDescriptor::Byte, Value::UInt(n)) => {
            let byte = u8::try_from(*n).map_err(|_| {
                CodecError::out_of_range(path, format!("{n} does not fit in a byte"))
            })?;
            buf.push(byte);
        }
        (FieldDescriptor::Double, Value::Double(f)) => {
            buf.extend_from_slice(&f.to_be_bytes());
        }
        (FieldDescriptor::Boolean, Value::Boolean(b)) => {
            buf.push(u8::from(*b));
        }
        (FieldDescriptor::EmptyString, Value::Text(s)) => {
            if !s.is_empty() {
                return Err(CodecError::mismatch(path, "empty-string field holds text"));
            }
        }
        (FieldDescriptor::VariableBytes { size }, Value::Bytes(bytes)) => {
            write_sized(buf, path, *size, bytes)?;
        }
        (FieldDescriptor::Utf8String { size }, Value::Text(s)) => {
            write_sized(buf, path, *size, s.as_bytes())?;
        }
        (FieldDescriptor::Base64Bytes { size }, Value::Base64(text)) => {
            let bytes = STANDARD
                .decode(text)
                .map_err(|e| CodecError::mismatch(path, format!("invalid base64: {e}")))?;
            write_sized(buf, path, *size, &bytes)?;
        }
        (FieldDescriptor::UnsignedInt { width }, Value::UInt(n)) => {
            let width = checked_width(path, *width)?;
            if width < 8 && *n >> (8 * width) != 0 {
                return Err(CodecError::out_of_range(
                    path,
                    format!("{n} does not fit in {width} bytes"),
                ));
            }
            buf.extend_from_slice(&n.to_be_bytes()[8 - width..]);
        }
        (FieldDescriptor::Object(schema), Value::Object(record)) => {
            encode_into(buf, record, schema)?;
        }
        (FieldDescriptor::Array(element), Value::Array(items)) => {
            if items.len() > MAX_ARRAY_LEN {
                return Err(CodecError::out_of_range(
                    path,
                    format!("{} elements, at most {MAX_ARRAY_LEN} allowed", items.len()),
                ));
            }
            buf.push(items.len() as u8);
            for item in items {
                encode_field(buf, path, element, Some(item))?;
            }
        }
        (FieldDescriptor::Hash(schema), Value::Hash(hash)) => match hash {
            HashValue::Preimage(record) => buf.extend_from_slice(&hash_record(record, schema)?),
            HashValue::Digest(digest) => buf.extend_from_slice(digest),
        },
        (descriptor, value) => {
            return Err(CodecError::mismatch(
                path,
                format!(
                    "{:?} field cannot hold a {} value",
                    descriptor.type_tag(),
                    value.kind()
                ),
            ));
        }
    }
    Ok(())
}

fn write_sized(buf: &mut Vec<u8>, path: &str, size: Option<usize>, bytes: &[u8]) -> Result<()> {
    match checked_size(path, size)? {
        Some(size) => {
            if bytes.len() != size {
                return Err(CodecError::out_of_range(
                    path,
                    format!("expected exactly {size} bytes, got {}", bytes.len()),
                ));
            }
        }
        None => {
            let len = u16::try_from(bytes.len()).map_err(|_| {
                CodecError::out_of_range(
                    path,
                    format!("{} bytes exceeds {MAX_VARIABLE_LEN}", bytes.len()),
                )
            })?;
            buf.extend_from_slice(&len.to_be_bytes());
        }
    }
    buf.extend_from_slice(bytes);
    Ok(())
}

fn checked_size(path: &str, size: Option<usize>) -> Result<Option<usize>> {
    match size {
        Some(0) => Err(CodecError::mismatch(path, "declared size must be positive")),
        size => Ok(size),
    }
}

fn checked_width(path: &str, width: Option<u8>) -> Result<usize> {
    match width.unwrap_or(DEFAULT_UINT_WIDTH) {
        w @ 1..=MAX_UINT_WIDTH => Ok(w as usize),
        w => Err(CodecError::mismatch(
            path,
            format!("integer width {w} outside 1..={MAX_UINT_WIDTH}"),
        )),
    }
}

pub(crate) fn decode_record(
    bytes: &[u8],
    schema: &Schema,
    offset: usize,
) -> Result<(Record, usize)> {
    let mut record = Record::new();
    let mut pos = offset;
    for (name, descriptor) in schema.fields() {
        let (value, next) = decode_value(bytes, name, descriptor, pos)?;
        pos = next;
        if !matches!(descriptor, FieldDescriptor::FixedLiteral(_)) {
            record.insert(name.to_string(), value);
        }
    }
    Ok((record, pos))
}

fn decode_value(
    bytes: &[u8],
    path: &str,
    descriptor: &FieldDescriptor,
    offset: usize,
) -> Result<(Value, usize)> {
    Ok(match descriptor {
        FieldDescriptor::FixedAddress => {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(take(bytes, offset, 32)?);
            (Value::Address(arr), offset + 32)
        }
        FieldDescriptor::Byte => (Value::UInt(u64::from(take(bytes, offset, 1)?[0])), offset + 1),
        FieldDescriptor::Double => {
            let mut arr = [0u8; 8];
            arr.copy_from_slice(take(bytes, offset, 8)?);
            (Value::Double(f64::from_be_bytes(arr)), offset + 8)
        }
        FieldDescriptor::Boolean => {
            let b = match take(bytes, offset, 1)?[0] {
                0 => false,
                1 => true,
                other => {
                    return Err(CodecError::mismatch(
                        path,
                        format!("boolean byte must be 0 or 1, got {other}"),
                    ))
                }
            };
            (Value::Boolean(b), offset + 1)
        }
        FieldDescriptor::EmptyString => (Value::Text(String::new()), offset),
        FieldDescriptor::VariableBytes { size } => {
            let (raw, next) = read_sized(bytes, path, *size, offset)?;
            (Value::Bytes(raw.to_vec()), next)
        }
        FieldDescriptor::Utf8String { size } => {
            let (raw, next) = read_sized(bytes, path, *size, offset)?;
            let text = std::str::from_utf8(raw)
                .map_err(|_| CodecError::mismatch(path, "text is not valid UTF-8"))?;
            (Value::Text(text.to_string()), next)
        }
        FieldDescriptor::Base64Bytes { size } => {
            let (raw, next) = read_sized(bytes, path, *size, offset)?;
            (Value::Base64(STANDARD.encode(raw)), next)
        }
        FieldDescriptor::UnsignedInt { width } => {
            let width = checked_width(path, *width)?;
            (Value::UInt(take_uint(bytes, offset, width)?), offset + width)
        }
        FieldDescriptor::Object(schema) => {
            let (record, next) = decode_record(bytes, schema, offset)?;
            (Value::Object(record), next)
        }
        FieldDescriptor::Array(element) => {
            let count = take(bytes, offset, 1)?[0] as usize;
            if count > MAX_ARRAY_LEN {
                return Err(CodecError::out_of_range(
                    path,
                    format!("array count {count} exceeds {MAX_ARRAY_LEN}"),
                ));
            }
            let mut items = Vec::with_capacity(count);
            let mut pos = offset + 1;
            for _ in 0..count {
                let (item, next) = decode_value(bytes, path, element, pos)?;
                items.push(item);
                pos = next;
            }
            (Value::Array(items), pos)
        }
        FieldDescriptor::Hash(_) => {
            let mut digest = [0u8; 32];
            digest.copy_from_slice(take(bytes, offset, 32)?);
            (Value::Hash(HashValue::Digest(digest)), offset + 32)
        }
        FieldDescriptor::FixedLiteral(literal) => {
            let raw = take(bytes, offset, literal.len())?;
            if raw != literal.as_slice() {
                return Err(CodecError::mismatch(
                    path,
                    format!(
                        "expected literal {}, found {}",
                        hex::encode(literal),
                        hex::encode(raw)
                    ),
                ));
            }
            (Value::Bytes(literal.clone()), offset + literal.len())
        }
    })
}

fn read_sized<'a>(
    bytes: &'a [u8],
    path: &str,
    size: Option<usize>,
    offset: usize,
) -> Result<(&'a [u8], usize)> {
    match checked_size(path, size)? {
        Some(size) => Ok((take(bytes, offset, size)?, offset + size)),
        None => {
            let len = take_uint(bytes, offset, 2)? as usize;
            Ok((take(bytes, offset + 2, len)?, offset + 2 + len))
        }
    }
}
