//! Values carried by packed schemas.

use std::collections::BTreeMap;

/// A decoded (or to-be-encoded) record: field name to value.
///
/// Wire order comes from the schema, never from the record, so a sorted map
/// is used for stable equality.
pub type Record = BTreeMap<String, Value>;

/// Build a [`Record`] from `(name, value)` pairs.
pub fn record<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Record {
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 32 raw bytes, for `FixedAddress` fields.
    Address([u8; 32]),
    /// An unsigned integer, for `Byte` and `UnsignedInt` fields.
    UInt(u64),
    /// For `Double` fields.
    Double(f64),
    /// For `Boolean` fields.
    Boolean(bool),
    /// For `VariableBytes` fields.
    Bytes(Vec<u8>),
    /// For `Utf8String` and `EmptyString` fields.
    Text(String),
    /// Base64 text, for `Base64Bytes` fields. The wire carries the decoded
    /// bytes; decoding yields standard padded base64.
    Base64(String),
    /// For `Object` fields.
    Object(Record),
    /// For `Array` fields.
    Array(Vec<Value>),
    /// For `Hash` fields.
    Hash(HashValue),
}

/// The value of a `Hash` field.
///
/// Encoding accepts either the committed record or an already-computed
/// digest. Decoding can only recover the digest.
#[derive(Debug, Clone, PartialEq)]
pub enum HashValue {
    /// The record to commit to.
    Preimage(Record),
    /// A 32-byte commitment.
    Digest([u8; 32]),
}

impl Value {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Address(_) => "address",
            Value::UInt(_) => "uint",
            Value::Double(_) => "double",
            Value::Boolean(_) => "boolean",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Base64(_) => "base64",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::Hash(_) => "hash",
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::UInt(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&[u8; 32]> {
        match self {
            Value::Address(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Base64(s) => Some(s),
            _ => None,
        }
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInt(n)
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Value::UInt(u64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<[u8; 32]> for Value {
    fn from(bytes: [u8; 32]) -> Self {
        Value::Address(bytes)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Object(r)
    }
}
