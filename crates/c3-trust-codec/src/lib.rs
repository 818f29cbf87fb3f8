//! # C3 Trust Codec
//!
//! A schema-driven packed binary codec. Every structured value that gets
//! hashed, signed, or parsed out of on-chain state goes through here, and the
//! bytes must match what independently written on-chain verifiers produce.
//!
//! This crate has no knowledge of chains or keys. It is pure computation over
//! byte buffers.
//!
//! ## Key Types
//!
//! - [`Schema`] - Ordered field list; field order is wire order
//! - [`FieldDescriptor`] - The type of one field
//! - [`Value`] / [`Record`] - Values to encode, or decoded values
//! - [`TypeTag`] - Append-only tags used when a schema is itself serialized
//!
//! ## Usage
//!
//! ```rust
//! use c3_trust_codec::{decode, encode, record, FieldDescriptor, Schema, Value};
//!
//! let schema = Schema::new()
//!     .field("slot", FieldDescriptor::Byte)
//!     .field("amount", FieldDescriptor::uint());
//! let value = record([("slot", Value::UInt(1)), ("amount", Value::UInt(500))]);
//!
//! let bytes = encode(&value, &schema).unwrap();
//! let (decoded, consumed) = decode(&bytes, &schema, 0).unwrap();
//! assert_eq!(decoded, value);
//! assert_eq!(consumed, 9);
//! ```

pub mod error;
pub mod packed;
mod read;
pub mod schema;
pub mod self_describing;
pub mod value;

pub use error::{CodecError, Result};
pub use packed::{decode, decode_all, encode, fixed_size, MAX_ARRAY_LEN, MAX_VARIABLE_LEN};
pub use schema::{
    decode_schema, encode_schema, FieldDescriptor, Schema, TypeTag, MAX_SCHEMA_DEPTH, TYPE_TAGS,
};
pub use self_describing::{
    decode_self_describing, encode_self_describing, hash_record, sha512_256,
};
pub use value::{record, HashValue, Record, Value};
