//! Error types for the packed codec.

use thiserror::Error;

/// Errors produced while encoding or decoding packed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The value (or the schema itself) does not have the shape the schema
    /// describes.
    #[error("schema mismatch at `{field}`: {reason}")]
    SchemaMismatch { field: String, reason: String },

    /// The input buffer ended before the schema was satisfied.
    #[error("insufficient bytes at offset {offset}: needed {needed}, {available} available")]
    InsufficientBytes {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A value does not fit the width or size its field declares.
    #[error("value out of range for `{field}`: {reason}")]
    FieldOutOfRange { field: String, reason: String },

    /// A serialized schema carries a type tag this build does not know.
    #[error("unknown type tag: {0}")]
    UnknownTypeTag(u8),
}

impl CodecError {
    pub(crate) fn mismatch(field: &str, reason: impl Into<String>) -> Self {
        CodecError::SchemaMismatch {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(field: &str, reason: impl Into<String>) -> Self {
        CodecError::FieldOutOfRange {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
