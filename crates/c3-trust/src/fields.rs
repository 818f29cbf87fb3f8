//! Typed field access on decoded records.

use c3_trust_codec::{CodecError, Record};

use crate::error::Result;

fn missing(name: &str, expected: &str) -> CodecError {
    CodecError::SchemaMismatch {
        field: name.to_string(),
        reason: format!("expected {expected}"),
    }
}

pub(crate) fn address(record: &Record, name: &str) -> Result<[u8; 32]> {
    record
        .get(name)
        .and_then(|v| v.as_address())
        .copied()
        .ok_or_else(|| missing(name, "address").into())
}

pub(crate) fn uint(record: &Record, name: &str) -> Result<u64> {
    record
        .get(name)
        .and_then(|v| v.as_uint())
        .ok_or_else(|| missing(name, "uint").into())
}

pub(crate) fn byte(record: &Record, name: &str) -> Result<u8> {
    let n = uint(record, name)?;
    u8::try_from(n).map_err(|_| {
        CodecError::FieldOutOfRange {
            field: name.to_string(),
            reason: format!("{n} does not fit in a byte"),
        }
        .into()
    })
}
