//! Bounds-checked slicing with explicit offsets.

use crate::error::{CodecError, Result};

/// Borrow `len` bytes starting at `offset`.
pub(crate) fn take(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let available = bytes.len().saturating_sub(offset);
    if offset > bytes.len() || available < len {
        return Err(CodecError::InsufficientBytes {
            offset,
            needed: len,
            available,
        });
    }
    Ok(&bytes[offset..offset + len])
}

/// Read a `width`-byte big-endian unsigned integer.
pub(crate) fn take_uint(bytes: &[u8], offset: usize, width: usize) -> Result<u64> {
    let raw = take(bytes, offset, width)?;
    Ok(raw.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}
