//! The EVM family (secp256k1).
//!
//! Addresses are `0x` + 40 hex characters with EIP-55 checksum casing. The
//! venue represents an EVM account as its 20-byte address left-padded with
//! twelve zero bytes to 32 bytes.
//!
//! Wallets sign with `personal_sign`: the message is prefixed with
//! `"\x19Ethereum Signed Message:\n" + decimal length`, hashed with
//! Keccak-256, and signed as a 65-byte `r || s || v` recoverable signature.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};

use crate::error::{AddressError, Result, SignatureError};

pub const NAME: &str = "evm";

/// Prefix applied by `personal_sign` before hashing.
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Length of a recoverable signature.
pub const SIGNATURE_LEN: usize = 65;

/// Leading zero bytes of a padded EVM public key.
pub const PADDING_LEN: usize = 12;

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// EIP-55 checksum casing of a raw address.
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_address(address: &str) -> Result<[u8; 20]> {
    let body = address
        .strip_prefix("0x")
        .filter(|body| body.len() == 40)
        .ok_or_else(|| AddressError::malformed(NAME, address))?;
    let bytes = hex::decode(body).map_err(|_| AddressError::malformed(NAME, address))?;
    let mut raw = [0u8; 20];
    raw.copy_from_slice(&bytes);
    Ok(raw)
}

/// Return the checksum-cased spelling.
///
/// All-lowercase and all-uppercase input carries no checksum and is accepted
/// as is. Mixed-case input must already match the EIP-55 casing.
pub fn canonicalize(address: &str) -> Result<String> {
    let raw = parse_address(address)?;
    let checksummed = to_checksum_address(&raw);

    let body = &address[2..];
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && has_lower && body != &checksummed[2..] {
        return Err(AddressError::ChecksumMismatch {
            chain: NAME,
            address: address.to_string(),
        });
    }
    Ok(checksummed)
}

pub fn validate_address(address: &str) -> bool {
    canonicalize(address).is_ok()
}

/// The zero-padded 32-byte key for an address.
pub fn public_key_of(address: &str) -> Result<[u8; 32]> {
    canonicalize(address)?;
    let raw = parse_address(address)?;
    let mut key = [0u8; 32];
    key[PADDING_LEN..].copy_from_slice(&raw);
    Ok(key)
}

/// The checksum-cased address for a zero-padded 32-byte key.
pub fn address_of(public_key: &[u8; 32]) -> Result<String> {
    if public_key[..PADDING_LEN].iter().any(|b| *b != 0) {
        return Err(AddressError::InvalidPublicKey {
            chain: NAME,
            reason: "first 12 bytes must be zero".into(),
        });
    }
    let mut raw = [0u8; 20];
    raw.copy_from_slice(&public_key[PADDING_LEN..]);
    Ok(to_checksum_address(&raw))
}

/// `personal_sign` preamble for a payload of `payload_len` bytes.
pub fn domain_prefix(payload_len: usize) -> Vec<u8> {
    format!("{PERSONAL_MESSAGE_PREFIX}{payload_len}").into_bytes()
}

/// The digest a `personal_sign` wallet signs for `message`.
pub fn personal_message_hash(message: &[u8]) -> [u8; 32] {
    let mut data = domain_prefix(message.len());
    data.extend_from_slice(message);
    keccak256(&data)
}

/// The address owning an uncompressed secp256k1 key.
pub fn address_from_verifying_key(key: &VerifyingKey) -> [u8; 20] {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut raw = [0u8; 20];
    raw.copy_from_slice(&hash[12..]);
    raw
}

/// Recover the signer address of a `personal_sign` signature.
///
/// `v` may be given as `0/1` or `27/28`.
pub fn recover_address(
    signature: &[u8],
    message: &[u8],
) -> std::result::Result<[u8; 20], SignatureError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(SignatureError::MalformedSignature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        )));
    }
    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| SignatureError::MalformedSignature(e.to_string()))?;
    let v = signature[64];
    let v = if v >= 27 { v - 27 } else { v };
    let recovery_id = RecoveryId::from_byte(v)
        .ok_or_else(|| SignatureError::MalformedSignature(format!("invalid recovery byte {v}")))?;

    let digest = personal_message_hash(message);
    let key = VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id)
        .map_err(|_| SignatureError::VerificationFailed)?;
    Ok(address_from_verifying_key(&key))
}

pub fn verify_signature(
    signature: &[u8],
    message: &[u8],
    address: &str,
) -> std::result::Result<(), SignatureError> {
    let expected =
        public_key_of(address).map_err(|e| SignatureError::MalformedSignature(e.to_string()))?;
    let recovered = recover_address(signature, message)?;
    if recovered[..] != expected[PADDING_LEN..] {
        return Err(SignatureError::VerificationFailed);
    }
    Ok(())
}

pub fn is_valid_transaction_hash(hash: &str) -> bool {
    hash.strip_prefix("0x")
        .map_or(false, |body| body.len() == 64 && hex::decode(body).is_ok())
}
