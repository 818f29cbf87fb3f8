//! The native chain (Algorand).
//!
//! Address: `base32(public_key || sha512_256(public_key)[28..32])`, 58
//! characters. Wallets sign raw bytes, so there is no domain prefix.

use sha2::{Digest, Sha512_256};

use crate::base32;
use crate::ed25519;
use crate::error::{AddressError, Result, SignatureError};

pub const NAME: &str = "algorand";

/// Length of an address in characters.
pub const ADDRESS_LEN: usize = 58;

/// Length of a transaction id in characters.
pub const TRANSACTION_ID_LEN: usize = 52;

const CHECKSUM_LEN: usize = 4;

fn address_checksum(public_key: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha512_256::digest(public_key);
    let mut checksum = [0u8; CHECKSUM_LEN];
    checksum.copy_from_slice(&digest[32 - CHECKSUM_LEN..]);
    checksum
}

/// Extract the public key, checking the embedded checksum.
pub fn public_key_of(address: &str) -> Result<[u8; 32]> {
    if address.len() != ADDRESS_LEN {
        return Err(AddressError::malformed(NAME, address));
    }
    let bytes = base32::decode(address).ok_or_else(|| AddressError::malformed(NAME, address))?;
    if bytes.len() != 32 + CHECKSUM_LEN {
        return Err(AddressError::malformed(NAME, address));
    }

    let (key, checksum) = bytes.split_at(32);
    if checksum != address_checksum(key).as_slice() {
        return Err(AddressError::ChecksumMismatch {
            chain: NAME,
            address: address.to_string(),
        });
    }

    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(key);
    Ok(public_key)
}

/// Build the address for a public key.
pub fn address_of(public_key: &[u8; 32]) -> String {
    let mut bytes = Vec::with_capacity(32 + CHECKSUM_LEN);
    bytes.extend_from_slice(public_key);
    bytes.extend_from_slice(&address_checksum(public_key));
    base32::encode(&bytes)
}

pub fn validate_address(address: &str) -> bool {
    public_key_of(address).is_ok()
}

/// Addresses have a single valid spelling; this only validates.
pub fn canonicalize(address: &str) -> Result<String> {
    public_key_of(address).map(|pk| address_of(&pk))
}

pub fn verify_signature(
    signature: &[u8],
    message: &[u8],
    address: &str,
) -> std::result::Result<(), SignatureError> {
    let public_key = public_key_of(address)
        .map_err(|e| SignatureError::MalformedSignature(e.to_string()))?;
    ed25519::verify(&public_key, message, signature)
}

pub fn is_valid_transaction_hash(hash: &str) -> bool {
    hash.len() == TRANSACTION_ID_LEN
        && base32::decode(hash).map_or(false, |bytes| bytes.len() == 32)
}
