//! Solana (ed25519).
//!
//! Addresses are the base58 encoding of the 32-byte public key. Wallets sign
//! raw bytes. A transaction is identified by its first signature, so a
//! transaction hash is base58 over 64 bytes.

use crate::ed25519;
use crate::error::{AddressError, Result, SignatureError};

pub const NAME: &str = "solana";

const TRANSACTION_ID_BYTES: usize = 64;

pub fn public_key_of(address: &str) -> Result<[u8; 32]> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|_| AddressError::malformed(NAME, address))?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| AddressError::malformed(NAME, address))
}

pub fn address_of(public_key: &[u8; 32]) -> String {
    bs58::encode(public_key).into_string()
}

pub fn validate_address(address: &str) -> bool {
    public_key_of(address).is_ok()
}

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
    bs58::decode(hash)
        .into_vec()
        .map_or(false, |bytes| bytes.len() == TRANSACTION_ID_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";

    #[test]
    fn test_system_program_is_zero_key() {
        assert_eq!(public_key_of(SYSTEM_PROGRAM).unwrap(), [0u8; 32]);
        assert_eq!(address_of(&[0u8; 32]), SYSTEM_PROGRAM);
    }

    #[test]
    fn test_rejects_bad_addresses() {
        assert!(!validate_address("0OIl")); // outside the base58 alphabet
        assert!(!validate_address("1111")); // too short
        assert!(!validate_address(""));
    }

    #[test]
    fn test_verify_signature() {
        let key = SigningKey::from_bytes(&[0x11; 32]);
        let address = address_of(&key.verifying_key().to_bytes());
        let sig = key.sign(b"cancel").to_bytes();

        assert!(verify_signature(&sig, b"cancel", &address).is_ok());
        assert_eq!(
            verify_signature(&sig, b"cancek", &address),
            Err(SignatureError::VerificationFailed)
        );
    }

    #[test]
    fn test_transaction_hash_shape() {
        let sig = bs58::encode([9u8; 64]).into_string();
        assert!(is_valid_transaction_hash(&sig));
        assert!(!is_valid_transaction_hash(SYSTEM_PROGRAM));
    }
}
