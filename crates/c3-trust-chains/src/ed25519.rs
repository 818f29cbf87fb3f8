//! Ed25519 verification shared by the Algorand and Solana capabilities.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::error::SignatureError;

/// Length of an ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// Verify `signature` over `message` with a raw 32-byte public key.
pub fn verify(
    public_key: &[u8; 32],
    message: &[u8],
    signature: &[u8],
) -> Result<(), SignatureError> {
    let verifying_key = VerifyingKey::from_bytes(public_key)
        .map_err(|e| SignatureError::MalformedSignature(format!("invalid public key: {e}")))?;
    let signature = Signature::from_slice(signature).map_err(|_| {
        SignatureError::MalformedSignature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        ))
    })?;

    verifying_key
        .verify(message, &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}
