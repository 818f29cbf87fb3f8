//! Error types for account ids, signers and the trust API.

use c3_trust_chains::{AddressError, SignatureError};
use c3_trust_codec::CodecError;
use thiserror::Error;

/// Errors parsing an account id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountIdError {
    /// Neither the legacy (59) nor the modern (61) length.
    #[error("invalid account id length: {0}")]
    InvalidLength(usize),

    #[error("account id checksum mismatch")]
    InvalidChecksum,

    /// The modern type byte is not a known account type.
    #[error("invalid account type discriminant")]
    InvalidTypeDiscriminant,

    /// Missing `C3_` prefix or characters outside the alphabet.
    #[error("invalid account id encoding: {0}")]
    InvalidEncoding(String),
}

/// Errors reported by a [`MessageSigner`](crate::MessageSigner).
#[derive(Debug, Error)]
pub enum SignerError {
    /// The signer refused (user rejection in a wallet, policy, etc).
    #[error("signing rejected: {0}")]
    Rejected(String),

    /// The signer could not be reached or failed internally.
    #[error("signer unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the trust API.
#[derive(Debug, Error)]
pub enum TrustError {
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("address error: {0}")]
    Address(#[from] AddressError),

    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("account id error: {0}")]
    AccountId(#[from] AccountIdError),

    #[error("signer error: {0}")]
    Signer(#[from] SignerError),

    /// Bytes that do not form a known operation payload.
    #[error("invalid operation payload: {0}")]
    InvalidOperation(String),
}

/// Result type for trust operations.
pub type Result<T> = std::result::Result<T, TrustError>;
