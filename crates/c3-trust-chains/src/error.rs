//! Error types for chain capabilities and the registry.

use thiserror::Error;

use crate::types::{AccountType, ChainId};

/// Errors parsing or producing chain addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The address does not parse in the chain's format.
    #[error("malformed {chain} address: {address}")]
    MalformedAddress { chain: &'static str, address: String },

    /// No registered chain handles the request.
    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),

    /// The address parses but its embedded checksum (or checksum casing) is
    /// wrong.
    #[error("{chain} address checksum mismatch: {address}")]
    ChecksumMismatch { chain: &'static str, address: String },

    /// The 32-byte key cannot be expressed as an address on this chain.
    #[error("public key not representable on {chain}: {reason}")]
    InvalidPublicKey { chain: &'static str, reason: String },
}

impl AddressError {
    pub(crate) fn malformed(chain: &'static str, address: &str) -> Self {
        AddressError::MalformedAddress {
            chain,
            address: address.to_string(),
        }
    }
}

/// Errors verifying or decoding signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("unsupported signing method: {0}")]
    UnsupportedSigningMethod(String),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),
}

/// Errors building a registry from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("registry configuration lists no chains")]
    Empty,

    #[error("chain {0} listed more than once")]
    DuplicateChain(ChainId),

    #[error("chain {id} cannot use account type {account_type:?}")]
    UnsupportedEntry {
        id: ChainId,
        account_type: AccountType,
    },
}

/// Result type for address operations.
pub type Result<T> = std::result::Result<T, AddressError>;
