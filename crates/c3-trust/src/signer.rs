//! The signing capability.
//!
//! The trust layer never holds private keys. A wallet, hardware key or
//! custodial service is plugged in behind [`MessageSigner`].

use async_trait::async_trait;
use c3_trust_chains::ChainCapability;

use crate::error::SignerError;

/// Result type for signer operations.
pub type Result<T> = std::result::Result<T, SignerError>;

/// An asynchronous signer for one account on one chain.
///
/// Implementations must be thread-safe (Send + Sync). Concurrent
/// `sign_message` calls cover independent messages and may run in parallel.
/// Retries and timeouts are the caller's responsibility.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// The chain the signing key lives on.
    fn chain(&self) -> ChainCapability;

    /// The signer's address on [`chain`](Self::chain).
    fn address(&self) -> &str;

    /// Sign `message`.
    ///
    /// The signer applies the chain's domain prefix itself, exactly as a
    /// wallet on that chain would. The returned bytes are the raw signature
    /// (64 bytes for ed25519, 65 bytes `r || s || v` for EVM).
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>>;
}
