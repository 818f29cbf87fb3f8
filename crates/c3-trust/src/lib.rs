//! # C3 Trust
//!
//! The client-side trust layer of a cross-chain trading venue. A holder of a
//! key on any supported chain proves ownership of a venue-wide account and
//! authorizes operations without a shared PKI.
//!
//! ## Overview
//!
//! - **Account ids**: one textual identifier per account, whatever chain the
//!   key lives on, with a checksum for tamper detection
//! - **Envelopes**: an operation payload bound to an anti-replay header and
//!   signed by the account's wallet
//! - **Operations**: order, delegation and cancellation payloads
//!
//! Private keys never enter this crate. Signing goes through the
//! asynchronous [`MessageSigner`] capability.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use c3_trust::{envelope, ChainRegistry, EnvelopeHeader, MessageSigner, Order};
//!
//! async fn place(signer: &dyn MessageSigner, order: Order) -> c3_trust::Result<bool> {
//!     let registry = ChainRegistry::standard();
//!     let header = EnvelopeHeader::with_random_lease([0u8; 32], order.expires_on);
//!
//!     let signed = envelope::sign(header, order.encode()?, signer).await?;
//!     Ok(envelope::verify(&signed, &registry))
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `c3_trust::codec` - the packed binary codec
//! - `c3_trust::chains` - chain capabilities and the registry

pub mod account;
pub mod envelope;
pub mod error;
mod fields;
pub mod operations;
pub mod signer;

pub use c3_trust_chains as chains;
pub use c3_trust_codec as codec;

pub use account::AccountId;
pub use envelope::{
    build_message_to_sign, sign, verify, verify_with, EnvelopeHeader, SignedEnvelope,
};
pub use error::{AccountIdError, Result, SignerError, TrustError};
pub use operations::{Cancellation, Delegation, Operation, OperationKind, Order};
pub use signer::MessageSigner;

pub use c3_trust_chains::{AccountType, ChainCapability, ChainId, ChainRegistry, SignMethod};
