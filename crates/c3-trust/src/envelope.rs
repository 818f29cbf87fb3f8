//! Signed operation envelopes.
//!
//! An envelope binds one operation payload to an anti-replay header so that
//! neither can be changed without invalidating the signature. The bytes a
//! signer signs are:
//!
//! ```text
//! base64("(C3.IO)0" || target(32) || lease(32) || expiry(8, BE) || operation)
//! ```
//!
//! taken as the bytes of the base64 text. The chain's domain prefix (if any)
//! is applied by the signer, not here.
//!
//! Lease uniqueness and expiry are not checked here. They are enforced by the
//! ledger that consumes the envelope.

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use c3_trust_chains::{ChainCapability, ChainRegistry, SignMethod};
use c3_trust_codec::{decode, encode, record, FieldDescriptor, Schema, Value};
use tracing::{debug, trace};

use crate::account::AccountId;
use crate::error::Result;
use crate::fields;
use crate::signer::MessageSigner;

/// Domain tag prepended to every envelope message.
pub const ENVELOPE_DOMAIN: &[u8; 8] = b"(C3.IO)0";

/// Encoded size of an [`EnvelopeHeader`].
pub const HEADER_LEN: usize = 72;

/// The anti-replay header of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvelopeHeader {
    /// The application (or contract) the operation is addressed to.
    pub target: [u8; 32],
    /// Caller-chosen anti-replay nonce.
    pub lease: [u8; 32],
    /// Last valid round or timestamp, as the consuming ledger defines it.
    pub expiry: u64,
}

impl EnvelopeHeader {
    pub fn new(target: [u8; 32], lease: [u8; 32], expiry: u64) -> Self {
        Self {
            target,
            lease,
            expiry,
        }
    }

    /// A header with a fresh random lease.
    pub fn with_random_lease(target: [u8; 32], expiry: u64) -> Self {
        Self::new(target, rand::random(), expiry)
    }

    pub fn schema() -> Schema {
        Schema::new()
            .field("target", FieldDescriptor::FixedAddress)
            .field("lease", FieldDescriptor::FixedAddress)
            .field("expiry", FieldDescriptor::uint())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let value = record([
            ("target", Value::Address(self.target)),
            ("lease", Value::Address(self.lease)),
            ("expiry", Value::UInt(self.expiry)),
        ]);
        Ok(encode(&value, &Self::schema())?)
    }

    /// Decode a header at `offset`.
    pub fn decode(bytes: &[u8], offset: usize) -> Result<Self> {
        let (value, _) = decode(bytes, &Self::schema(), offset)?;
        Ok(Self {
            target: fields::address(&value, "target")?,
            lease: fields::address(&value, "lease")?,
            expiry: fields::uint(&value, "expiry")?,
        })
    }
}

/// The exact bytes a signer signs for `header` and `operation`.
pub fn build_message_to_sign(header: &EnvelopeHeader, operation: &[u8]) -> Result<Vec<u8>> {
    let header_bytes = header.encode()?;

    let mut raw = Vec::with_capacity(ENVELOPE_DOMAIN.len() + header_bytes.len() + operation.len());
    raw.extend_from_slice(ENVELOPE_DOMAIN);
    raw.extend_from_slice(&header_bytes);
    raw.extend_from_slice(operation);

    let message = STANDARD.encode(&raw).into_bytes();
    trace!(
        operation_len = operation.len(),
        message_len = message.len(),
        "built message to sign"
    );
    Ok(message)
}

/// An operation signed by an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub header: EnvelopeHeader,
    pub operation: Bytes,
    /// Cached result of [`build_message_to_sign`].
    pub message_to_sign: Bytes,
    pub sign_method: SignMethod,
    pub signature: Vec<u8>,
    pub signer: AccountId,
    /// The prefix the signer's wallet applied before signing.
    pub domain_prefix: Vec<u8>,
}

impl SignedEnvelope {
    /// The signature in its chain's transport text form: `0x` hex for
    /// ECDSA, base64 for ed25519.
    pub fn signature_text(&self) -> String {
        match self.sign_method {
            SignMethod::Ecdsa => format!("0x{}", hex::encode(&self.signature)),
            SignMethod::Ed25519 => STANDARD.encode(&self.signature),
        }
    }
}

/// Sign `operation` under `header` with `signer`.
pub async fn sign(
    header: EnvelopeHeader,
    operation: impl Into<Bytes>,
    signer: &dyn MessageSigner,
) -> Result<SignedEnvelope> {
    let operation = operation.into();
    let chain = signer.chain();
    let signer_id = AccountId::from_address(chain, signer.address())?;

    let message = build_message_to_sign(&header, &operation)?;
    let signature = signer.sign_message(&message).await?;

    Ok(SignedEnvelope {
        header,
        operation,
        domain_prefix: chain.domain_prefix(message.len()),
        message_to_sign: Bytes::from(message),
        sign_method: chain.signing_method(),
        signature,
        signer: signer_id,
    })
}

/// Verify an envelope, resolving the capability from the signer's account
/// type.
///
/// Returns false on any structural or cryptographic mismatch.
pub fn verify(envelope: &SignedEnvelope, registry: &ChainRegistry) -> bool {
    match registry.for_account_type(envelope.signer.account_type()) {
        Ok(capability) => verify_with(envelope, capability),
        Err(e) => {
            debug!(signer = %envelope.signer, error = %e, "no capability for signer");
            false
        }
    }
}

/// Verify an envelope against a specific capability.
pub fn verify_with(envelope: &SignedEnvelope, capability: ChainCapability) -> bool {
    if capability.signing_method() != envelope.sign_method {
        debug!(
            chain = %capability,
            method = %envelope.sign_method,
            "sign method does not match chain"
        );
        return false;
    }

    let message = match build_message_to_sign(&envelope.header, &envelope.operation) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, "cannot rebuild message");
            return false;
        }
    };
    if envelope.message_to_sign[..] != message[..] {
        debug!("cached message does not match header and operation");
        return false;
    }

    let address = match envelope.signer.address_on(capability) {
        Ok(address) => address,
        Err(e) => {
            debug!(chain = %capability, error = %e, "signer has no address on chain");
            return false;
        }
    };
    capability.verify_signature(&envelope.signature, &message, &address)
}
