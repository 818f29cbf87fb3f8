//! # C3 Trust Testkit
//!
//! Testing utilities for the C3 trust layer.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known account ids and addresses for cross-client verification
//! - **Generators**: Proptest strategies for schemas, conforming records and payloads
//! - **Fixtures**: In-memory signers standing in for wallets
//!
//! ## Golden Vectors
//!
//! ```rust
//! use c3_trust_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, produced) in verify_all_vectors() {
//!     assert!(matches, "{name}: {produced}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use c3_trust_codec::{decode, encode};
//! use c3_trust_testkit::generators::schema_and_record;
//!
//! proptest! {
//!     #[test]
//!     fn codec_roundtrip((schema, record) in schema_and_record()) {
//!         let bytes = encode(&record, &schema).unwrap();
//!         prop_assert_eq!(decode(&bytes, &schema, 0).unwrap().0, record);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use c3_trust_testkit::fixtures::LocalEd25519Signer;
//!
//! let signer = LocalEd25519Signer::algorand([0x42; 32]);
//! let account = signer.account_id();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_signers, LocalEd25519Signer, LocalEvmSigner, RejectingSigner};
pub use generators::{record_for, schema, schema_and_record, value_for};
pub use vectors::{
    account_id_vectors, address_vectors, verify_all_vectors, AccountIdVector, AddressVector,
};
