//! # C3 Trust Chains
//!
//! Address formats, public-key derivation and signature verification for
//! every chain the venue accepts, behind one closed [`ChainCapability`] enum.
//!
//! ## Families
//!
//! - **Algorand** (native chain): ed25519, base32 addresses with a
//!   SHA-512/256 checksum
//! - **EVM**: secp256k1, EIP-55 addresses, `personal_sign` domain prefix and
//!   recoverable signatures
//! - **Solana**: ed25519, base58 addresses
//!
//! Every account maps to a 32-byte venue public key. For EVM accounts that
//! key is the 20-byte address left-padded with zeros.
//!
//! ## Usage
//!
//! ```rust
//! use c3_trust_chains::{ChainId, ChainRegistry};
//!
//! let registry = ChainRegistry::standard();
//! let eth = registry.get(ChainId::ETHEREUM).unwrap();
//!
//! let canonical = eth
//!     .canonicalize("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed")
//!     .unwrap();
//! assert_eq!(canonical, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
//! ```

pub mod algorand;
pub mod base32;
pub mod capability;
mod ed25519;
pub mod error;
pub mod evm;
pub mod registry;
pub mod solana;
pub mod types;

pub use capability::ChainCapability;
pub use error::{AddressError, RegistryError, Result, SignatureError};
pub use registry::{AddressLookup, ChainEntry, ChainRegistry, RegistryConfig, STANDARD_CHAINS};
pub use types::{AccountType, ChainId, SignMethod};
