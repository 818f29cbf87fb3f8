//! The closed set of chain capabilities.

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

use crate::error::{AddressError, Result, SignatureError};
use crate::types::{AccountType, ChainId, SignMethod};
use crate::{algorand, evm, solana};

/// Stateless address and signature handling for one chain.
///
/// Every EVM chain shares one implementation and differs only by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainCapability {
    Algorand,
    Evm(ChainId),
    Solana,
}

impl ChainCapability {
    /// Build the capability for a chain id and account family.
    pub fn for_entry(id: ChainId, account_type: AccountType) -> Option<Self> {
        match (account_type, id) {
            (AccountType::NativeChain, ChainId::ALGORAND) => Some(Self::Algorand),
            (AccountType::SolanaFamily, ChainId::SOLANA) => Some(Self::Solana),
            (AccountType::EvmFamily, id) if id != ChainId::ALGORAND && id != ChainId::SOLANA => {
                Some(Self::Evm(id))
            }
            _ => None,
        }
    }

    pub fn chain_id(&self) -> ChainId {
        match self {
            Self::Algorand => ChainId::ALGORAND,
            Self::Evm(id) => *id,
            Self::Solana => ChainId::SOLANA,
        }
    }

    pub fn name(&self) -> &'static str {
        self.chain_id().name()
    }

    pub fn account_type(&self) -> AccountType {
        match self {
            Self::Algorand => AccountType::NativeChain,
            Self::Evm(_) => AccountType::EvmFamily,
            Self::Solana => AccountType::SolanaFamily,
        }
    }

    pub fn signing_method(&self) -> SignMethod {
        match self {
            Self::Algorand | Self::Solana => SignMethod::Ed25519,
            Self::Evm(_) => SignMethod::Ecdsa,
        }
    }

    /// The 32-byte venue public key for an address on this chain.
    pub fn public_key_of(&self, address: &str) -> Result<[u8; 32]> {
        match self {
            Self::Algorand => algorand::public_key_of(address),
            Self::Evm(_) => evm::public_key_of(address),
            Self::Solana => solana::public_key_of(address),
        }
    }

    /// The canonical address for a 32-byte venue public key.
    pub fn address_of(&self, public_key: &[u8; 32]) -> Result<String> {
        match self {
            Self::Algorand => Ok(algorand::address_of(public_key)),
            Self::Evm(_) => evm::address_of(public_key),
            Self::Solana => Ok(solana::address_of(public_key)),
        }
    }

    pub fn validate_address(&self, address: &str) -> bool {
        match self {
            Self::Algorand => algorand::validate_address(address),
            Self::Evm(_) => evm::validate_address(address),
            Self::Solana => solana::validate_address(address),
        }
    }

    pub fn canonicalize(&self, address: &str) -> Result<String> {
        match self {
            Self::Algorand => algorand::canonicalize(address),
            Self::Evm(_) => evm::canonicalize(address),
            Self::Solana => solana::canonicalize(address),
        }
    }

    /// Bytes a wallet on this chain prepends before signing a payload of
    /// `payload_len` bytes. Empty for chains that sign raw bytes.
    pub fn domain_prefix(&self, payload_len: usize) -> Vec<u8> {
        match self {
            Self::Evm(_) => evm::domain_prefix(payload_len),
            Self::Algorand | Self::Solana => Vec::new(),
        }
    }

    /// Check `signature` over `message` against `address`.
    ///
    /// `message` is the payload before any domain prefix; the EVM capability
    /// applies the prefix itself.
    pub fn verify_signature(&self, signature: &[u8], message: &[u8], address: &str) -> bool {
        let result = match self {
            Self::Algorand => algorand::verify_signature(signature, message, address),
            Self::Evm(_) => evm::verify_signature(signature, message, address),
            Self::Solana => solana::verify_signature(signature, message, address),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                debug!(chain = %self.chain_id(), %address, error = %e, "signature rejected");
                false
            }
        }
    }

    /// Decode the transport text form of a signature: `0x` hex on EVM
    /// chains, standard base64 on ed25519 chains.
    pub fn decode_signature(&self, encoded: &str) -> std::result::Result<Vec<u8>, SignatureError> {
        match self {
            Self::Evm(_) => {
                let body = encoded.strip_prefix("0x").ok_or_else(|| {
                    SignatureError::MalformedSignature("missing 0x prefix".into())
                })?;
                hex::decode(body).map_err(|e| SignatureError::MalformedSignature(e.to_string()))
            }
            Self::Algorand | Self::Solana => STANDARD
                .decode(encoded)
                .map_err(|e| SignatureError::MalformedSignature(e.to_string())),
        }
    }

    pub fn verify_encoded_signature(&self, encoded: &str, message: &[u8], address: &str) -> bool {
        match self.decode_signature(encoded) {
            Ok(signature) => self.verify_signature(&signature, message, address),
            Err(e) => {
                debug!(chain = %self.chain_id(), error = %e, "undecodable signature");
                false
            }
        }
    }

    pub fn is_valid_transaction_hash(&self, hash: &str) -> bool {
        match self {
            Self::Algorand => algorand::is_valid_transaction_hash(hash),
            Self::Evm(_) => evm::is_valid_transaction_hash(hash),
            Self::Solana => solana::is_valid_transaction_hash(hash),
        }
    }
}

impl std::fmt::Display for ChainCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.chain_id())
    }
}

/// Shorthand used by the registry when a chain id has no capability.
pub(crate) fn unsupported(id: ChainId) -> AddressError {
    AddressError::UnsupportedChain(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    const EVM_ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_for_entry() {
        assert_eq!(
            ChainCapability::for_entry(ChainId::ALGORAND, AccountType::NativeChain),
            Some(ChainCapability::Algorand)
        );
        assert_eq!(
            ChainCapability::for_entry(ChainId::BASE, AccountType::EvmFamily),
            Some(ChainCapability::Evm(ChainId::BASE))
        );
        assert_eq!(
            ChainCapability::for_entry(ChainId::SOLANA, AccountType::EvmFamily),
            None
        );
        assert_eq!(
            ChainCapability::for_entry(ChainId::ETHEREUM, AccountType::NativeChain),
            None
        );
    }

    #[test]
    fn test_cross_chain_address_roundtrip() {
        let key = [0x5a; 32];
        for cap in [ChainCapability::Algorand, ChainCapability::Solana] {
            let address = cap.address_of(&key).unwrap();
            assert!(cap.validate_address(&address));
            assert_eq!(cap.public_key_of(&address).unwrap(), key);
        }

        let evm = ChainCapability::Evm(ChainId::ETHEREUM);
        let padded = evm.public_key_of(EVM_ADDRESS).unwrap();
        assert_eq!(evm.address_of(&padded).unwrap(), EVM_ADDRESS);
    }

    #[test]
    fn test_domain_prefix_by_family() {
        assert!(ChainCapability::Algorand.domain_prefix(10).is_empty());
        assert!(ChainCapability::Solana.domain_prefix(10).is_empty());
        assert_eq!(
            ChainCapability::Evm(ChainId::POLYGON).domain_prefix(10),
            b"\x19Ethereum Signed Message:\n10".to_vec()
        );
    }

    #[test]
    fn test_signing_methods() {
        assert_eq!(ChainCapability::Algorand.signing_method(), SignMethod::Ed25519);
        assert_eq!(ChainCapability::Solana.signing_method(), SignMethod::Ed25519);
        assert_eq!(
            ChainCapability::Evm(ChainId::BSC).signing_method(),
            SignMethod::Ecdsa
        );
    }

    #[test]
    fn test_verify_encoded_signature() {
        let key = SigningKey::from_bytes(&[0x21; 32]);
        let cap = ChainCapability::Algorand;
        let address = cap.address_of(&key.verifying_key().to_bytes()).unwrap();
        let encoded = STANDARD.encode(key.sign(b"payload").to_bytes());

        assert!(cap.verify_encoded_signature(&encoded, b"payload", &address));
        assert!(!cap.verify_encoded_signature("not base64!", b"payload", &address));
        assert!(!ChainCapability::Evm(ChainId::ETHEREUM)
            .verify_encoded_signature("deadbeef", b"payload", EVM_ADDRESS));
    }

    #[test]
    fn test_algorand_address_is_not_evm() {
        let address = ChainCapability::Algorand.address_of(&[3u8; 32]).unwrap();
        assert!(!ChainCapability::Evm(ChainId::ETHEREUM).validate_address(&address));
        assert!(!ChainCapability::Solana.validate_address(&address));
    }
}
