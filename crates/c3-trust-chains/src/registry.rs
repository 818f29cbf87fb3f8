//! The chain registry and best-effort address lookup.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capability::{unsupported, ChainCapability};
use crate::error::{AddressError, RegistryError, Result};
use crate::types::{AccountType, ChainId, SignMethod};

/// Supported chains in lookup priority order.
pub const STANDARD_CHAINS: [ChainCapability; 9] = [
    ChainCapability::Algorand,
    ChainCapability::Evm(ChainId::ETHEREUM),
    ChainCapability::Evm(ChainId::BSC),
    ChainCapability::Evm(ChainId::POLYGON),
    ChainCapability::Evm(ChainId::AVALANCHE),
    ChainCapability::Evm(ChainId::ARBITRUM),
    ChainCapability::Evm(ChainId::OPTIMISM),
    ChainCapability::Evm(ChainId::BASE),
    ChainCapability::Solana,
];

/// One configured chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub id: ChainId,
    pub account_type: AccountType,
}

/// Registry configuration. Entry order is lookup priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub chains: Vec<ChainEntry>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            chains: STANDARD_CHAINS
                .iter()
                .map(|cap| ChainEntry {
                    id: cap.chain_id(),
                    account_type: cap.account_type(),
                })
                .collect(),
        }
    }
}

/// Immutable table of chain capabilities, built once at startup and shared
/// by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRegistry {
    chains: Vec<ChainCapability>,
}

impl ChainRegistry {
    /// The standard table.
    pub fn standard() -> Self {
        Self {
            chains: STANDARD_CHAINS.to_vec(),
        }
    }

    /// Build a registry from configuration.
    pub fn from_config(config: &RegistryConfig) -> std::result::Result<Self, RegistryError> {
        if config.chains.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut chains: Vec<ChainCapability> = Vec::with_capacity(config.chains.len());
        for entry in &config.chains {
            if chains.iter().any(|c| c.chain_id() == entry.id) {
                return Err(RegistryError::DuplicateChain(entry.id));
            }
            let cap = ChainCapability::for_entry(entry.id, entry.account_type).ok_or(
                RegistryError::UnsupportedEntry {
                    id: entry.id,
                    account_type: entry.account_type,
                },
            )?;
            chains.push(cap);
        }
        Ok(Self { chains })
    }

    pub fn get(&self, id: ChainId) -> Result<ChainCapability> {
        self.chains
            .iter()
            .copied()
            .find(|c| c.chain_id() == id)
            .ok_or_else(|| unsupported(id))
    }

    /// The first registered capability of a family.
    pub fn for_account_type(&self, account_type: AccountType) -> Result<ChainCapability> {
        self.chains
            .iter()
            .copied()
            .find(|c| c.account_type() == account_type)
            .ok_or_else(|| AddressError::UnsupportedChain(format!("{account_type:?}")))
    }

    /// Capabilities in priority order.
    pub fn chains(&self) -> &[ChainCapability] {
        &self.chains
    }

    /// Lookups that guess the chain from an address alone.
    pub fn by_address(&self) -> AddressLookup<'_> {
        AddressLookup { registry: self }
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Best-effort lookups keyed by address.
///
/// An address does not say which chain it belongs to. Every helper here picks
/// the first registered chain, in priority order, whose address format
/// accepts the address. An EVM address is therefore always attributed to the
/// first registered EVM chain, and a string that happens to parse on two
/// families is attributed to the earlier one. Callers that know the chain
/// should use [`ChainRegistry::get`] instead.
#[derive(Debug, Clone, Copy)]
pub struct AddressLookup<'a> {
    registry: &'a ChainRegistry,
}

impl<'a> AddressLookup<'a> {
    /// The first chain whose format accepts `address`.
    ///
    /// Fails with [`AddressError::UnsupportedChain`] when no registered
    /// chain accepts it.
    pub fn find_chain_by_address(&self, address: &str) -> Result<ChainCapability> {
        let mut matches = self
            .registry
            .chains
            .iter()
            .filter(|c| c.validate_address(address));

        match matches.next().copied() {
            Some(first) => {
                if matches.any(|c| c.account_type() != first.account_type()) {
                    warn!(
                        %address,
                        chosen = %first,
                        "address parses on more than one chain family"
                    );
                }
                Ok(first)
            }
            None => {
                debug!(%address, "no registered chain accepts address");
                Err(AddressError::UnsupportedChain(address.to_string()))
            }
        }
    }

    /// Verify with whichever chain the address appears to belong to.
    pub fn verify_by_address(&self, signature: &[u8], message: &[u8], address: &str) -> bool {
        self.find_chain_by_address(address)
            .map_or(false, |c| c.verify_signature(signature, message, address))
    }

    pub fn public_key_by_address(&self, address: &str) -> Result<[u8; 32]> {
        self.find_chain_by_address(address)?.public_key_of(address)
    }

    pub fn signing_method_by_address(&self, address: &str) -> Result<SignMethod> {
        Ok(self.find_chain_by_address(address)?.signing_method())
    }

    pub fn domain_prefix_by_address(&self, address: &str, payload_len: usize) -> Result<Vec<u8>> {
        Ok(self.find_chain_by_address(address)?.domain_prefix(payload_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVM_ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_standard_priority_order() {
        let registry = ChainRegistry::standard();
        assert_eq!(registry.chains()[0], ChainCapability::Algorand);
        assert_eq!(registry.chains().last(), Some(&ChainCapability::Solana));
        assert_eq!(registry.chains().len(), 9);
    }

    #[test]
    fn test_get() {
        let registry = ChainRegistry::standard();
        assert_eq!(
            registry.get(ChainId::ARBITRUM).unwrap(),
            ChainCapability::Evm(ChainId::ARBITRUM)
        );
        assert!(matches!(
            registry.get(ChainId(999)),
            Err(AddressError::UnsupportedChain(_))
        ));
    }

    #[test]
    fn test_for_account_type() {
        let registry = ChainRegistry::standard();
        assert_eq!(
            registry.for_account_type(AccountType::EvmFamily).unwrap(),
            ChainCapability::Evm(ChainId::ETHEREUM)
        );
    }

    #[test]
    fn test_default_config_matches_standard() {
        let registry = ChainRegistry::from_config(&RegistryConfig::default()).unwrap();
        assert_eq!(registry, ChainRegistry::standard());
    }

    #[test]
    fn test_config_from_json() {
        let config: RegistryConfig = serde_json::from_str(
            r#"{"chains": [
                {"id": 30, "account_type": "evm_family"},
                {"id": 8, "account_type": "native_chain"}
            ]}"#,
        )
        .unwrap();
        let registry = ChainRegistry::from_config(&config).unwrap();

        assert_eq!(
            registry.chains(),
            &[ChainCapability::Evm(ChainId::BASE), ChainCapability::Algorand]
        );
        assert_eq!(
            registry.by_address().find_chain_by_address(EVM_ADDRESS),
            Ok(ChainCapability::Evm(ChainId::BASE))
        );
        assert!(registry.get(ChainId::SOLANA).is_err());
    }

    #[test]
    fn test_config_rejections() {
        assert_eq!(
            ChainRegistry::from_config(&RegistryConfig { chains: vec![] }),
            Err(RegistryError::Empty)
        );

        let entry = ChainEntry {
            id: ChainId::ETHEREUM,
            account_type: AccountType::EvmFamily,
        };
        assert_eq!(
            ChainRegistry::from_config(&RegistryConfig {
                chains: vec![entry, entry]
            }),
            Err(RegistryError::DuplicateChain(ChainId::ETHEREUM))
        );

        let bad = ChainEntry {
            id: ChainId::ALGORAND,
            account_type: AccountType::SolanaFamily,
        };
        assert!(matches!(
            ChainRegistry::from_config(&RegistryConfig { chains: vec![bad] }),
            Err(RegistryError::UnsupportedEntry { .. })
        ));
    }

    #[test]
    fn test_lookup_by_address() {
        let registry = ChainRegistry::standard();
        let lookup = registry.by_address();

        let algo = ChainCapability::Algorand.address_of(&[9u8; 32]).unwrap();
        let sol = ChainCapability::Solana.address_of(&[9u8; 32]).unwrap();

        assert_eq!(
            lookup.find_chain_by_address(&algo),
            Ok(ChainCapability::Algorand)
        );
        assert_eq!(
            lookup.find_chain_by_address(EVM_ADDRESS),
            Ok(ChainCapability::Evm(ChainId::ETHEREUM))
        );
        assert_eq!(
            lookup.find_chain_by_address(&sol),
            Ok(ChainCapability::Solana)
        );
        assert_eq!(
            lookup.find_chain_by_address("nope"),
            Err(AddressError::UnsupportedChain("nope".into()))
        );

        assert_eq!(
            lookup.signing_method_by_address(EVM_ADDRESS).unwrap(),
            SignMethod::Ecdsa
        );
        assert!(lookup
            .domain_prefix_by_address(&algo, 12)
            .unwrap()
            .is_empty());
        assert_eq!(lookup.public_key_by_address(&sol).unwrap(), [9u8; 32]);
        assert!(lookup.public_key_by_address("nope").is_err());
    }

    #[test]
    fn test_verify_by_address() {
        use ed25519_dalek::{Signer, SigningKey};

        let registry = ChainRegistry::standard();
        let key = SigningKey::from_bytes(&[0x44; 32]);
        let sig = key.sign(b"payload").to_bytes();
        let public_key = key.verifying_key().to_bytes();

        for cap in [ChainCapability::Algorand, ChainCapability::Solana] {
            let address = cap.address_of(&public_key).unwrap();
            assert!(registry.by_address().verify_by_address(&sig, b"payload", &address));
            assert!(!registry.by_address().verify_by_address(&sig, b"other", &address));
        }
        assert!(!registry.by_address().verify_by_address(&sig, b"payload", "nope"));
    }
}
