//! Chain identifiers, account families and signing methods.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric chain identifier (Wormhole chain ids).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u16);

impl ChainId {
    pub const SOLANA: Self = Self(1);
    pub const ETHEREUM: Self = Self(2);
    pub const BSC: Self = Self(4);
    pub const POLYGON: Self = Self(5);
    pub const AVALANCHE: Self = Self(6);
    pub const ALGORAND: Self = Self(8);
    pub const ARBITRUM: Self = Self(23);
    pub const OPTIMISM: Self = Self(24);
    pub const BASE: Self = Self(30);

    /// Human-readable name for known chains.
    pub fn name(self) -> &'static str {
        match self {
            Self::SOLANA => "solana",
            Self::ETHEREUM => "ethereum",
            Self::BSC => "bsc",
            Self::POLYGON => "polygon",
            Self::AVALANCHE => "avalanche",
            Self::ALGORAND => "algorand",
            Self::ARBITRUM => "arbitrum",
            Self::OPTIMISM => "optimism",
            Self::BASE => "base",
            _ => "evm",
        }
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({}:{})", self.0, self.name())
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}

impl From<u16> for ChainId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// The key family an account belongs to.
///
/// The discriminant is the type byte of the modern account id text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AccountType {
    /// The venue's native chain (Algorand, ed25519).
    NativeChain = 0x00,
    /// secp256k1 EVM chains; keys are 20-byte addresses zero-padded to 32.
    EvmFamily = 0x01,
    /// Solana (ed25519).
    SolanaFamily = 0x02,
}

impl AccountType {
    /// Convert to the type byte.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Parse a type byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::NativeChain),
            0x01 => Some(Self::EvmFamily),
            0x02 => Some(Self::SolanaFamily),
            _ => None,
        }
    }
}

/// The signature scheme a chain's wallets produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignMethod {
    Ed25519,
    Ecdsa,
}

impl fmt::Display for SignMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignMethod::Ed25519 => f.write_str("ed25519"),
            SignMethod::Ecdsa => f.write_str("ecdsa"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_bytes() {
        for t in [
            AccountType::NativeChain,
            AccountType::EvmFamily,
            AccountType::SolanaFamily,
        ] {
            assert_eq!(AccountType::from_u8(t.to_u8()), Some(t));
        }
        assert_eq!(AccountType::from_u8(0x03), None);
    }

    #[test]
    fn test_chain_id_display() {
        assert_eq!(ChainId::ALGORAND.to_string(), "algorand(8)");
        assert_eq!(ChainId(9999).name(), "evm");
    }

    #[test]
    fn test_serde_forms() {
        assert_eq!(serde_json::to_string(&ChainId::BASE).unwrap(), "30");
        assert_eq!(
            serde_json::to_string(&AccountType::EvmFamily).unwrap(),
            "\"evm_family\""
        );
    }
}
