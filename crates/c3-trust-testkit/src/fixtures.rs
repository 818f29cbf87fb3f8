//! Local signers standing in for wallets.
//!
//! These hold private keys in memory and must only be used in tests.

use async_trait::async_trait;
use ed25519_dalek::Signer;
use k256::ecdsa::SigningKey as EvmSigningKey;

use c3_trust::{AccountId, ChainCapability, ChainId, MessageSigner, SignerError};
use c3_trust_chains::evm;

/// An ed25519 signer on the native chain or Solana.
pub struct LocalEd25519Signer {
    key: ed25519_dalek::SigningKey,
    chain: ChainCapability,
    address: String,
}

impl LocalEd25519Signer {
    /// Create from a seed. `chain` must be an ed25519 chain.
    pub fn from_seed(seed: [u8; 32], chain: ChainCapability) -> Self {
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);
        let public_key = key.verifying_key().to_bytes();
        let address = chain
            .address_of(&public_key)
            .expect("ed25519 chains accept every 32-byte key");
        Self {
            key,
            chain,
            address,
        }
    }

    pub fn algorand(seed: [u8; 32]) -> Self {
        Self::from_seed(seed, ChainCapability::Algorand)
    }

    pub fn solana(seed: [u8; 32]) -> Self {
        Self::from_seed(seed, ChainCapability::Solana)
    }

    /// A signer with a random key.
    pub fn generate(chain: ChainCapability) -> Self {
        Self::from_seed(rand::random(), chain)
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }

    pub fn account_id(&self) -> AccountId {
        AccountId::new(self.public_key(), self.chain.account_type())
    }
}

#[async_trait]
impl MessageSigner for LocalEd25519Signer {
    fn chain(&self) -> ChainCapability {
        self.chain
    }

    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        let mut data = self.chain.domain_prefix(message.len());
        data.extend_from_slice(message);
        Ok(self.key.sign(&data).to_bytes().to_vec())
    }
}

/// A secp256k1 signer behaving like a `personal_sign` wallet.
pub struct LocalEvmSigner {
    key: EvmSigningKey,
    chain: ChainCapability,
    address: String,
}

impl LocalEvmSigner {
    /// Create from a 32-byte secret scalar.
    pub fn from_secret(secret: [u8; 32], chain_id: ChainId) -> Self {
        let key = EvmSigningKey::from_slice(&secret).expect("secret is a valid scalar");
        let address =
            evm::to_checksum_address(&evm::address_from_verifying_key(key.verifying_key()));
        Self {
            key,
            chain: ChainCapability::Evm(chain_id),
            address,
        }
    }

    pub fn ethereum(secret: [u8; 32]) -> Self {
        Self::from_secret(secret, ChainId::ETHEREUM)
    }

    pub fn account_id(&self) -> AccountId {
        AccountId::from_address(self.chain, &self.address).expect("own address is valid")
    }
}

#[async_trait]
impl MessageSigner for LocalEvmSigner {
    fn chain(&self) -> ChainCapability {
        self.chain
    }

    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        let digest = evm::personal_message_hash(message);
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| SignerError::Unavailable(e.to_string()))?;

        let mut out = signature.to_bytes().to_vec();
        out.push(27 + recovery_id.to_byte());
        Ok(out)
    }
}

/// A signer that refuses every request, like a user dismissing a wallet
/// prompt.
pub struct RejectingSigner {
    inner: LocalEd25519Signer,
}

impl RejectingSigner {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            inner: LocalEd25519Signer::algorand(seed),
        }
    }
}

#[async_trait]
impl MessageSigner for RejectingSigner {
    fn chain(&self) -> ChainCapability {
        self.inner.chain()
    }

    fn address(&self) -> &str {
        self.inner.address()
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<Vec<u8>, SignerError> {
        Err(SignerError::Rejected("user declined".into()))
    }
}

/// Native-chain signers with distinct deterministic keys.
pub fn multi_party_signers(count: usize) -> Vec<LocalEd25519Signer> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            LocalEd25519Signer::algorand(seed)
        })
        .collect()
}
