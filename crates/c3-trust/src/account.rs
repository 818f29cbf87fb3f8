//! Venue-wide account identifiers.
//!
//! An account id wraps the 32-byte venue public key of an account on any
//! supported chain, with a short checksum for tamper detection:
//!
//! ```text
//! legacy (59 chars): "C3_" || base32(public_key || checksum)
//! modern (61 chars): "C3_" || HEX(type) || base32(public_key || checksum)
//!
//! checksum = sha512_256("(C3.IO)" || [type, modern only] || public_key)[29..32]
//! ```
//!
//! The legacy form has no type byte. Its account type is inferred from the
//! key: twelve leading zero bytes mean a zero-padded EVM address, anything
//! else is a native chain key. A native key that happens to start with
//! twelve zero bytes is misread as EVM. Solana keys cannot be told apart from
//! native keys, so Solana accounts always use the modern form.

use std::fmt;
use std::str::FromStr;

use c3_trust_chains::{base32, AccountType, AddressError, ChainCapability, ChainId, ChainRegistry};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512_256};

use crate::error::AccountIdError;

/// Text prefix of every account id.
pub const PREFIX: &str = "C3_";

/// Domain separator hashed into the checksum.
pub const CHECKSUM_DOMAIN: &[u8] = b"(C3.IO)";

/// Length of the legacy text form.
pub const LEGACY_LEN: usize = 59;

/// Length of the modern text form.
pub const MODERN_LEN: usize = 61;

const CHECKSUM_LEN: usize = 3;
const EVM_PADDING_LEN: usize = 12;

/// A venue account: a 32-byte public key and the family it belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId {
    public_key: [u8; 32],
    account_type: AccountType,
}

impl AccountId {
    pub fn new(public_key: [u8; 32], account_type: AccountType) -> Self {
        Self {
            public_key,
            account_type,
        }
    }

    /// The account for an address on a specific chain.
    pub fn from_address(
        capability: ChainCapability,
        address: &str,
    ) -> Result<Self, AddressError> {
        let public_key = capability.public_key_of(address)?;
        Ok(Self::new(public_key, capability.account_type()))
    }

    /// The account for a public key on a registered chain.
    pub fn for_chain(
        registry: &ChainRegistry,
        chain_id: ChainId,
        public_key: [u8; 32],
    ) -> Result<Self, AddressError> {
        let capability = registry.get(chain_id)?;
        Ok(Self::new(public_key, capability.account_type()))
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// The account type the legacy form implies for a key.
    pub fn infer_legacy_type(public_key: &[u8; 32]) -> AccountType {
        if public_key[..EVM_PADDING_LEN].iter().all(|b| *b == 0) {
            AccountType::EvmFamily
        } else {
            AccountType::NativeChain
        }
    }

    /// The account's address on `capability`'s chain.
    pub fn address_on(&self, capability: ChainCapability) -> Result<String, AddressError> {
        capability.address_of(&self.public_key)
    }

    /// Parse either text form, selected by length.
    pub fn decode(text: &str) -> Result<Self, AccountIdError> {
        if !text.is_ascii() {
            return Err(AccountIdError::InvalidEncoding("non-ASCII text".into()));
        }
        match text.len() {
            LEGACY_LEN => {
                let payload = strip_prefix(text)?;
                let (public_key, checksum) = split_payload(payload)?;
                let account_type = Self::infer_legacy_type(&public_key);
                if checksum != compute_checksum(None, &public_key) {
                    return Err(AccountIdError::InvalidChecksum);
                }
                Ok(Self::new(public_key, account_type))
            }
            MODERN_LEN => {
                let rest = strip_prefix(text)?;
                let (type_hex, payload) = rest.split_at(2);
                let type_byte = parse_type_byte(type_hex)?;
                let account_type = AccountType::from_u8(type_byte)
                    .ok_or(AccountIdError::InvalidTypeDiscriminant)?;
                let (public_key, checksum) = split_payload(payload)?;
                if checksum != compute_checksum(Some(type_byte), &public_key) {
                    return Err(AccountIdError::InvalidChecksum);
                }
                Ok(Self::new(public_key, account_type))
            }
            other => Err(AccountIdError::InvalidLength(other)),
        }
    }

    /// Legacy text form. The account type is not carried and is re-inferred
    /// from the key on decode.
    pub fn to_legacy_string(&self) -> String {
        let checksum = compute_checksum(None, &self.public_key);
        format!("{PREFIX}{}", encode_payload(&self.public_key, &checksum))
    }

    /// Modern text form with an explicit type byte.
    pub fn to_modern_string(&self) -> String {
        let type_byte = self.account_type.to_u8();
        let checksum = compute_checksum(Some(type_byte), &self.public_key);
        format!(
            "{PREFIX}{type_byte:02X}{}",
            encode_payload(&self.public_key, &checksum)
        )
    }

    /// Whether the legacy form decodes back to this account.
    pub fn is_legacy_representable(&self) -> bool {
        self.account_type != AccountType::SolanaFamily
            && Self::infer_legacy_type(&self.public_key) == self.account_type
    }

    /// The preferred text form: legacy for native and EVM accounts, modern
    /// for Solana.
    pub fn to_text(&self) -> String {
        match self.account_type {
            AccountType::SolanaFamily => self.to_modern_string(),
            AccountType::NativeChain | AccountType::EvmFamily => self.to_legacy_string(),
        }
    }
}

/// Encode the account id for `public_key` on `chain_id`.
pub fn encode(
    public_key: [u8; 32],
    chain_id: ChainId,
    registry: &ChainRegistry,
) -> Result<String, AddressError> {
    Ok(AccountId::for_chain(registry, chain_id, public_key)?.to_text())
}

fn compute_checksum(type_byte: Option<u8>, public_key: &[u8; 32]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Sha512_256::new();
    hasher.update(CHECKSUM_DOMAIN);
    if let Some(t) = type_byte {
        hasher.update([t]);
    }
    hasher.update(public_key);
    let digest = hasher.finalize();

    let mut checksum = [0u8; CHECKSUM_LEN];
    checksum.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    checksum
}

fn encode_payload(public_key: &[u8; 32], checksum: &[u8; CHECKSUM_LEN]) -> String {
    let mut raw = Vec::with_capacity(32 + CHECKSUM_LEN);
    raw.extend_from_slice(public_key);
    raw.extend_from_slice(checksum);
    base32::encode(&raw)
}

fn strip_prefix(text: &str) -> Result<&str, AccountIdError> {
    text.strip_prefix(PREFIX)
        .ok_or_else(|| AccountIdError::InvalidEncoding(format!("missing {PREFIX} prefix")))
}

fn parse_type_byte(hex: &str) -> Result<u8, AccountIdError> {
    if !hex
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
    {
        return Err(AccountIdError::InvalidEncoding(format!(
            "type byte {hex:?} is not uppercase hex"
        )));
    }
    u8::from_str_radix(hex, 16).map_err(|e| AccountIdError::InvalidEncoding(e.to_string()))
}

fn split_payload(payload: &str) -> Result<([u8; 32], [u8; CHECKSUM_LEN]), AccountIdError> {
    let raw = base32::decode(payload)
        .ok_or_else(|| AccountIdError::InvalidEncoding("payload is not base32".into()))?;
    if raw.len() != 32 + CHECKSUM_LEN {
        return Err(AccountIdError::InvalidLength(raw.len()));
    }
    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(&raw[..32]);
    let mut checksum = [0u8; CHECKSUM_LEN];
    checksum.copy_from_slice(&raw[32..]);
    Ok((public_key, checksum))
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_text())
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::decode(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "C3_L6VD42QWIR2ESDCZKY7B7TIYVSZNLKKLNHFODICR35B4YPOULFK6USCS";
    const EXAMPLE_KEY: &str = "5faa3e6a164474490c59563e1fcd18acb2d5a94b69cae1a051df43cc3dd45955";
    const EVM_LEGACY: &str = "C3_AAAAAAAAAAAAAAAAAAAFVLVWAU7T5FGJXGQJ6M3GSQ26P3Y35LWUS3KE";

    fn counting_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        for (i, b) in key.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        key
    }

    #[test]
    fn test_decode_example() {
        let id = AccountId::decode(EXAMPLE).unwrap();
        assert_eq!(hex_key(&id), EXAMPLE_KEY);
        assert_eq!(id.account_type(), AccountType::NativeChain);
        assert_eq!(id.to_legacy_string(), EXAMPLE);
        assert_eq!(id.to_string(), EXAMPLE);
    }

    fn hex_key(id: &AccountId) -> String {
        id.public_key().iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn test_legacy_infers_evm() {
        let id = AccountId::decode(EVM_LEGACY).unwrap();
        assert_eq!(id.account_type(), AccountType::EvmFamily);
        assert_eq!(&id.public_key()[..12], &[0u8; 12]);
        assert_eq!(
            id.address_on(ChainCapability::Evm(ChainId::ETHEREUM)).unwrap(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_modern_vectors() {
        let key = counting_key();
        let cases = [
            (
                AccountType::NativeChain,
                "C3_00AEBAGBAFAYDQQCIKBMGA2DQPCAIREEYUCULBOGAZDINRYHI6D4QOGHAT",
            ),
            (
                AccountType::EvmFamily,
                "C3_01AEBAGBAFAYDQQCIKBMGA2DQPCAIREEYUCULBOGAZDINRYHI6D4QM6DCQ",
            ),
            (
                AccountType::SolanaFamily,
                "C3_02AEBAGBAFAYDQQCIKBMGA2DQPCAIREEYUCULBOGAZDINRYHI6D4QLLNCJ",
            ),
        ];
        for (account_type, text) in cases {
            let id = AccountId::new(key, account_type);
            assert_eq!(id.to_modern_string(), text);
            assert_eq!(AccountId::decode(text).unwrap(), id);
        }
    }

    #[test]
    fn test_single_character_tamper() {
        const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
        for i in PREFIX.len()..EXAMPLE.len() {
            let original = EXAMPLE.as_bytes()[i] as char;
            let replacement = ALPHABET.chars().find(|c| *c != original).unwrap();
            let mut tampered = EXAMPLE.to_string();
            tampered.replace_range(i..i + 1, &replacement.to_string());

            let err = AccountId::decode(&tampered).unwrap_err();
            assert!(
                matches!(
                    err,
                    AccountIdError::InvalidChecksum | AccountIdError::InvalidLength(_)
                ),
                "position {i}: {err:?}"
            );
        }
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(
            AccountId::decode("C3_SHORT"),
            Err(AccountIdError::InvalidLength(8))
        );
        assert!(matches!(
            AccountId::decode(&EXAMPLE.replacen("C3_", "C4_", 1)),
            Err(AccountIdError::InvalidEncoding(_))
        ));

        let modern = AccountId::new(counting_key(), AccountType::NativeChain).to_modern_string();
        assert_eq!(
            AccountId::decode(&modern.replacen("C3_00", "C3_07", 1)),
            Err(AccountIdError::InvalidTypeDiscriminant)
        );
        assert!(matches!(
            AccountId::decode(&modern.replacen("C3_00", "C3_0z", 1)),
            Err(AccountIdError::InvalidEncoding(_))
        ));
        assert!(matches!(
            AccountId::decode(&EXAMPLE.to_lowercase().replacen("c3_", "C3_", 1)),
            Err(AccountIdError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_encode_selects_form() {
        let registry = ChainRegistry::standard();
        let key = counting_key();

        let native = encode(key, ChainId::ALGORAND, &registry).unwrap();
        assert_eq!(native.len(), LEGACY_LEN);

        let solana = encode(key, ChainId::SOLANA, &registry).unwrap();
        assert_eq!(solana.len(), MODERN_LEN);
        assert!(solana.starts_with("C3_02"));

        assert!(encode(key, ChainId(999), &registry).is_err());
    }

    #[test]
    fn test_from_address() {
        let evm = ChainCapability::Evm(ChainId::ETHEREUM);
        let id =
            AccountId::from_address(evm, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(id.to_string(), EVM_LEGACY);
        assert!(id.is_legacy_representable());

        let sol = AccountId::new(counting_key(), AccountType::SolanaFamily);
        assert!(!sol.is_legacy_representable());
    }

    #[test]
    fn test_serde_as_text() {
        let id = AccountId::decode(EXAMPLE).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{EXAMPLE}\""));
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<AccountId>("\"C3_nope\"").is_err());
    }
}
