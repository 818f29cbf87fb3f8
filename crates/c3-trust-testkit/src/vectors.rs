//! Golden test vectors for deterministic verification.
//!
//! Account ids and addresses must match what other venue clients and the
//! on-chain verifier produce byte for byte.

use c3_trust::{AccountId, AccountType, ChainCapability, ChainId};

/// An account id vector.
#[derive(Debug, Clone)]
pub struct AccountIdVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Venue public key (hex).
    pub public_key: &'static str,
    pub account_type: AccountType,
    /// Expected text form.
    pub text: &'static str,
    /// Whether `text` is the modern (typed) form.
    pub modern: bool,
}

/// An address vector for one chain.
#[derive(Debug, Clone)]
pub struct AddressVector {
    pub name: &'static str,
    pub chain: ChainCapability,
    /// Venue public key (hex).
    pub public_key: &'static str,
    /// Expected canonical address.
    pub address: &'static str,
}

const COUNTING_KEY: &str = "0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20";
const EXAMPLE_KEY: &str = "5faa3e6a164474490c59563e1fcd18acb2d5a94b69cae1a051df43cc3dd45955";
const EVM_KEY: &str = "0000000000000000000000005aaeb6053f3e94c9b9a09f33669435e7ef1beaed";

/// Get all account id vectors.
pub fn account_id_vectors() -> Vec<AccountIdVector> {
    vec![
        AccountIdVector {
            name: "legacy native account",
            public_key: EXAMPLE_KEY,
            account_type: AccountType::NativeChain,
            text: "C3_L6VD42QWIR2ESDCZKY7B7TIYVSZNLKKLNHFODICR35B4YPOULFK6USCS",
            modern: false,
        },
        AccountIdVector {
            name: "legacy EVM account",
            public_key: EVM_KEY,
            account_type: AccountType::EvmFamily,
            text: "C3_AAAAAAAAAAAAAAAAAAAFVLVWAU7T5FGJXGQJ6M3GSQ26P3Y35LWUS3KE",
            modern: false,
        },
        AccountIdVector {
            name: "legacy counting key",
            public_key: COUNTING_KEY,
            account_type: AccountType::NativeChain,
            text: "C3_AEBAGBAFAYDQQCIKBMGA2DQPCAIREEYUCULBOGAZDINRYHI6D4QMT4IQ",
            modern: false,
        },
        AccountIdVector {
            name: "modern native account",
            public_key: EXAMPLE_KEY,
            account_type: AccountType::NativeChain,
            text: "C3_00L6VD42QWIR2ESDCZKY7B7TIYVSZNLKKLNHFODICR35B4YPOULFKVKMQS",
            modern: true,
        },
        AccountIdVector {
            name: "modern EVM account",
            public_key: EVM_KEY,
            account_type: AccountType::EvmFamily,
            text: "C3_01AAAAAAAAAAAAAAAAAAAFVLVWAU7T5FGJXGQJ6M3GSQ26P3Y35LW6DBJJ",
            modern: true,
        },
        AccountIdVector {
            name: "modern solana account",
            public_key: COUNTING_KEY,
            account_type: AccountType::SolanaFamily,
            text: "C3_02AEBAGBAFAYDQQCIKBMGA2DQPCAIREEYUCULBOGAZDINRYHI6D4QLLNCJ",
            modern: true,
        },
    ]
}

/// Get all address vectors.
pub fn address_vectors() -> Vec<AddressVector> {
    vec![
        AddressVector {
            name: "algorand zero address",
            chain: ChainCapability::Algorand,
            public_key: "0000000000000000000000000000000000000000000000000000000000000000",
            address: "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ",
        },
        AddressVector {
            name: "algorand example key",
            chain: ChainCapability::Algorand,
            public_key: EXAMPLE_KEY,
            address: "L6VD42QWIR2ESDCZKY7B7TIYVSZNLKKLNHFODICR35B4YPOULFKWUIZUFA",
        },
        AddressVector {
            name: "solana system program",
            chain: ChainCapability::Solana,
            public_key: "0000000000000000000000000000000000000000000000000000000000000000",
            address: "11111111111111111111111111111111",
        },
        AddressVector {
            name: "EIP-55 mixed case",
            chain: ChainCapability::Evm(ChainId::ETHEREUM),
            public_key: EVM_KEY,
            address: "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        },
        AddressVector {
            name: "EIP-55 all caps",
            chain: ChainCapability::Evm(ChainId::ETHEREUM),
            public_key: "00000000000000000000000052908400098527886e0f7030069857d2e4169ee7",
            address: "0x52908400098527886E0F7030069857D2E4169EE7",
        },
    ]
}

/// Decode a 32-byte hex key from a vector.
pub fn key_from_hex(hex_key: &str) -> [u8; 32] {
    let bytes = hex::decode(hex_key).expect("vector key is hex");
    bytes.try_into().expect("vector key is 32 bytes")
}

/// Produce the text form a vector describes.
pub fn generate_account_id(vector: &AccountIdVector) -> String {
    let id = AccountId::new(key_from_hex(vector.public_key), vector.account_type);
    if vector.modern {
        id.to_modern_string()
    } else {
        id.to_legacy_string()
    }
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, produced)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let ids = account_id_vectors().into_iter().map(|v| {
        let produced = generate_account_id(&v);
        (v.name.to_string(), produced == v.text, produced)
    });
    let addresses = address_vectors().into_iter().map(|v| {
        let produced = v
            .chain
            .address_of(&key_from_hex(v.public_key))
            .unwrap_or_else(|e| e.to_string());
        (v.name.to_string(), produced == v.address, produced)
    });
    ids.chain(addresses).collect()
}
