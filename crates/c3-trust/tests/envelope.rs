//! End-to-end envelope signing and verification with local signers.

use bytes::Bytes;
use c3_trust::{
    build_message_to_sign, envelope, AccountType, ChainCapability, ChainId, ChainRegistry,
    EnvelopeHeader, Order, SignedEnvelope, SignerError, TrustError,
};
use c3_trust_testkit::{LocalEd25519Signer, LocalEvmSigner, RejectingSigner};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn scenario_order(account: [u8; 32]) -> Order {
    Order {
        account,
        nonce: 1_111_111,
        expires_on: 1_689_177_881,
        sell_slot_id: 0,
        sell_amount: 1_000_000,
        max_borrow: 0,
        buy_slot_id: 1,
        buy_amount: 2_050_000,
        max_repay: 0,
    }
}

fn header() -> EnvelopeHeader {
    EnvelopeHeader::new([0x11; 32], [0x22; 32], 1_689_177_881)
}

/// Re-derive the cached message after a field was changed, as an attacker
/// forging an envelope would.
fn refresh(mut env: SignedEnvelope) -> SignedEnvelope {
    env.message_to_sign = build_message_to_sign(&env.header, &env.operation)
        .unwrap()
        .into();
    env
}

#[tokio::test]
async fn test_order_signed_on_native_chain() -> anyhow::Result<()> {
    init_tracing();
    let registry = ChainRegistry::standard();
    let signer = LocalEd25519Signer::algorand([0x42; 32]);
    let order = scenario_order(signer.public_key());

    let signed = envelope::sign(header(), order.encode()?, &signer).await?;

    assert_eq!(signed.signer.account_type(), AccountType::NativeChain);
    assert_eq!(signed.signer.public_key(), &signer.public_key());
    assert!(signed.domain_prefix.is_empty());
    assert_eq!(signed.signature.len(), 64);

    assert!(envelope::verify(&signed, &registry));
    assert!(envelope::verify_with(&signed, ChainCapability::Algorand));
    assert!(!envelope::verify_with(
        &signed,
        ChainCapability::Evm(ChainId::ETHEREUM)
    ));

    assert_eq!(Order::decode(&signed.operation)?, order);
    Ok(())
}

#[tokio::test]
async fn test_evm_signer_envelope() -> anyhow::Result<()> {
    let registry = ChainRegistry::standard();
    let signer = LocalEvmSigner::ethereum([0x07; 32]);
    let order = scenario_order(*signer.account_id().public_key());

    let signed = envelope::sign(header(), order.encode()?, &signer).await?;

    assert_eq!(signed.signer.account_type(), AccountType::EvmFamily);
    assert_eq!(
        signed.domain_prefix,
        format!("\x19Ethereum Signed Message:\n{}", signed.message_to_sign.len()).into_bytes()
    );
    assert!(signed.signature_text().starts_with("0x"));
    assert!(envelope::verify(&signed, &registry));
    assert!(envelope::verify_with(
        &signed,
        ChainCapability::Evm(ChainId::POLYGON)
    ));
    assert!(!envelope::verify_with(&signed, ChainCapability::Algorand));
    Ok(())
}

#[tokio::test]
async fn test_solana_signer_envelope() -> anyhow::Result<()> {
    let registry = ChainRegistry::standard();
    let signer = LocalEd25519Signer::solana([0x33; 32]);

    let signed = envelope::sign(header(), Bytes::from_static(b"\x03delegate"), &signer).await?;

    assert_eq!(signed.signer.account_type(), AccountType::SolanaFamily);
    assert!(signed.signer.to_string().starts_with("C3_02"));
    assert!(envelope::verify(&signed, &registry));
    Ok(())
}

#[tokio::test]
async fn test_tampering_is_detected() -> anyhow::Result<()> {
    let registry = ChainRegistry::standard();
    let signer = LocalEd25519Signer::algorand([0x42; 32]);
    let signed = envelope::sign(
        header(),
        scenario_order(signer.public_key()).encode()?,
        &signer,
    )
    .await?;
    assert!(envelope::verify(&signed, &registry));

    for i in 0..32 {
        let mut env = signed.clone();
        env.header.target[i] ^= 0x01;
        assert!(!envelope::verify(&env, &registry), "stale target byte {i}");
        assert!(!envelope::verify(&refresh(env), &registry), "target byte {i}");

        let mut env = signed.clone();
        env.header.lease[i] ^= 0x01;
        assert!(!envelope::verify(&refresh(env), &registry), "lease byte {i}");
    }

    for i in 0..8 {
        let mut env = signed.clone();
        env.header.expiry ^= 1 << (8 * i);
        assert!(!envelope::verify(&refresh(env), &registry), "expiry byte {i}");
    }

    for i in 0..signed.operation.len() {
        let mut env = signed.clone();
        let mut op = env.operation.to_vec();
        op[i] ^= 0x01;
        env.operation = op.into();
        assert!(!envelope::verify(&refresh(env), &registry), "operation byte {i}");
    }

    let mut env = signed.clone();
    env.signature[0] ^= 0x01;
    assert!(!envelope::verify(&env, &registry));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_signing() -> anyhow::Result<()> {
    let registry = ChainRegistry::standard();
    let native = LocalEd25519Signer::algorand([0x01; 32]);
    let evm = LocalEvmSigner::ethereum([0x02; 32]);

    let first = EnvelopeHeader::with_random_lease([0x11; 32], 100);
    let second = EnvelopeHeader::with_random_lease([0x11; 32], 100);

    let (a, b, c) = tokio::join!(
        envelope::sign(first, Bytes::from_static(b"first"), &native),
        envelope::sign(second, Bytes::from_static(b"second"), &native),
        envelope::sign(first, Bytes::from_static(b"first"), &evm),
    );
    let (a, b, c) = (a?, b?, c?);

    assert_ne!(a.header.lease, b.header.lease);
    for env in [&a, &b, &c] {
        assert!(envelope::verify(env, &registry));
    }
    Ok(())
}

#[tokio::test]
async fn test_rejected_signing_surfaces_error() {
    let signer = RejectingSigner::new([0x09; 32]);
    let result = envelope::sign(header(), Bytes::from_static(b"op"), &signer).await;

    assert!(matches!(
        result,
        Err(TrustError::Signer(SignerError::Rejected(_)))
    ));
}
