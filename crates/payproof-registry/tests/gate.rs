use payproof_canonical::{canonicalize, Address, PaymentMethod, ProviderHash};
use payproof_core::{
    ClaimInfo, CompleteClaimData, Ed25519Recovery, Proof, SignedClaim, ThresholdVerifier,
    VerificationError, WitnessKey, WitnessSet,
};
use payproof_registry::{
    GateError, MemoryStore, ProviderRegistry, RegistryOperation, ReleaseGate, SharedRegistry,
};
use serde_json::{json, Value};

fn operator() -> Address {
    Address::parse("0x00000000000000000000000000000000000000aa").unwrap()
}

fn template_hash() -> ProviderHash {
    ProviderHash::parse("0x73a41b2bcac0e9d60ed438cd53bff9f840e756193b02f74ba5926d32ade392d7")
        .unwrap()
}

fn make_proof(witness: &WitnessKey, context: Value) -> Proof {
    let claim_info = ClaimInfo {
        provider: "http".to_string(),
        parameters: canonicalize(&json!({"method": "GET", "url": "https://account.venmo.com"}))
            .unwrap(),
        context: canonicalize(&context).unwrap(),
    };
    let claim = CompleteClaimData {
        identifier: claim_info.identifier().unwrap(),
        owner: "0xf9f25d1b846625674901ace47d6313d1ac795265".to_string(),
        timestamp_s: 1_717_390_000,
        epoch: 1,
    };
    let signature = witness.sign(claim.sign_data().as_bytes());
    Proof {
        claim_info,
        signed_claim: SignedClaim {
            claim,
            signatures: vec![signature],
        },
        is_appclip_proof: false,
    }
}

fn make_gate(witness: &WitnessKey) -> (ReleaseGate<Ed25519Recovery, MemoryStore>, SharedRegistry<MemoryStore>) {
    let registry = SharedRegistry::new(ProviderRegistry::new(
        PaymentMethod::parse("venmo").unwrap(),
        [operator()],
        MemoryStore::new(),
    ));
    let gate = ReleaseGate::new(
        ThresholdVerifier::new(Ed25519Recovery),
        WitnessSet::new([witness.address()]),
        1,
        registry.clone(),
    );
    (gate, registry)
}

#[test]
fn registered_template_passes() {
    let witness = WitnessKey::from_seed(&[7; 32]);
    let (gate, registry) = make_gate(&witness);
    registry
        .apply(&operator(), RegistryOperation::add(template_hash()))
        .unwrap();

    let proof = make_proof(
        &witness,
        json!({"extractedParameters": {"amount": "1.01"}, "providerHash": template_hash().to_hex()}),
    );
    let approval = gate.check(&proof).unwrap();
    assert_eq!(approval.context.parameter("amount"), Some("1.01"));
    assert_eq!(approval.context.provider_hash, Some(template_hash()));
}

#[test]
fn unregistered_template_is_refused_even_with_valid_signatures() {
    let witness = WitnessKey::from_seed(&[7; 32]);
    let (gate, _registry) = make_gate(&witness);

    let proof = make_proof(&witness, json!({"providerHash": template_hash().to_hex()}));
    assert!(matches!(
        gate.check(&proof),
        Err(GateError::UnregisteredProviderHash { .. })
    ));
}

#[test]
fn removed_template_stops_passing() {
    let witness = WitnessKey::from_seed(&[7; 32]);
    let (gate, registry) = make_gate(&witness);
    registry
        .apply(&operator(), RegistryOperation::add(template_hash()))
        .unwrap();
    let proof = make_proof(&witness, json!({"providerHash": template_hash().to_hex()}));
    assert!(gate.check(&proof).is_ok());

    registry
        .apply(&operator(), RegistryOperation::remove(template_hash()))
        .unwrap();
    assert!(gate.check(&proof).is_err());
}

#[test]
fn missing_provider_hash_is_refused() {
    let witness = WitnessKey::from_seed(&[7; 32]);
    let (gate, _registry) = make_gate(&witness);
    let proof = make_proof(&witness, json!({"contextMessage": "nonce"}));
    assert!(matches!(
        gate.check(&proof),
        Err(GateError::MissingProviderHash)
    ));
}

#[test]
fn verification_failure_comes_first() {
    let witness = WitnessKey::from_seed(&[7; 32]);
    let outsider = WitnessKey::from_seed(&[8; 32]);
    let (gate, _registry) = make_gate(&witness);
    let proof = make_proof(&outsider, json!({"providerHash": template_hash().to_hex()}));
    assert!(matches!(
        gate.check(&proof),
        Err(GateError::Verification(
            VerificationError::InsufficientWitnessSignatures { .. }
        ))
    ));
}
