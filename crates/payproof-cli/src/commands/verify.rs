//! Verify command implementation.

use crate::config::Config;
use payproof_canonical::{Address, PaymentMethod};
use payproof_core::{normalize_proof, Accepted, Ed25519Recovery, ThresholdVerifier};
use payproof_registry::{ReleaseGate, SharedRegistry};
use serde_json::json;

pub struct VerifyArgs {
    pub input: Option<String>,
    pub witnesses: Vec<Address>,
    pub threshold: Option<usize>,
    pub method: Option<PaymentMethod>,
    pub json: bool,
}

pub fn run(config: &Config, args: VerifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = super::read_input(args.input.as_deref())?;
    let proof = normalize_proof(text.as_bytes())?;

    let witnesses = config.witness_set(&args.witnesses)?;
    let threshold = config.threshold(args.threshold)?;
    let verifier = ThresholdVerifier::new(Ed25519Recovery);

    let (accepted, provider_hash): (Accepted, _) = match args.method {
        None => (verifier.verify(&proof, &witnesses, threshold)?, None),
        Some(method) => {
            let registry = super::registry::open(config, &method)?;
            let gate = ReleaseGate::new(verifier, witnesses, threshold, SharedRegistry::new(registry));
            let approval = gate.check(&proof)?;
            (approval.accepted, approval.context.provider_hash)
        }
    };

    if args.json {
        crate::output::print_json(&json!({
            "status": "ok",
            "identifier": accepted.identifier,
            "attestingWitnesses": accepted.attesting_witnesses,
            "requiredThreshold": accepted.required_threshold,
            "providerHash": provider_hash,
            "isAppclipProof": proof.is_appclip_proof,
        }))?;
    } else {
        println!(
            "OK {} ({} of {} required witnesses)",
            accepted.identifier,
            accepted.attesting_witnesses.len(),
            accepted.required_threshold
        );
        if let Some(hash) = provider_hash {
            println!("provider hash {} is registered", hash);
        }
    }
    Ok(())
}
