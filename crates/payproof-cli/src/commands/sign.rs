//! Sign command: produces an extension-shaped proof signed by a local
//! witness key. Development use only.

use payproof_core::{encode_hex_bytes, ClaimInfo, CompleteClaimData, WitnessKey};
use serde_json::json;

pub struct SignArgs {
    pub input: Option<String>,
    pub seeds: Vec<String>,
    pub owner: String,
    pub timestamp_s: u64,
    pub epoch: u64,
}

pub fn run(args: SignArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = super::read_input(args.input.as_deref())?;
    let info: ClaimInfo =
        serde_json::from_str(&text).map_err(|e| format!("Invalid claim info: {}", e))?;
    let keys = args
        .seeds
        .iter()
        .map(|seed| WitnessKey::from_hex(seed))
        .collect::<Result<Vec<_>, _>>()?;
    let first = keys.first().ok_or("at least one --seed is required")?;

    let claim = CompleteClaimData {
        identifier: info.identifier()?,
        owner: args.owner,
        timestamp_s: args.timestamp_s,
        epoch: args.epoch,
    };
    let sign_data = claim.sign_data();

    // Extension proofs carry one signature; extra keys emit the app-clip shape.
    let proof = if keys.len() == 1 {
        json!({
            "claim": {
                "provider": info.provider,
                "parameters": info.parameters,
                "context": info.context,
                "identifier": claim.identifier,
                "owner": claim.owner,
                "timestampS": claim.timestamp_s,
                "epoch": claim.epoch,
            },
            "signatures": {
                "attestorAddress": first.address(),
                "claimSignature": encode_hex_bytes(&first.sign(sign_data.as_bytes())),
            }
        })
    } else {
        let signatures: Vec<String> = keys
            .iter()
            .map(|k| encode_hex_bytes(&k.sign(sign_data.as_bytes())))
            .collect();
        let witnesses: Vec<_> = keys
            .iter()
            .map(|k| json!({"id": k.address(), "url": ""}))
            .collect();
        json!({
            "claimData": {
                "provider": info.provider,
                "parameters": info.parameters,
                "context": info.context,
                "identifier": claim.identifier,
                "owner": claim.owner,
                "timestampS": claim.timestamp_s,
                "epoch": claim.epoch,
            },
            "signatures": signatures,
            "witnesses": witnesses,
        })
    };

    crate::output::print_json(&proof)?;
    Ok(())
}
