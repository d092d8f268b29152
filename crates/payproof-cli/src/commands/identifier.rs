//! Identifier command: recompute a claim identifier and, optionally, the
//! sign data witnesses cover.

use payproof_core::{ClaimInfo, CompleteClaimData};
use serde_json::json;

pub struct SignDataArgs {
    pub owner: String,
    pub timestamp_s: u64,
    pub epoch: u64,
}

pub fn run(
    input: Option<String>,
    sign_data: Option<SignDataArgs>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = super::read_input(input.as_deref())?;
    let info: ClaimInfo =
        serde_json::from_str(&text).map_err(|e| format!("Invalid claim info: {}", e))?;
    let identifier = info.identifier()?;

    let sign_data = sign_data.map(|args| {
        CompleteClaimData {
            identifier,
            owner: args.owner,
            timestamp_s: args.timestamp_s,
            epoch: args.epoch,
        }
        .sign_data()
    });

    if json_output {
        crate::output::print_json(&json!({
            "identifier": identifier,
            "signData": sign_data,
        }))?;
    } else {
        println!("{}", identifier);
        if let Some(data) = sign_data {
            println!("{}", data);
        }
    }
    Ok(())
}
