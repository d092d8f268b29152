//! Batch commands: plan, propose, execute.

use crate::config::Config;
use crate::output::print_json;
use payproof_canonical::{Address, PaymentMethod};
use payproof_registry::{
    execute_proposal, plan_batch, submit_batch, BatchPlan, FileProposalSubmitter, Proposal,
    RegistryOperation,
};
use serde_json::json;

fn load_plan(
    config: &Config,
    method: &PaymentMethod,
    input: Option<String>,
) -> Result<BatchPlan, Box<dyn std::error::Error>> {
    let text = super::read_input(input.as_deref())?;
    let entries: Vec<RegistryOperation> =
        serde_json::from_str(&text).map_err(|e| format!("Invalid batch entries: {}", e))?;
    let registry = super::registry::open(config, method)?;
    Ok(plan_batch(&registry, entries))
}

pub fn plan(
    config: &Config,
    method: PaymentMethod,
    input: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&load_plan(config, &method, input)?)?;
    Ok(())
}

pub fn propose(
    config: &Config,
    method: PaymentMethod,
    input: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = load_plan(config, &method, input)?;
    let mut submitter = FileProposalSubmitter::new(&config.proposals_dir);

    match submit_batch(&plan, &mut submitter)? {
        Some(receipt) => print_json(&json!({
            "submitted": plan.operations.len(),
            "skipped": plan.skipped,
            "receipt": receipt,
        }))?,
        None => print_json(&json!({
            "submitted": 0,
            "skipped": plan.skipped,
        }))?,
    }
    Ok(())
}

pub fn execute(
    config: &Config,
    caller: Address,
    input: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = super::read_input(input.as_deref())?;
    let proposal: Proposal =
        serde_json::from_str(&text).map_err(|e| format!("Invalid proposal: {}", e))?;

    let mut registry = super::registry::open(config, &proposal.method)?;
    let report = execute_proposal(&mut registry, &caller, &proposal)?;

    let failed: Vec<_> = report
        .failed
        .iter()
        .map(|(operation, err)| json!({"operation": operation, "error": err.to_string()}))
        .collect();
    print_json(&json!({
        "applied": report.applied,
        "failed": failed,
    }))?;

    if !report.is_complete() {
        return Err(format!("{} operation(s) failed", report.failed.len()).into());
    }
    Ok(())
}
