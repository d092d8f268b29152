//! Batched registry lifecycle: plan locally, submit once, execute.
//!
//! Batch paths never fail on a single bad entry. Entries that would be
//! rejected are skipped with a warning and listed in the plan, and execution
//! reports per-operation failures without aborting the rest.
//!
//! Every plan records the audit-chain head it was validated against. The
//! proposal id covers that base, so retrying one plan is refused while a
//! re-plan after the registry moved gets a fresh id.

use crate::error::RegistryError;
use crate::event::{RegistryEvent, RegistryOperation};
use crate::registry::ProviderRegistry;
use crate::traits::RegistryStore;
use payproof_canonical::{compute_record_digest, Address, PaymentMethod, ProviderHash, RecordDigest};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Why a batch entry was left out of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Add of a hash the registry already holds.
    AlreadyRegistered,
    /// Remove of a hash the registry does not hold.
    NotRegistered,
    /// Hash already appears earlier in the same batch.
    DuplicateInBatch,
}

/// An entry left out of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// The rejected operation.
    pub operation: RegistryOperation,
    /// Why it was rejected.
    pub reason: SkipReason,
}

/// Pre-validated batch for one registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPlan {
    /// Target registry.
    pub method: PaymentMethod,
    /// Digest of the registry's latest record when planned; `None` for an
    /// empty history.
    pub base: Option<RecordDigest>,
    /// Operations that passed validation, in input order.
    pub operations: Vec<RegistryOperation>,
    /// Entries left out.
    pub skipped: Vec<SkippedEntry>,
}

impl BatchPlan {
    /// True if nothing would be submitted.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The proposal this plan submits.
    pub fn proposal(&self) -> Proposal {
        Proposal {
            method: self.method.clone(),
            base: self.base,
            operations: self.operations.clone(),
        }
    }
}

/// Validates `entries` against `registry`'s current membership.
///
/// Each hash may appear once per batch; later occurrences are skipped.
pub fn plan_batch<S: RegistryStore>(
    registry: &ProviderRegistry<S>,
    entries: impl IntoIterator<Item = RegistryOperation>,
) -> BatchPlan {
    let mut seen: HashSet<ProviderHash> = HashSet::new();
    let mut operations = Vec::new();
    let mut skipped = Vec::new();

    for operation in entries {
        let reason = if !seen.insert(operation.provider_hash) {
            Some(SkipReason::DuplicateInBatch)
        } else {
            match registry.check_membership(&operation) {
                Ok(()) => None,
                Err(RegistryError::ProviderHashAlreadyRegistered { .. }) => {
                    Some(SkipReason::AlreadyRegistered)
                }
                Err(_) => Some(SkipReason::NotRegistered),
            }
        };

        match reason {
            None => operations.push(operation),
            Some(reason) => {
                warn!(
                    method = %registry.method(),
                    provider_hash = %operation.provider_hash,
                    action = %operation.action,
                    ?reason,
                    "skipping batch entry"
                );
                skipped.push(SkippedEntry { operation, reason });
            }
        }
    }

    BatchPlan {
        method: registry.method().clone(),
        base: registry.head(),
        operations,
        skipped,
    }
}

/// A batch of registry mutations handed to the execution layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Target registry.
    pub method: PaymentMethod,
    /// Registry head the operations were validated against.
    pub base: Option<RecordDigest>,
    /// Operations to apply, in order.
    pub operations: Vec<RegistryOperation>,
}

impl Proposal {
    /// Content-derived identifier; equal batches planned against the same
    /// head share an id.
    pub fn id(&self) -> Result<RecordDigest, RegistryError> {
        Ok(compute_record_digest(self)?)
    }

    /// Reads a proposal document.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Acknowledgement from the execution layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    /// Id of the submitted proposal.
    pub proposal_id: RecordDigest,
    /// Where the execution layer holds it.
    pub location: String,
}

/// External execution layer (multisig, governance queue, ...).
pub trait ProposalSubmitter {
    /// Submits one proposal.
    fn submit(&mut self, proposal: &Proposal) -> Result<SubmissionReceipt, RegistryError>;
}

/// Submits the plan's valid operations in a single call.
///
/// Returns `Ok(None)` without calling the submitter when nothing is valid.
///
/// # Errors
///
/// Any submitter failure becomes `BatchSubmissionFailed`; the batch should
/// be re-planned and resubmitted as a whole.
pub fn submit_batch<P: ProposalSubmitter + ?Sized>(
    plan: &BatchPlan,
    submitter: &mut P,
) -> Result<Option<SubmissionReceipt>, RegistryError> {
    if plan.is_empty() {
        info!(method = %plan.method, skipped = plan.skipped.len(), "nothing to submit");
        return Ok(None);
    }

    let proposal = plan.proposal();
    let receipt = submitter.submit(&proposal).map_err(|e| {
        warn!(method = %plan.method, error = %e, "batch submission failed");
        RegistryError::BatchSubmissionFailed(e.to_string())
    })?;

    info!(
        method = %plan.method,
        operations = proposal.operations.len(),
        proposal_id = %receipt.proposal_id,
        location = %receipt.location,
        "proposal submitted"
    );
    Ok(Some(receipt))
}

/// Writes proposals as JSON documents into a directory.
///
/// File names derive from the proposal id, and existing files are never
/// overwritten, so a retried submission of the same batch is refused.
/// Documents are written to a temporary file and moved into place, so a
/// failed write leaves nothing behind.
#[derive(Debug, Clone)]
pub struct FileProposalSubmitter {
    dir: PathBuf,
}

impl FileProposalSubmitter {
    /// Submitter writing into `dir` (created on first use).
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a proposal would be written to.
    pub fn path_for(&self, proposal: &Proposal) -> Result<PathBuf, RegistryError> {
        let id = proposal.id()?.to_hex();
        let id = id.trim_start_matches("0x");
        Ok(self.dir.join(format!("{}-{}.json", proposal.method, id)))
    }
}

impl ProposalSubmitter for FileProposalSubmitter {
    fn submit(&mut self, proposal: &Proposal) -> Result<SubmissionReceipt, RegistryError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(proposal)?;

        let mut bytes = serde_json::to_vec_pretty(proposal)?;
        bytes.push(b'\n');
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(&bytes)?;
        staged.as_file().sync_all()?;

        match staged.persist_noclobber(&path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                return Err(RegistryError::ProposalExists(path.display().to_string()))
            }
            Err(e) => return Err(e.error.into()),
        }

        Ok(SubmissionReceipt {
            proposal_id: proposal.id()?,
            location: path.display().to_string(),
        })
    }
}

/// Outcome of executing a proposal.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// Records committed, in order.
    pub applied: Vec<RegistryEvent>,
    /// Operations that failed, with their errors.
    pub failed: Vec<(RegistryOperation, RegistryError)>,
}

impl ExecutionReport {
    /// True if every operation applied.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Applies a proposal through the single-operation path, one operation at a
/// time.
///
/// # Errors
///
/// `MethodMismatch` for another registry's proposal and `StaleProposal` when
/// the registry has moved past the head the proposal was planned against.
/// Per-operation failures land in the report.
pub fn execute_proposal<S: RegistryStore>(
    registry: &mut ProviderRegistry<S>,
    caller: &Address,
    proposal: &Proposal,
) -> Result<ExecutionReport, RegistryError> {
    if &proposal.method != registry.method() {
        return Err(RegistryError::MethodMismatch {
            expected: registry.method().clone(),
            found: proposal.method.clone(),
        });
    }
    let head = registry.head();
    if proposal.base != head {
        return Err(RegistryError::StaleProposal {
            method: registry.method().clone(),
            base: describe_head(proposal.base),
            head: describe_head(head),
        });
    }

    let mut report = ExecutionReport::default();
    for operation in &proposal.operations {
        match registry.apply(caller, *operation) {
            Ok(event) => report.applied.push(event),
            Err(err) => report.failed.push((*operation, err)),
        }
    }

    info!(
        method = %registry.method(),
        applied = report.applied.len(),
        failed = report.failed.len(),
        "proposal executed"
    );
    Ok(report)
}

fn describe_head(head: Option<RecordDigest>) -> String {
    head.map_or_else(|| "empty history".to_string(), |digest| digest.to_hex())
}
