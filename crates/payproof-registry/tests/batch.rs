use payproof_canonical::{Address, PaymentMethod, ProviderHash};
use payproof_registry::{
    execute_proposal, plan_batch, submit_batch, FileProposalSubmitter, MemoryStore, Proposal,
    ProposalSubmitter, ProviderRegistry, RegistryError, RegistryOperation, SkipReason,
    SubmissionReceipt,
};
use tempfile::TempDir;

fn operator() -> Address {
    Address::parse("0x00000000000000000000000000000000000000aa").unwrap()
}

fn make_registry() -> ProviderRegistry<MemoryStore> {
    let mut registry = ProviderRegistry::new(
        PaymentMethod::parse("venmo").unwrap(),
        [operator()],
        MemoryStore::new(),
    );
    registry.add(&operator(), hash(0)).unwrap();
    registry
}

fn hash(n: u8) -> ProviderHash {
    ProviderHash::digest(&[n])
}

#[derive(Default)]
struct RecordingSubmitter {
    calls: Vec<Proposal>,
    fail: bool,
}

impl ProposalSubmitter for RecordingSubmitter {
    fn submit(&mut self, proposal: &Proposal) -> Result<SubmissionReceipt, RegistryError> {
        self.calls.push(proposal.clone());
        if self.fail {
            return Err(RegistryError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "execution layer offline",
            )));
        }
        Ok(SubmissionReceipt {
            proposal_id: proposal.id()?,
            location: "memory".to_string(),
        })
    }
}

#[test]
fn plan_skips_invalid_and_duplicate_entries() {
    let registry = make_registry();
    let plan = plan_batch(
        &registry,
        [
            RegistryOperation::add(hash(0)),
            RegistryOperation::add(hash(1)),
            RegistryOperation::add(hash(1)),
            RegistryOperation::remove(hash(2)),
            RegistryOperation::remove(hash(0)),
        ],
    );

    assert_eq!(plan.operations, vec![RegistryOperation::add(hash(1))]);
    let reasons: Vec<_> = plan.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(
        reasons,
        vec![
            SkipReason::AlreadyRegistered,
            SkipReason::DuplicateInBatch,
            SkipReason::NotRegistered,
            SkipReason::DuplicateInBatch,
        ]
    );
    assert_eq!(registry.history().len(), 1);
}

#[test]
fn submit_makes_one_call_with_the_valid_subset() {
    let registry = make_registry();
    let plan = plan_batch(
        &registry,
        [
            RegistryOperation::add(hash(1)),
            RegistryOperation::add(hash(0)),
            RegistryOperation::add(hash(2)),
        ],
    );

    let mut submitter = RecordingSubmitter::default();
    let receipt = submit_batch(&plan, &mut submitter).unwrap().unwrap();
    assert_eq!(submitter.calls.len(), 1);
    assert_eq!(submitter.calls[0].operations.len(), 2);
    assert_eq!(receipt.proposal_id, plan.proposal().id().unwrap());
}

#[test]
fn empty_plan_submits_nothing() {
    let registry = make_registry();
    let plan = plan_batch(&registry, [RegistryOperation::add(hash(0))]);
    assert!(plan.is_empty());

    let mut submitter = RecordingSubmitter::default();
    assert!(submit_batch(&plan, &mut submitter).unwrap().is_none());
    assert!(submitter.calls.is_empty());
}

#[test]
fn submitter_failure_fails_the_whole_batch() {
    let registry = make_registry();
    let plan = plan_batch(&registry, [RegistryOperation::add(hash(1))]);
    let mut submitter = RecordingSubmitter {
        fail: true,
        ..Default::default()
    };
    assert!(matches!(
        submit_batch(&plan, &mut submitter),
        Err(RegistryError::BatchSubmissionFailed(_))
    ));
}

#[test]
fn file_submitter_refuses_duplicate_proposals() {
    let temp_dir = TempDir::new().unwrap();
    let registry = make_registry();
    let plan = plan_batch(&registry, [RegistryOperation::add(hash(1))]);

    let mut submitter = FileProposalSubmitter::new(temp_dir.path().join("proposals"));
    let receipt = submit_batch(&plan, &mut submitter).unwrap().unwrap();
    let written = Proposal::load(&receipt.location).unwrap();
    assert_eq!(written, plan.proposal());

    let retry = submit_batch(&plan, &mut submitter);
    assert!(matches!(retry, Err(RegistryError::BatchSubmissionFailed(_))));

    let entries: Vec<_> = std::fs::read_dir(temp_dir.path().join("proposals"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries, vec![std::path::PathBuf::from(&receipt.location)]);
}

#[test]
fn failed_file_submission_leaves_nothing_behind() {
    let temp_dir = TempDir::new().unwrap();
    let registry = make_registry();
    let plan = plan_batch(&registry, [RegistryOperation::add(hash(1))]);

    let dir = temp_dir.path().join("proposals");
    let mut submitter = FileProposalSubmitter::new(&dir);
    let target = submitter.path_for(&plan.proposal()).unwrap();
    std::fs::create_dir_all(&target).unwrap();

    assert!(submit_batch(&plan, &mut submitter).is_err());
    let entries: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries, vec![target.clone()]);

    std::fs::remove_dir(&target).unwrap();
    let receipt = submit_batch(&plan, &mut submitter).unwrap().unwrap();
    assert_eq!(Proposal::load(&receipt.location).unwrap(), plan.proposal());
}

#[test]
fn same_batch_can_be_proposed_again_after_the_registry_moves() {
    let temp_dir = TempDir::new().unwrap();
    let mut registry = make_registry();
    let mut submitter = FileProposalSubmitter::new(temp_dir.path().join("proposals"));

    let first = plan_batch(&registry, [RegistryOperation::add(hash(1))]);
    let receipt = submit_batch(&first, &mut submitter).unwrap().unwrap();
    let proposal = Proposal::load(&receipt.location).unwrap();
    assert!(execute_proposal(&mut registry, &operator(), &proposal)
        .unwrap()
        .is_complete());

    registry.remove(&operator(), hash(1)).unwrap();

    let second = plan_batch(&registry, [RegistryOperation::add(hash(1))]);
    assert_eq!(second.operations, first.operations);
    assert_ne!(second.proposal().id().unwrap(), first.proposal().id().unwrap());
    let receipt = submit_batch(&second, &mut submitter).unwrap().unwrap();
    let proposal = Proposal::load(&receipt.location).unwrap();
    assert!(execute_proposal(&mut registry, &operator(), &proposal)
        .unwrap()
        .is_complete());
    assert!(registry.is_registered(&hash(1)));
}

#[test]
fn proposal_planned_against_an_old_head_is_refused() {
    let mut registry = make_registry();
    let proposal = plan_batch(&registry, [RegistryOperation::add(hash(1))]).proposal();
    registry.add(&operator(), hash(2)).unwrap();

    assert!(matches!(
        execute_proposal(&mut registry, &operator(), &proposal),
        Err(RegistryError::StaleProposal { .. })
    ));
    assert!(!registry.is_registered(&hash(1)));
}

#[test]
fn execute_applies_operations_and_reports_failures() {
    let mut registry = make_registry();
    let proposal = Proposal {
        method: PaymentMethod::parse("venmo").unwrap(),
        base: registry.head(),
        operations: vec![
            RegistryOperation::add(hash(1)),
            RegistryOperation::add(hash(0)),
            RegistryOperation::remove(hash(0)),
        ],
    };

    let report = execute_proposal(&mut registry, &operator(), &proposal).unwrap();
    assert_eq!(report.applied.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(!report.is_complete());
    assert!(matches!(
        report.failed[0].1,
        RegistryError::ProviderHashAlreadyRegistered { .. }
    ));
    assert_eq!(registry.enumerate(), vec![hash(1)]);
}

#[test]
fn execute_rejects_foreign_method_and_unauthorized_caller() {
    let mut registry = make_registry();
    let foreign = Proposal {
        method: PaymentMethod::parse("cashapp").unwrap(),
        base: registry.head(),
        operations: vec![RegistryOperation::add(hash(1))],
    };
    assert!(matches!(
        execute_proposal(&mut registry, &operator(), &foreign),
        Err(RegistryError::MethodMismatch { .. })
    ));

    let stranger = Address::parse("0x00000000000000000000000000000000000000bb").unwrap();
    let proposal = Proposal {
        method: PaymentMethod::parse("venmo").unwrap(),
        base: registry.head(),
        operations: vec![RegistryOperation::add(hash(1))],
    };
    let report = execute_proposal(&mut registry, &stranger, &proposal).unwrap();
    assert!(report.applied.is_empty());
    assert!(matches!(
        report.failed[0].1,
        RegistryError::UnauthorizedRegistryMutation { .. }
    ));
}
