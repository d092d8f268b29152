//! Error types for registry operations.

use payproof_canonical::{Address, PaymentMethod, ProviderHash, RecordDigestError};
use payproof_core::VerificationError;
use thiserror::Error;

/// Errors from registry mutations, stores and the batched lifecycle.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Add of a hash that is already allow-listed.
    #[error("provider hash {provider_hash} is already registered for {method}")]
    ProviderHashAlreadyRegistered {
        /// Registry payment method.
        method: PaymentMethod,
        /// Offending hash.
        provider_hash: ProviderHash,
    },
    /// Remove of a hash that is not allow-listed.
    #[error("provider hash {provider_hash} is not registered for {method}")]
    ProviderHashNotRegistered {
        /// Registry payment method.
        method: PaymentMethod,
        /// Offending hash.
        provider_hash: ProviderHash,
    },
    /// Caller is not an operator of this registry.
    #[error("{caller} is not authorized to mutate the {method} registry")]
    UnauthorizedRegistryMutation {
        /// Registry payment method.
        method: PaymentMethod,
        /// Rejected caller.
        caller: Address,
    },
    /// The execution layer rejected a batch; nothing was submitted.
    #[error("batch submission failed: {0}")]
    BatchSubmissionFailed(String),
    /// A proposal with the same content was already submitted.
    #[error("proposal already exists at {0}")]
    ProposalExists(String),
    /// A proposal was planned against a registry head that is no longer
    /// current.
    #[error("proposal for {method} was planned against {base}, registry head is {head}")]
    StaleProposal {
        /// Registry payment method.
        method: PaymentMethod,
        /// Head recorded in the proposal.
        base: String,
        /// Current head.
        head: String,
    },
    /// A proposal or journal record targets another payment method.
    #[error("expected payment method {expected}, found {found}")]
    MethodMismatch {
        /// Method of the registry.
        expected: PaymentMethod,
        /// Method named by the proposal or record.
        found: PaymentMethod,
    },
    /// A replayed audit record does not extend the chain.
    #[error("audit chain broken at sequence {sequence}: {reason}")]
    ChainBroken {
        /// Position of the offending record.
        sequence: u64,
        /// What failed.
        reason: String,
    },
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] payproof_journal::JournalError),
    /// Record digest could not be computed.
    #[error("record digest error: {0}")]
    Digest(#[from] RecordDigestError),
    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a release gate refuses a proof.
#[derive(Error, Debug)]
pub enum GateError {
    /// The proof itself failed verification.
    #[error("proof rejected: {0}")]
    Verification(#[from] VerificationError),
    /// The claim context names no provider hash.
    #[error("claim context carries no providerHash")]
    MissingProviderHash,
    /// The extraction template is not allow-listed for this method.
    #[error("provider hash {provider_hash} is not registered for {method}")]
    UnregisteredProviderHash {
        /// Gate payment method.
        method: PaymentMethod,
        /// Hash named by the claim.
        provider_hash: ProviderHash,
    },
}
