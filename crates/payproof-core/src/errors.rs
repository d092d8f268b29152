use payproof_canonical::{CanonicalizationError, ClaimIdentifier};
use thiserror::Error;

/// Reasons a proof is rejected. Every variant is terminal for the proof.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// Claim context is not parseable structured data.
    #[error("malformed claim context: {0}")]
    MalformedContext(String),
    /// Raw proof matches neither accepted delivery shape.
    #[error("unrecognized proof format: {0}")]
    UnrecognizedProofFormat(String),
    /// Recomputed identifier differs from the signed one.
    #[error("claim info hash mismatch: signed {signed}, computed {computed}")]
    ClaimInfoHashMismatch {
        /// Identifier carried by the signed claim.
        signed: ClaimIdentifier,
        /// Identifier recomputed from the claim info.
        computed: ClaimIdentifier,
    },
    /// Threshold below one.
    #[error("required threshold must be at least 1")]
    InvalidThreshold,
    /// Threshold larger than the witness set.
    #[error("required threshold {threshold} exceeds witness count {witnesses}")]
    ThresholdExceedsWitnessCount {
        /// Requested threshold.
        threshold: usize,
        /// Number of distinct authorized witnesses.
        witnesses: usize,
    },
    /// Signature list is empty.
    #[error("proof carries no signatures")]
    NoSignatures,
    /// Too few distinct authorized witnesses signed.
    #[error("only {found} of {required} required witness signatures")]
    InsufficientWitnessSignatures {
        /// Distinct authorized signers recovered.
        found: usize,
        /// Required threshold.
        required: usize,
    },
}

impl From<CanonicalizationError> for VerificationError {
    fn from(err: CanonicalizationError) -> Self {
        match err {
            CanonicalizationError::MalformedContext(msg)
            | CanonicalizationError::Serialization(msg) => VerificationError::MalformedContext(msg),
        }
    }
}
