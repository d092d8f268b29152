//! Proof normalization and threshold witness verification.
//!
//! This crate provides:
//! - The claim data model (`ClaimInfo`, `CompleteClaimData`, `SignedClaim`, `Proof`)
//! - Normalization of extension and app-clip proof shapes into one `Proof`
//! - A pluggable signer-recovery capability with a bundled ed25519 scheme
//! - Threshold verification against an authorized witness set
//!
//! Core invariants:
//! - Claim identifiers are content-derived and recomputed on every verification
//! - A witness counts once no matter how many signatures it contributed
//! - Verification is deterministic and offline
//! - Core never decides fund movement; it only accepts or rejects evidence
//!
#![deny(missing_docs)]

/// Claim and proof types.
pub mod claim;
/// Typed access to extracted context values.
pub mod context;
/// Error types for normalization and verification.
pub mod errors;
/// Raw proof shapes and normalization.
pub mod normalize;
/// Signer recovery capability.
pub mod recovery;
/// Threshold verification.
pub mod verification;

pub use claim::{decode_hex_bytes, encode_hex_bytes, ClaimInfo, CompleteClaimData, Proof, SignedClaim};
pub use context::ClaimContext;
pub use errors::VerificationError;
pub use normalize::{normalize_proof, AppclipProof, ExtensionProof, RawProof};
pub use recovery::{witness_address, Ed25519Recovery, RecoveryError, SignerRecovery, WitnessKey};
pub use verification::{Accepted, ThresholdVerifier, WitnessSet};
