//! Registry audit events.

use chrono::{DateTime, SubsecRound, Utc};
use payproof_canonical::{compute_record_digest, Address, PaymentMethod, ProviderHash, RecordDigest};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RegistryError;

/// Registry mutation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryAction {
    /// Allow-list a provider hash.
    Add,
    /// Withdraw a provider hash.
    Remove,
}

impl fmt::Display for RegistryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryAction::Add => f.write_str("add"),
            RegistryAction::Remove => f.write_str("remove"),
        }
    }
}

/// One requested mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryOperation {
    /// What to do.
    pub action: RegistryAction,
    /// Which hash.
    pub provider_hash: ProviderHash,
}

impl RegistryOperation {
    /// An add of `provider_hash`.
    pub fn add(provider_hash: ProviderHash) -> Self {
        Self {
            action: RegistryAction::Add,
            provider_hash,
        }
    }

    /// A remove of `provider_hash`.
    pub fn remove(provider_hash: ProviderHash) -> Self {
        Self {
            action: RegistryAction::Remove,
            provider_hash,
        }
    }
}

/// Audit record of one applied mutation.
///
/// Records form a chain: `sequence` counts from zero, `prev_digest` is the
/// previous record's `digest` (null for the first), and `digest` covers every
/// other field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEvent {
    /// Position in the registry's history.
    pub sequence: u64,
    /// Registry payment method.
    pub method: PaymentMethod,
    /// Mutation kind.
    pub action: RegistryAction,
    /// Affected hash.
    pub provider_hash: ProviderHash,
    /// Operator that performed the mutation.
    pub caller: Address,
    /// When the mutation was applied, at second precision.
    pub recorded_at: DateTime<Utc>,
    /// Digest of the preceding record.
    pub prev_digest: Option<RecordDigest>,
    /// Digest of this record.
    pub digest: RecordDigest,
}

impl RegistryEvent {
    /// Builds a record and computes its digest.
    pub fn seal(
        sequence: u64,
        method: PaymentMethod,
        operation: RegistryOperation,
        caller: Address,
        recorded_at: DateTime<Utc>,
        prev_digest: Option<RecordDigest>,
    ) -> Result<Self, RegistryError> {
        let mut event = Self {
            sequence,
            method,
            action: operation.action,
            provider_hash: operation.provider_hash,
            caller,
            recorded_at: recorded_at.trunc_subsecs(0),
            prev_digest,
            digest: RecordDigest::from_bytes([0u8; 32]),
        };
        event.digest = compute_record_digest(&event)?;
        Ok(event)
    }

    /// The operation this record applied.
    pub fn operation(&self) -> RegistryOperation {
        RegistryOperation {
            action: self.action,
            provider_hash: self.provider_hash,
        }
    }

    /// Recomputes the digest and compares it to the stored one.
    pub fn digest_is_valid(&self) -> Result<bool, RegistryError> {
        Ok(compute_record_digest(self)? == self.digest)
    }
}
