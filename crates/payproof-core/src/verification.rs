//! Threshold witness verification.

use crate::claim::{Proof, SignedClaim};
use crate::errors::VerificationError;
use crate::recovery::SignerRecovery;
use payproof_canonical::{Address, ClaimIdentifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Authorized witness addresses. Duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WitnessSet(BTreeSet<Address>);

impl WitnessSet {
    /// Builds a witness set.
    pub fn new(witnesses: impl IntoIterator<Item = Address>) -> Self {
        Self(witnesses.into_iter().collect())
    }

    /// Membership test.
    pub fn contains(&self, address: &Address) -> bool {
        self.0.contains(address)
    }

    /// Number of distinct witnesses.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no witness is authorized.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Witnesses in address order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }
}

impl FromIterator<Address> for WitnessSet {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accepted {
    /// Verified claim identifier.
    pub identifier: ClaimIdentifier,
    /// Distinct authorized witnesses whose signatures were recovered.
    pub attesting_witnesses: BTreeSet<Address>,
    /// Threshold that was met.
    pub required_threshold: usize,
}

/// Verifies proofs against a witness set and signer threshold.
///
/// Pure and stateless apart from the recovery capability; safe to share
/// across threads when `R` is.
#[derive(Debug, Clone, Default)]
pub struct ThresholdVerifier<R> {
    recovery: R,
}

impl<R: SignerRecovery> ThresholdVerifier<R> {
    /// Creates a verifier using `recovery` to identify signers.
    pub fn new(recovery: R) -> Self {
        Self { recovery }
    }

    /// The recovery capability in use.
    pub fn recovery(&self) -> &R {
        &self.recovery
    }

    /// Verifies `proof`.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// threshold bounds, signature presence, identifier recomputation, then
    /// the distinct-authorized-signer count. The result does not depend on
    /// signature order, and a signer counts once however often it signed.
    ///
    /// # Errors
    ///
    /// Any [`VerificationError`] means the proof must not be acted upon.
    pub fn verify(
        &self,
        proof: &Proof,
        witnesses: &WitnessSet,
        required_threshold: usize,
    ) -> Result<Accepted, VerificationError> {
        if required_threshold < 1 {
            return Err(VerificationError::InvalidThreshold);
        }
        if required_threshold > witnesses.len() {
            return Err(VerificationError::ThresholdExceedsWitnessCount {
                threshold: required_threshold,
                witnesses: witnesses.len(),
            });
        }

        let signed = &proof.signed_claim;
        if signed.signatures.is_empty() {
            return Err(VerificationError::NoSignatures);
        }

        let computed = proof.claim_info.identifier()?;
        if computed != signed.claim.identifier {
            debug!(
                signed = %signed.claim.identifier,
                computed = %computed,
                "claim info does not match signed identifier"
            );
            return Err(VerificationError::ClaimInfoHashMismatch {
                signed: signed.claim.identifier,
                computed,
            });
        }

        let attesting_witnesses: BTreeSet<Address> = self
            .recover_signers(signed)
            .into_iter()
            .filter(|signer| witnesses.contains(signer))
            .collect();

        if attesting_witnesses.len() < required_threshold {
            debug!(
                identifier = %computed,
                found = attesting_witnesses.len(),
                required = required_threshold,
                "not enough witness signatures"
            );
            return Err(VerificationError::InsufficientWitnessSignatures {
                found: attesting_witnesses.len(),
                required: required_threshold,
            });
        }

        debug!(
            identifier = %computed,
            witnesses = attesting_witnesses.len(),
            "proof accepted"
        );
        Ok(Accepted {
            identifier: computed,
            attesting_witnesses,
            required_threshold,
        })
    }

    /// Distinct addresses recovered from the claim's signatures.
    ///
    /// Signatures that do not recover are dropped.
    pub fn recover_signers(&self, signed: &SignedClaim) -> BTreeSet<Address> {
        let message = signed.claim.sign_data();
        let mut signers = BTreeSet::new();
        for (index, signature) in signed.signatures.iter().enumerate() {
            match self.recovery.recover(message.as_bytes(), signature) {
                Ok(address) => {
                    signers.insert(address);
                }
                Err(err) => {
                    warn!(index, error = %err, "dropping unrecoverable signature");
                }
            }
        }
        signers
    }
}
