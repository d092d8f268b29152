//! Release gate: the check an escrow runs before trusting a proof.

use crate::error::GateError;
use crate::shared::SharedRegistry;
use crate::traits::RegistryStore;
use payproof_core::{Accepted, ClaimContext, Proof, SignerRecovery, ThresholdVerifier, WitnessSet};
use tracing::{debug, warn};

/// A proof that cleared the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    /// Verification outcome.
    pub accepted: Accepted,
    /// Extracted context, now safe to act on.
    pub context: ClaimContext,
}

/// Couples witness verification with the provider hash allow-list for one
/// payment method.
pub struct ReleaseGate<R, S> {
    verifier: ThresholdVerifier<R>,
    witnesses: WitnessSet,
    required_threshold: usize,
    registry: SharedRegistry<S>,
}

impl<R: SignerRecovery, S: RegistryStore> ReleaseGate<R, S> {
    /// Creates a gate.
    pub fn new(
        verifier: ThresholdVerifier<R>,
        witnesses: WitnessSet,
        required_threshold: usize,
        registry: SharedRegistry<S>,
    ) -> Self {
        Self {
            verifier,
            witnesses,
            required_threshold,
            registry,
        }
    }

    /// Passes only if the proof verifies and its context names a provider
    /// hash registered for this gate's method.
    pub fn check(&self, proof: &Proof) -> Result<Approval, GateError> {
        let accepted = self
            .verifier
            .verify(proof, &self.witnesses, self.required_threshold)?;
        let context = proof.claim_info.parsed_context()?;

        let provider_hash = context.provider_hash.ok_or(GateError::MissingProviderHash)?;
        if !self.registry.is_registered(&provider_hash) {
            let method = self.registry.method();
            warn!(
                identifier = %accepted.identifier,
                provider_hash = %provider_hash,
                method = %method,
                "proof uses an unregistered provider template"
            );
            return Err(GateError::UnregisteredProviderHash {
                method,
                provider_hash,
            });
        }

        debug!(
            identifier = %accepted.identifier,
            provider_hash = %provider_hash,
            "release gate passed"
        );
        Ok(Approval { accepted, context })
    }
}
