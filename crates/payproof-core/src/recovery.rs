//! Signer recovery capability.
//!
//! The verifier only needs "which address produced this signature over these
//! bytes". That primitive is injected through [`SignerRecovery`] so deployments
//! can plug in their witnesses' scheme and tests can use deterministic keys.
//!
//! [`Ed25519Recovery`] is the bundled scheme. Its signatures are
//! self-certifying: `verifying_key (32 bytes) || signature (64 bytes)`. The
//! witness address is the last 20 bytes of `sha256(verifying_key)`.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use payproof_canonical::{sha256, Address};
use std::fmt;
use thiserror::Error;

/// Length of a bundled self-certifying signature.
pub const SIGNATURE_LEN: usize = 32 + 64;

/// Why a signer could not be recovered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    /// Signature has the wrong size.
    #[error("signature must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// Embedded key is not a valid point or seed is malformed.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// Signature does not verify against the message.
    #[error("signature does not verify")]
    BadSignature,
}

/// Recovers the address that signed `message`.
pub trait SignerRecovery: Send + Sync {
    /// Returns the signer of `signature` over `message`.
    fn recover(&self, message: &[u8], signature: &[u8]) -> Result<Address, RecoveryError>;
}

impl<T: SignerRecovery + ?Sized> SignerRecovery for &T {
    fn recover(&self, message: &[u8], signature: &[u8]) -> Result<Address, RecoveryError> {
        (**self).recover(message, signature)
    }
}

impl<T: SignerRecovery + ?Sized> SignerRecovery for Box<T> {
    fn recover(&self, message: &[u8], signature: &[u8]) -> Result<Address, RecoveryError> {
        (**self).recover(message, signature)
    }
}

/// Ed25519 self-certifying signature scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Recovery;

impl SignerRecovery for Ed25519Recovery {
    fn recover(&self, message: &[u8], signature: &[u8]) -> Result<Address, RecoveryError> {
        if signature.len() != SIGNATURE_LEN {
            return Err(RecoveryError::InvalidLength {
                expected: SIGNATURE_LEN,
                actual: signature.len(),
            });
        }

        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&signature[..32]);
        let mut sig_bytes = [0u8; 64];
        sig_bytes.copy_from_slice(&signature[32..]);

        let key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| RecoveryError::InvalidKey(e.to_string()))?;
        key.verify_strict(message, &Signature::from_bytes(&sig_bytes))
            .map_err(|_| RecoveryError::BadSignature)?;

        Ok(witness_address(&key))
    }
}

/// Address of a witness verifying key.
pub fn witness_address(key: &VerifyingKey) -> Address {
    let hash = sha256(key.as_bytes());
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..]);
    Address::from_bytes(addr)
}

/// Witness signing key producing self-certifying signatures.
#[derive(Clone)]
pub struct WitnessKey {
    signing_key: SigningKey,
}

impl WitnessKey {
    /// Derives the key from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Derives the key from a hex-encoded 32-byte seed (`0x` optional).
    pub fn from_hex(seed_hex: &str) -> Result<Self, RecoveryError> {
        let bytes = crate::claim::decode_hex_bytes(seed_hex)
            .map_err(|e| RecoveryError::InvalidKey(format!("invalid hex: {}", e)))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| RecoveryError::InvalidKey("seed must be exactly 32 bytes".into()))?;
        Ok(Self::from_seed(&seed))
    }

    /// Address other parties see for this witness.
    pub fn address(&self) -> Address {
        witness_address(&self.signing_key.verifying_key())
    }

    /// Signs `message`, returning `verifying_key || signature`.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature = self.signing_key.sign(message);
        let mut out = Vec::with_capacity(SIGNATURE_LEN);
        out.extend_from_slice(self.signing_key.verifying_key().as_bytes());
        out.extend_from_slice(&signature.to_bytes());
        out
    }
}

impl fmt::Debug for WitnessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WitnessKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_signer_address() {
        let key = WitnessKey::from_seed(&[7; 32]);
        let sig = key.sign(b"hello");
        assert_eq!(Ed25519Recovery.recover(b"hello", &sig).unwrap(), key.address());
    }

    #[test]
    fn rejects_wrong_message_and_length() {
        let key = WitnessKey::from_seed(&[7; 32]);
        let sig = key.sign(b"hello");
        assert_eq!(
            Ed25519Recovery.recover(b"hellO", &sig),
            Err(RecoveryError::BadSignature)
        );
        assert!(matches!(
            Ed25519Recovery.recover(b"hello", &sig[..95]),
            Err(RecoveryError::InvalidLength { .. })
        ));
    }

    #[test]
    fn swapped_key_does_not_verify() {
        let a = WitnessKey::from_seed(&[1; 32]);
        let b = WitnessKey::from_seed(&[2; 32]);
        let mut sig = a.sign(b"m");
        let other = b.sign(b"m");
        sig[..32].copy_from_slice(&other[..32]);
        assert!(Ed25519Recovery.recover(b"m", &sig).is_err());
    }

    #[test]
    fn seed_hex_parsing() {
        let from_hex = WitnessKey::from_hex(&format!("0x{}", "07".repeat(32))).unwrap();
        assert_eq!(from_hex.address(), WitnessKey::from_seed(&[7; 32]).address());
        assert!(WitnessKey::from_hex("0x0707").is_err());
    }

    #[test]
    fn distinct_seeds_give_distinct_addresses() {
        assert_ne!(
            WitnessKey::from_seed(&[1; 32]).address(),
            WitnessKey::from_seed(&[2; 32]).address()
        );
    }
}
