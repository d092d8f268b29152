//! Content digests for registry audit records.
//!
//! Record digests are computed as `sha256(domain_separator || canonical(record))`
//! where the record's own `digest` field is excluded from the hash input.

use crate::canonicalizer::{canonicalize, CanonicalizationError};
use crate::digest::{sha256, RecordDigest};
use serde::Serialize;
use serde_json::Value;

/// Domain separator for audit record digests: `b"payproof:registry-record:v1\0"`.
const RECORD_DOMAIN_SEPARATOR: &[u8] = b"payproof:registry-record:v1\0";

/// Name of the self-referential field skipped while hashing.
pub const DIGEST_FIELD: &str = "digest";

/// Error during record digest computation.
#[derive(thiserror::Error, Debug)]
pub enum RecordDigestError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Computes the digest of an audit record.
pub fn compute_record_digest<T: Serialize>(record: &T) -> Result<RecordDigest, RecordDigestError> {
    let mut value: Value = serde_json::to_value(record)
        .map_err(|e| RecordDigestError::Serialization(e.to_string()))?;

    if let Value::Object(map) = &mut value {
        map.remove(DIGEST_FIELD);
    }

    let canonical = canonicalize(&value)?;

    let mut preimage = Vec::with_capacity(RECORD_DOMAIN_SEPARATOR.len() + canonical.len());
    preimage.extend_from_slice(RECORD_DOMAIN_SEPARATOR);
    preimage.extend_from_slice(canonical.as_bytes());
    Ok(RecordDigest::from_bytes(sha256(&preimage)))
}

/// Verifies that a claimed record digest matches the recomputed one.
pub fn verify_record_digest<T: Serialize>(
    record: &T,
    claimed: &RecordDigest,
) -> Result<bool, RecordDigestError> {
    Ok(compute_record_digest(record)? == *claimed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn digest_field_is_excluded() {
        let bare = json!({"action": "add", "sequence": 1});
        let mut with_digest = bare.clone();
        with_digest["digest"] = json!("0xdead");
        assert_eq!(
            compute_record_digest(&bare).unwrap(),
            compute_record_digest(&with_digest).unwrap()
        );
    }

    #[test]
    fn any_field_change_changes_digest() {
        let a = compute_record_digest(&json!({"action": "add", "sequence": 1})).unwrap();
        let b = compute_record_digest(&json!({"action": "add", "sequence": 2})).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_round_trip() {
        let record = json!({"action": "remove"});
        let digest = compute_record_digest(&record).unwrap();
        assert!(verify_record_digest(&record, &digest).unwrap());
    }
}
