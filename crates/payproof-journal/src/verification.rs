//! Verification helpers for journal records.

use crate::errors::JournalError;
use crate::record::RecordJson;
use payproof_canonical::{compute_record_digest, RecordDigest, DIGEST_FIELD};

/// Checks a record against the `digest` member it carries.
pub fn verify_record_digest(record: &RecordJson) -> Result<bool, JournalError> {
    let claimed = record
        .get(DIGEST_FIELD)
        .and_then(|v| serde_json::from_value::<RecordDigest>(v.clone()).ok())
        .ok_or_else(|| JournalError::InvalidRecord("missing or invalid digest".to_string()))?;

    let computed = compute_record_digest(record)
        .map_err(|e| JournalError::InvalidRecord(format!("digest computation failed: {}", e)))?;

    Ok(claimed == computed)
}
