//! Claim identifier and witness sign-data computation.
//!
//! The identifier is `sha256(provider "\n" parameters "\n" canonical(context))`.
//! Witnesses sign `identifier "\n" lowercase(owner) "\n" timestampS "\n" epoch`.
//! Both layouts are shared with proof producers and must not change.

use crate::canonicalizer::{canonicalize_str, CanonicalizationError};
use crate::digest::ClaimIdentifier;

const FIELD_SEPARATOR: &str = "\n";

/// Returns the canonical form of a claim context.
///
/// An empty context stays empty; anything else must be valid JSON.
pub fn canonical_context(context: &str) -> Result<String, CanonicalizationError> {
    if context.is_empty() {
        return Ok(String::new());
    }
    canonicalize_str(context)
}

/// Computes the canonical identifier of a claim.
///
/// # Example
///
/// ```rust
/// use payproof_canonical::identifier_of;
///
/// let a = identifier_of("http", "{}", r#"{"b":1,"a":2}"#)?;
/// let b = identifier_of("http", "{}", "{ \"a\": 2, \"b\": 1 }")?;
/// assert_eq!(a, b);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`CanonicalizationError::MalformedContext`] if a non-empty
/// `context` does not parse.
pub fn identifier_of(
    provider: &str,
    parameters: &str,
    context: &str,
) -> Result<ClaimIdentifier, CanonicalizationError> {
    let context = canonical_context(context)?;

    let mut preimage =
        String::with_capacity(provider.len() + parameters.len() + context.len() + 2);
    preimage.push_str(provider);
    preimage.push_str(FIELD_SEPARATOR);
    preimage.push_str(parameters);
    preimage.push_str(FIELD_SEPARATOR);
    preimage.push_str(&context);

    Ok(ClaimIdentifier::digest(preimage.as_bytes()))
}

/// Builds the exact payload witnesses sign for a claim.
///
/// The owner is lower-cased here so every signer and verifier produces
/// identical bytes whatever casing the producer used.
pub fn sign_data_of(
    identifier: &ClaimIdentifier,
    owner: &str,
    timestamp_s: u64,
    epoch: u64,
) -> String {
    [
        identifier.to_hex(),
        owner.to_lowercase(),
        timestamp_s.to_string(),
        epoch.to_string(),
    ]
    .join(FIELD_SEPARATOR)
}

/// Checks a claimed identifier against the recomputed one.
pub fn verify_identifier(
    claimed: &ClaimIdentifier,
    provider: &str,
    parameters: &str,
    context: &str,
) -> Result<bool, CanonicalizationError> {
    Ok(identifier_of(provider, parameters, context)? == *claimed)
}
