//! Canonical primitives for payment attestation proofs.
//!
//! Everything that participates in hashing lives in this crate: the claim
//! identifier and sign-data layouts, the canonical JSON re-serializer, digest
//! and address newtypes, the identifier packing codec and audit-record digests.
//!
#![deny(missing_docs)]

/// Canonical JSON re-serialization.
pub mod canonicalizer;
/// Claim identifier and witness sign-data layouts.
pub mod claim;
/// 32-byte digest newtypes.
pub mod digest;
/// Address and payment-method newtypes.
pub mod identifiers;
/// Identifier packing codec.
pub mod packing;
/// Audit record digests.
pub mod record;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{canonicalize, canonicalize_str, CanonicalizationError};
pub use claim::{canonical_context, identifier_of, sign_data_of, verify_identifier};
pub use digest::{sha256, ClaimIdentifier, ProviderHash, RecordDigest, DIGEST_LEN};
pub use identifiers::{Address, PaymentMethod};
pub use packing::{
    pack, pack_str, unpack, unpack_str, PackingError, PackingProfile, PROFILE_21, PROFILE_56,
};
pub use record::{compute_record_digest, verify_record_digest, RecordDigestError, DIGEST_FIELD};
pub use validation::ValidationError;
