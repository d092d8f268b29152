use serde_json::Value;

/// Registry audit record payload.
///
/// The journal stores records as-is; digest chaining and replay checks
/// happen in `payproof-registry`.
pub type RecordJson = Value;

const REQUIRED_FIELDS: &[&str] = &[
    "sequence",
    "method",
    "action",
    "provider_hash",
    "caller",
    "recorded_at",
    "digest",
];

/// Checks that a JSON value is an object carrying every audit record field.
pub fn is_valid_record_structure(value: &RecordJson) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    REQUIRED_FIELDS.iter().all(|field| obj.contains_key(*field))
}
