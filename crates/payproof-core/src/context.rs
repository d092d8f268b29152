//! Typed view of the values a witness extracted into the claim context.

use crate::claim::ClaimInfo;
use crate::errors::VerificationError;
use payproof_canonical::ProviderHash;
use serde_json::Value;
use std::collections::BTreeMap;

/// Fields carried in a claim context.
///
/// Nothing here is trustworthy until the proof has been verified and the
/// provider hash checked against the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimContext {
    /// Address the claim is bound to, if any.
    pub context_address: Option<String>,
    /// Free-form binding message (intent hash, nonce, ...).
    pub context_message: Option<String>,
    /// Values pulled from the provider response, by parameter name.
    pub extracted_parameters: BTreeMap<String, String>,
    /// Template commitment the extraction claims to follow.
    pub provider_hash: Option<ProviderHash>,
}

impl ClaimContext {
    /// Parses a context string. An empty string yields an empty context.
    pub fn parse(context: &str) -> Result<Self, VerificationError> {
        if context.is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(context)
            .map_err(|e| VerificationError::MalformedContext(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(VerificationError::MalformedContext(
                "context is not a JSON object".to_string(),
            ));
        };

        let provider_hash = match map.get("providerHash") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(
                ProviderHash::parse(s)
                    .map_err(|e| VerificationError::MalformedContext(e.to_string()))?,
            ),
            Some(other) => {
                return Err(VerificationError::MalformedContext(format!(
                    "providerHash must be a string, got {}",
                    other
                )))
            }
        };

        let extracted_parameters = match map.get("extractedParameters") {
            Some(Value::Object(params)) => params
                .iter()
                .map(|(k, v)| (k.clone(), scalar_text(v)))
                .collect(),
            _ => BTreeMap::new(),
        };

        Ok(Self {
            context_address: map.get("contextAddress").map(scalar_text),
            context_message: map.get("contextMessage").map(scalar_text),
            extracted_parameters,
            provider_hash,
        })
    }

    /// Looks up one extracted parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.extracted_parameters.get(name).map(String::as_str)
    }
}

impl ClaimInfo {
    /// Parses this claim's context.
    pub fn parsed_context(&self) -> Result<ClaimContext, VerificationError> {
        ClaimContext::parse(&self.context)
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
