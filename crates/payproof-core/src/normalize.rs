//! Ingestion of the two proof delivery shapes.
//!
//! Browser-extension proofs arrive flat, with string parameters/context and a
//! single claim signature. App-clip proofs arrive nested, with structured
//! parameters/context, indexed signatures and witness descriptors. Both are
//! normalized into [`Proof`] immediately; verification never looks at where a
//! proof came from.

use crate::claim::{decode_hex_bytes, ClaimInfo, CompleteClaimData, Proof, SignedClaim};
use crate::errors::VerificationError;
use payproof_canonical::{canonicalize, ClaimIdentifier};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Flat claim of an extension proof.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionClaim {
    /// Proof channel tag.
    pub provider: String,
    /// Parameters, already in canonical text form.
    pub parameters: String,
    /// Context text.
    #[serde(default)]
    pub context: String,
    /// Identifier the witness signed.
    pub identifier: ClaimIdentifier,
    /// Claimed owner.
    pub owner: String,
    /// Unix seconds.
    pub timestamp_s: u64,
    /// Witness-scheme version.
    pub epoch: u64,
}

/// Signature block of an extension proof.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSignatures {
    /// Self-reported attestor; informational only.
    #[serde(default)]
    pub attestor_address: Option<String>,
    /// Witness signature over the claim sign-data.
    pub claim_signature: String,
    /// Signature over the attestor's result payload; not part of claim verification.
    #[serde(default)]
    pub result_signature: Option<String>,
}

/// Flat "extension" proof shape.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionProof {
    /// Claim fields.
    pub claim: ExtensionClaim,
    /// Signature block.
    pub signatures: ExtensionSignatures,
}

/// A claim field delivered either as text or as structured JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClaimField {
    /// Already-serialized text, taken verbatim.
    Text(String),
    /// Structured value, re-serialized canonically.
    Structured(Value),
}

impl ClaimField {
    fn into_text(self) -> Result<String, VerificationError> {
        match self {
            ClaimField::Text(text) => Ok(text),
            ClaimField::Structured(Value::Null) => Ok(String::new()),
            ClaimField::Structured(value) => Ok(canonicalize(&value)?),
        }
    }
}

/// Nested claim data of an app-clip proof.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppclipClaimData {
    /// Proof channel tag.
    pub provider: String,
    /// Structured or textual parameters.
    pub parameters: ClaimField,
    /// Structured or textual context.
    #[serde(default)]
    pub context: Option<ClaimField>,
    /// Identifier the witnesses signed.
    pub identifier: ClaimIdentifier,
    /// Claimed owner.
    pub owner: String,
    /// Unix seconds.
    pub timestamp_s: u64,
    /// Witness-scheme version.
    pub epoch: u64,
}

/// App-clip signatures: a list, or an object keyed by decimal index.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AppclipSignatures {
    /// Signatures in order.
    List(Vec<String>),
    /// Signatures keyed by position.
    Indexed(BTreeMap<String, String>),
}

impl AppclipSignatures {
    fn into_ordered(self) -> Result<Vec<String>, VerificationError> {
        match self {
            AppclipSignatures::List(list) => Ok(list),
            AppclipSignatures::Indexed(map) => {
                let mut indexed = map
                    .into_iter()
                    .map(|(key, sig)| {
                        key.parse::<u32>().map(|i| (i, sig)).map_err(|_| {
                            VerificationError::UnrecognizedProofFormat(format!(
                                "signature index '{}' is not a number",
                                key
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                indexed.sort_by_key(|(i, _)| *i);
                Ok(indexed.into_iter().map(|(_, sig)| sig).collect())
            }
        }
    }
}

/// Witness descriptor shipped with app-clip proofs. Advisory only.
#[derive(Debug, Clone, Deserialize)]
pub struct WitnessDescriptor {
    /// Witness address as reported by the producer.
    pub id: String,
    /// Witness endpoint.
    #[serde(default)]
    pub url: Option<String>,
}

/// Nested "app-clip" proof shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppclipProof {
    /// Outer copy of the identifier; must agree with `claim_data.identifier`.
    #[serde(default)]
    pub identifier: Option<ClaimIdentifier>,
    /// Claim fields.
    pub claim_data: AppclipClaimData,
    /// Witness signatures.
    pub signatures: AppclipSignatures,
    /// Witness descriptors.
    #[serde(default)]
    pub witnesses: Vec<WitnessDescriptor>,
}

/// A raw proof, tagged by delivery shape.
#[derive(Debug, Clone)]
pub enum RawProof {
    /// Flat extension shape.
    Extension(ExtensionProof),
    /// Nested app-clip shape.
    Appclip(AppclipProof),
}

impl RawProof {
    /// Detects the delivery shape of a parsed JSON document.
    pub fn from_value(value: Value) -> Result<Self, VerificationError> {
        let Some(obj) = value.as_object() else {
            return Err(VerificationError::UnrecognizedProofFormat(
                "proof is not a JSON object".to_string(),
            ));
        };

        if obj.contains_key("claimData") {
            serde_json::from_value(value)
                .map(RawProof::Appclip)
                .map_err(|e| VerificationError::UnrecognizedProofFormat(format!("app-clip: {}", e)))
        } else if obj.contains_key("claim") {
            serde_json::from_value(value)
                .map(RawProof::Extension)
                .map_err(|e| {
                    VerificationError::UnrecognizedProofFormat(format!("extension: {}", e))
                })
        } else {
            Err(VerificationError::UnrecognizedProofFormat(
                "expected a `claim` or `claimData` member".to_string(),
            ))
        }
    }

    /// Parses and detects a proof from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, VerificationError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| VerificationError::UnrecognizedProofFormat(e.to_string()))?;
        Self::from_value(value)
    }

    /// Maps the raw shape into a [`Proof`].
    pub fn normalize(self) -> Result<Proof, VerificationError> {
        let proof = match self {
            RawProof::Extension(raw) => {
                let signature = decode_signature(&raw.signatures.claim_signature)?;
                Proof {
                    claim_info: ClaimInfo {
                        provider: raw.claim.provider,
                        parameters: raw.claim.parameters,
                        context: raw.claim.context,
                    },
                    signed_claim: SignedClaim {
                        claim: CompleteClaimData {
                            identifier: raw.claim.identifier,
                            owner: raw.claim.owner,
                            timestamp_s: raw.claim.timestamp_s,
                            epoch: raw.claim.epoch,
                        },
                        signatures: vec![signature],
                    },
                    is_appclip_proof: false,
                }
            }
            RawProof::Appclip(raw) => {
                let data = raw.claim_data;
                if let Some(outer) = raw.identifier {
                    if outer != data.identifier {
                        return Err(VerificationError::UnrecognizedProofFormat(format!(
                            "outer identifier {} disagrees with claim identifier {}",
                            outer, data.identifier
                        )));
                    }
                }
                let signatures = raw
                    .signatures
                    .into_ordered()?
                    .iter()
                    .map(|s| decode_signature(s))
                    .collect::<Result<Vec<_>, _>>()?;
                let context = match data.context {
                    Some(field) => field.into_text()?,
                    None => String::new(),
                };
                debug!(
                    witnesses = raw.witnesses.len(),
                    signatures = signatures.len(),
                    "normalized app-clip proof"
                );
                Proof {
                    claim_info: ClaimInfo {
                        provider: data.provider,
                        parameters: data.parameters.into_text()?,
                        context,
                    },
                    signed_claim: SignedClaim {
                        claim: CompleteClaimData {
                            identifier: data.identifier,
                            owner: data.owner,
                            timestamp_s: data.timestamp_s,
                            epoch: data.epoch,
                        },
                        signatures,
                    },
                    is_appclip_proof: true,
                }
            }
        };
        Ok(proof)
    }
}

/// Parses, detects and normalizes a raw proof document.
pub fn normalize_proof(bytes: &[u8]) -> Result<Proof, VerificationError> {
    RawProof::from_slice(bytes)?.normalize()
}

fn decode_signature(text: &str) -> Result<Vec<u8>, VerificationError> {
    decode_hex_bytes(text).map_err(|e| {
        VerificationError::UnrecognizedProofFormat(format!("signature is not hex: {}", e))
    })
}
