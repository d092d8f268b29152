//! Provider templates and their commitment hashes.
//!
//! A template is serialized as compact JSON with the fields in a fixed order
//! (`url`, `method`, `body`, `responseMatches`, `responseRedactions`) and
//! hashed with SHA-256. Field order is part of the commitment, so the struct
//! field order below must not change.

use payproof_canonical::ProviderHash;
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the transaction position in a blueprint.
pub const INDEX_PLACEHOLDER: &str = "{{INDEX}}";

/// One pattern the provider response must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMatch {
    /// Match kind, e.g. `regex` or `contains`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Pattern text.
    pub value: String,
}

/// One region of the response revealed to witnesses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRedaction {
    /// JSONPath selector, or empty.
    pub json_path: String,
    /// XPath selector, or empty.
    #[serde(rename = "xPath")]
    pub x_path: String,
    /// Optional regex applied after selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// Declarative description of how payment facts are extracted from a
/// provider response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTemplate {
    /// Request URL; may carry unresolved `{{NAME}}` parameters.
    pub url: String,
    /// HTTP method.
    pub method: String,
    /// Request body.
    #[serde(default)]
    pub body: String,
    /// Patterns the response must satisfy.
    #[serde(default)]
    pub response_matches: Vec<ResponseMatch>,
    /// Regions revealed to witnesses.
    #[serde(default)]
    pub response_redactions: Vec<ResponseRedaction>,
}

impl ProviderTemplate {
    /// The exact bytes the commitment hash covers.
    pub fn canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Commitment hash of this template.
    ///
    /// ```
    /// use payproof_registry::ProviderTemplate;
    ///
    /// let template: ProviderTemplate = serde_json::from_str(
    ///     r#"{"url":"https://example.com","method":"GET"}"#,
    /// )?;
    /// assert_eq!(template.canonical_hash()?, template.clone().canonical_hash()?);
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    pub fn canonical_hash(&self) -> Result<ProviderHash, serde_json::Error> {
        Ok(ProviderHash::digest(self.canonical_json()?.as_bytes()))
    }
}

/// A template whose selectors address one transaction by position.
///
/// Providers list several transactions per response; each position needs its
/// own allow-listed hash, generated from one blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateBlueprint(ProviderTemplate);

impl TemplateBlueprint {
    /// Wraps a template containing `{{INDEX}}` placeholders.
    pub fn new(template: ProviderTemplate) -> Self {
        Self(template)
    }

    /// The unresolved template.
    pub fn template(&self) -> &ProviderTemplate {
        &self.0
    }

    /// Whether any field carries the placeholder.
    pub fn is_positional(&self) -> bool {
        let t = &self.0;
        t.url.contains(INDEX_PLACEHOLDER)
            || t.body.contains(INDEX_PLACEHOLDER)
            || t.response_matches
                .iter()
                .any(|m| m.value.contains(INDEX_PLACEHOLDER))
            || t.response_redactions.iter().any(|r| {
                r.json_path.contains(INDEX_PLACEHOLDER)
                    || r.x_path.contains(INDEX_PLACEHOLDER)
                    || r.regex
                        .as_deref()
                        .is_some_and(|re| re.contains(INDEX_PLACEHOLDER))
            })
    }

    /// Template resolved for transaction `position`.
    pub fn for_position(&self, position: usize) -> ProviderTemplate {
        let index = position.to_string();
        let sub = |s: &str| s.replace(INDEX_PLACEHOLDER, &index);

        ProviderTemplate {
            url: sub(&self.0.url),
            method: self.0.method.clone(),
            body: sub(&self.0.body),
            response_matches: self
                .0
                .response_matches
                .iter()
                .map(|m| ResponseMatch {
                    kind: m.kind.clone(),
                    value: sub(&m.value),
                })
                .collect(),
            response_redactions: self
                .0
                .response_redactions
                .iter()
                .map(|r| ResponseRedaction {
                    json_path: sub(&r.json_path),
                    x_path: sub(&r.x_path),
                    regex: r.regex.as_deref().map(sub),
                })
                .collect(),
        }
    }

    /// Hashes for positions `0..count`, in position order.
    pub fn hashes_for_positions(&self, count: usize) -> Result<Vec<ProviderHash>, serde_json::Error> {
        (0..count)
            .map(|position| self.for_position(position).canonical_hash())
            .collect()
    }
}
