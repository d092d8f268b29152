use payproof_canonical::{identifier_of, sign_data_of, CanonicalizationError, ClaimIdentifier};
use serde::{Deserialize, Serialize};

/// What was claimed: proof channel, request/extraction rules and extracted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInfo {
    /// Proof channel tag (e.g. `http`).
    pub provider: String,
    /// Canonical description of the request and its match/redaction rules.
    pub parameters: String,
    /// Extracted values and the claimed provider hash, as JSON text. May be empty.
    #[serde(default)]
    pub context: String,
}

impl ClaimInfo {
    /// Recomputes the canonical identifier of this claim.
    pub fn identifier(&self) -> Result<ClaimIdentifier, CanonicalizationError> {
        identifier_of(&self.provider, &self.parameters, &self.context)
    }
}

/// Claim metadata the witnesses sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteClaimData {
    /// Identifier of the claim info.
    pub identifier: ClaimIdentifier,
    /// Address claimed to have produced the claim, in the producer's casing.
    pub owner: String,
    /// Unix seconds.
    pub timestamp_s: u64,
    /// Witness-scheme version.
    pub epoch: u64,
}

impl CompleteClaimData {
    /// Exact bytes the witnesses signed.
    pub fn sign_data(&self) -> String {
        sign_data_of(&self.identifier, &self.owner, self.timestamp_s, self.epoch)
    }
}

/// Claim data plus witness signatures in delivery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedClaim {
    /// Signed claim metadata.
    pub claim: CompleteClaimData,
    /// Raw signature bytes, `0x` hex on the wire.
    #[serde(with = "signature_list")]
    pub signatures: Vec<Vec<u8>>,
}

/// Normalized attestation proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Claim being proven.
    pub claim_info: ClaimInfo,
    /// Witness-signed claim metadata.
    pub signed_claim: SignedClaim,
    /// Delivered through the app-clip channel. Provenance only.
    pub is_appclip_proof: bool,
}

/// Decodes `0x`-prefixed (or bare) hex into bytes.
pub fn decode_hex_bytes(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(digits)
}

/// Encodes bytes as lowercase `0x`-prefixed hex.
pub fn encode_hex_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

mod signature_list {
    use super::{decode_hex_bytes, encode_hex_bytes};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(sigs: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(sigs.iter().map(|s| encode_hex_bytes(s)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| decode_hex_bytes(s).map_err(D::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn proof_serializes_with_wire_names() {
        let proof = Proof {
            claim_info: ClaimInfo {
                provider: "http".into(),
                parameters: "{}".into(),
                context: String::new(),
            },
            signed_claim: SignedClaim {
                claim: CompleteClaimData {
                    identifier: ClaimIdentifier::from_bytes([0; 32]),
                    owner: "0xAB".into(),
                    timestamp_s: 7,
                    epoch: 1,
                },
                signatures: vec![vec![0xde, 0xad]],
            },
            is_appclip_proof: false,
        };

        let value = serde_json::to_value(&proof).unwrap();
        assert_eq!(value["signedClaim"]["claim"]["timestampS"], json!(7));
        assert_eq!(value["signedClaim"]["signatures"], json!(["0xdead"]));
        assert_eq!(value["isAppclipProof"], json!(false));

        let back: Proof = serde_json::from_value(value).unwrap();
        assert_eq!(back, proof);
    }

    #[test]
    fn hex_decoding_accepts_both_prefix_cases() {
        assert_eq!(decode_hex_bytes("0xABcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(decode_hex_bytes("0XABcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(decode_hex_bytes("abcd").unwrap(), vec![0xab, 0xcd]);
        assert!(decode_hex_bytes("0xabc").is_err());
    }
}
