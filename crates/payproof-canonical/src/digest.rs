use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::validation::ValidationError;

/// Length in bytes of every digest produced by this crate.
pub const DIGEST_LEN: usize = 32;

const DIGEST_PATTERN: &str = r"^0[xX][0-9a-fA-F]{64}$";

fn digest_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DIGEST_PATTERN).expect("invalid regex"))
}

/// SHA-256 over `data`.
pub fn sha256(data: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(data).into()
}

macro_rules! digest_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        ///
        /// Rendered as lowercase `0x`-prefixed hex; parsing accepts either case.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; DIGEST_LEN]);

        impl $name {
            /// Wraps raw digest bytes.
            pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
                Self(bytes)
            }

            /// Hashes `data` with SHA-256.
            pub fn digest(data: &[u8]) -> Self {
                Self(sha256(data))
            }

            /// Raw digest bytes.
            pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
                &self.0
            }

            /// Lowercase `0x`-prefixed hex form.
            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }

            /// Parses a `0x`-prefixed, 64 hex digit string.
            pub fn parse(value: &str) -> Result<Self, ValidationError> {
                if !digest_regex().is_match(value) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: value.to_string(),
                    });
                }
                let bytes = hex::decode(&value[2..]).map_err(|_| {
                    ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: value.to_string(),
                    }
                })?;
                let bytes: [u8; DIGEST_LEN] =
                    bytes
                        .try_into()
                        .map_err(|b: Vec<u8>| ValidationError::LengthMismatch {
                            field: stringify!($name),
                            expected: DIGEST_LEN,
                            actual: b.len(),
                        })?;
                Ok(Self(bytes))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(de::Error::custom)
            }
        }
    };
}

digest_newtype!(
    ClaimIdentifier,
    "Canonical identifier of a claim: SHA-256 over provider, parameters and canonical context."
);
digest_newtype!(
    ProviderHash,
    "Commitment hash of a provider extraction template."
);
digest_newtype!(
    RecordDigest,
    "Content digest of a registry audit record."
);
