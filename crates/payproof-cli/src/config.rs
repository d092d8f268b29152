//! Operator configuration file.
//!
//! ```json
//! {
//!   "witnesses": ["0x..."],
//!   "required_threshold": 1,
//!   "registries": {
//!     "venmo": { "journal": "registries/venmo.ppj", "operators": ["0x..."] }
//!   },
//!   "proposals_dir": "proposals"
//! }
//! ```
//!
//! Relative paths resolve against the directory holding the file.

use payproof_canonical::{Address, PaymentMethod};
use payproof_core::WitnessSet;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("no registry configured for payment method {0}")]
    UnknownMethod(PaymentMethod),
    #[error("no witnesses configured; pass --witness or set \"witnesses\"")]
    MissingWitnesses,
    #[error("no threshold configured; pass --threshold or set \"required_threshold\"")]
    MissingThreshold,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    pub journal: PathBuf,
    #[serde(default)]
    pub operators: Vec<Address>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub witnesses: Vec<Address>,
    #[serde(default)]
    pub required_threshold: Option<usize>,
    #[serde(default)]
    pub registries: BTreeMap<PaymentMethod, RegistryConfig>,
    #[serde(default = "default_proposals_dir")]
    pub proposals_dir: PathBuf,
}

fn default_proposals_dir() -> PathBuf {
    PathBuf::from("proposals")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            witnesses: Vec::new(),
            required_threshold: None,
            registries: BTreeMap::new(),
            proposals_dir: default_proposals_dir(),
        }
    }
}

impl Config {
    /// Loads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let mut config: Config =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.proposals_dir = base.join(&config.proposals_dir);
        for registry in config.registries.values_mut() {
            registry.journal = base.join(&registry.journal);
        }
        Ok(config)
    }

    pub fn registry(&self, method: &PaymentMethod) -> Result<&RegistryConfig, ConfigError> {
        self.registries
            .get(method)
            .ok_or_else(|| ConfigError::UnknownMethod(method.clone()))
    }

    /// Witness set from `--witness` flags, falling back to the file.
    pub fn witness_set(&self, overrides: &[Address]) -> Result<WitnessSet, ConfigError> {
        let witnesses = if overrides.is_empty() {
            &self.witnesses
        } else {
            overrides
        };
        if witnesses.is_empty() {
            return Err(ConfigError::MissingWitnesses);
        }
        Ok(witnesses.iter().cloned().collect())
    }

    /// Threshold from `--threshold`, falling back to the file.
    pub fn threshold(&self, value: Option<usize>) -> Result<usize, ConfigError> {
        value
            .or(self.required_threshold)
            .ok_or(ConfigError::MissingThreshold)
    }
}
