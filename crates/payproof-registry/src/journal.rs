//! Journal-backed registry store.

use crate::error::RegistryError;
use crate::event::{RegistryAction, RegistryEvent};
use crate::memory::MemoryStore;
use crate::traits::RegistryStore;
use payproof_canonical::{PaymentMethod, ProviderHash};
use payproof_journal::{
    verify_record_digest, JournalReader, JournalWriter, ReadMode, WriteOptions,
};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Durable store: every record is appended to a journal file before it is
/// applied in memory.
pub struct JournalStore {
    path: PathBuf,
    writer: JournalWriter,
    state: MemoryStore,
}

impl JournalStore {
    /// Opens (or creates) the journal at `path` for `method`'s registry.
    ///
    /// Existing records are replayed; each must carry a valid digest, extend
    /// the chain and belong to `method`. A frame torn by a crash at the tail
    /// is cut off before appending resumes.
    pub fn open<P: AsRef<Path>>(
        path: P,
        method: &PaymentMethod,
        options: WriteOptions,
    ) -> Result<Self, RegistryError> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let (state, valid_len) = replay(&path, method)?;
            let file_len = fs::metadata(&path)?.len();
            if valid_len < file_len {
                warn!(
                    path = %path.display(),
                    offset = valid_len,
                    dropped_bytes = file_len - valid_len,
                    "truncating torn journal tail"
                );
                OpenOptions::new().write(true).open(&path)?.set_len(valid_len)?;
            }
            state
        } else {
            MemoryStore::new()
        };
        let writer = JournalWriter::open(&path, options)?;

        debug!(
            path = %path.display(),
            method = %method,
            records = state.events().len(),
            "opened registry journal"
        );
        Ok(Self {
            path,
            writer,
            state,
        })
    }

    /// Journal file location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Replays the journal and returns the state plus the byte length of its
/// intact prefix.
fn replay(path: &Path, method: &PaymentMethod) -> Result<(MemoryStore, u64), RegistryError> {
    let mut reader = JournalReader::open(path, ReadMode::Permissive)?;
    let mut state = MemoryStore::new();

    while let Some(record) = reader.read_record()? {
        let sequence = state.events().len() as u64;
        let broken = |reason: String| RegistryError::ChainBroken { sequence, reason };

        if !verify_record_digest(&record)? {
            return Err(broken("digest does not match record".to_string()));
        }
        let event: RegistryEvent = serde_json::from_value(record)?;

        if event.sequence != sequence {
            return Err(broken(format!("found sequence {}", event.sequence)));
        }
        if event.prev_digest != state.head().map(|e| e.digest) {
            return Err(broken("prev_digest does not match preceding record".to_string()));
        }
        if &event.method != method {
            return Err(RegistryError::MethodMismatch {
                expected: method.clone(),
                found: event.method,
            });
        }
        let present = state.contains(&event.provider_hash);
        match (event.action, present) {
            (RegistryAction::Add, true) => {
                return Err(broken("adds a hash that is already registered".to_string()))
            }
            (RegistryAction::Remove, false) => {
                return Err(broken("removes a hash that is not registered".to_string()))
            }
            _ => {}
        }
        state.commit(event)?;
    }
    Ok((state, reader.position()))
}

impl RegistryStore for JournalStore {
    fn contains(&self, hash: &ProviderHash) -> bool {
        self.state.contains(hash)
    }

    fn hashes(&self) -> Vec<ProviderHash> {
        self.state.hashes()
    }

    fn commit(&mut self, event: RegistryEvent) -> Result<(), RegistryError> {
        self.writer.append_record(&serde_json::to_value(&event)?)?;
        self.state.commit(event)
    }

    fn events(&self) -> &[RegistryEvent] {
        self.state.events()
    }
}
