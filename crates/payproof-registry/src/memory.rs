//! In-memory registry store.

use crate::error::RegistryError;
use crate::event::{RegistryAction, RegistryEvent};
use crate::traits::RegistryStore;
use payproof_canonical::ProviderHash;
use std::collections::HashSet;

/// Ephemeral store; also the in-memory half of [`crate::JournalStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    members: HashSet<ProviderHash>,
    events: Vec<RegistryEvent>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegistryStore for MemoryStore {
    fn contains(&self, hash: &ProviderHash) -> bool {
        self.members.contains(hash)
    }

    fn hashes(&self) -> Vec<ProviderHash> {
        let mut hashes: Vec<_> = self.members.iter().copied().collect();
        hashes.sort();
        hashes
    }

    fn commit(&mut self, event: RegistryEvent) -> Result<(), RegistryError> {
        match event.action {
            RegistryAction::Add => {
                self.members.insert(event.provider_hash);
            }
            RegistryAction::Remove => {
                self.members.remove(&event.provider_hash);
            }
        }
        self.events.push(event);
        Ok(())
    }

    fn events(&self) -> &[RegistryEvent] {
        &self.events
    }
}
