//! Storage seam for provider registries.

use crate::error::RegistryError;
use crate::event::RegistryEvent;
use payproof_canonical::ProviderHash;

/// Repository holding one registry's membership and audit history.
///
/// `commit` is the only mutation: it persists the record and applies it to
/// the membership set, in that order.
pub trait RegistryStore {
    /// Whether `hash` is currently allow-listed.
    fn contains(&self, hash: &ProviderHash) -> bool;

    /// Current members, sorted.
    fn hashes(&self) -> Vec<ProviderHash>;

    /// Persists and applies one sealed record.
    fn commit(&mut self, event: RegistryEvent) -> Result<(), RegistryError>;

    /// Every committed record, oldest first.
    fn events(&self) -> &[RegistryEvent];

    /// Most recent record.
    fn head(&self) -> Option<&RegistryEvent> {
        self.events().last()
    }
}
