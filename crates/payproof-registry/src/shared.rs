//! Thread-safe registry handle.

use crate::error::RegistryError;
use crate::event::{RegistryEvent, RegistryOperation};
use crate::registry::ProviderRegistry;
use crate::traits::RegistryStore;
use parking_lot::RwLock;
use payproof_canonical::{Address, PaymentMethod, ProviderHash};
use std::sync::Arc;

/// Cloneable handle to a registry shared between threads.
///
/// Mutations take the write lock for their whole duration, so readers see
/// either the state before a mutation or after it.
#[derive(Debug)]
pub struct SharedRegistry<S> {
    inner: Arc<RwLock<ProviderRegistry<S>>>,
}

impl<S> Clone for SharedRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: RegistryStore> SharedRegistry<S> {
    /// Wraps `registry`.
    pub fn new(registry: ProviderRegistry<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Payment method of the wrapped registry.
    pub fn method(&self) -> PaymentMethod {
        self.inner.read().method().clone()
    }

    /// Whether `hash` is allow-listed.
    pub fn is_registered(&self, hash: &ProviderHash) -> bool {
        self.inner.read().is_registered(hash)
    }

    /// Current members, sorted.
    pub fn enumerate(&self) -> Vec<ProviderHash> {
        self.inner.read().enumerate()
    }

    /// Copy of the audit history.
    pub fn history(&self) -> Vec<RegistryEvent> {
        self.inner.read().history().to_vec()
    }

    /// Applies one mutation under the write lock.
    pub fn apply(
        &self,
        caller: &Address,
        operation: RegistryOperation,
    ) -> Result<RegistryEvent, RegistryError> {
        self.inner.write().apply(caller, operation)
    }

    /// Runs `f` with shared access.
    pub fn read<T>(&self, f: impl FnOnce(&ProviderRegistry<S>) -> T) -> T {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access, for multi-step work such as executing
    /// a proposal.
    pub fn write<T>(&self, f: impl FnOnce(&mut ProviderRegistry<S>) -> T) -> T {
        f(&mut self.inner.write())
    }
}
