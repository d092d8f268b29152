//! Per-payment-method provider hash allow-list.

use crate::error::RegistryError;
use crate::event::{RegistryAction, RegistryEvent, RegistryOperation};
use crate::traits::RegistryStore;
use chrono::Utc;
use payproof_canonical::{Address, PaymentMethod, ProviderHash, RecordDigest};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Allow-list of provider hashes for one payment method.
///
/// Membership lives in the injected store; mutations are restricted to the
/// operator set and each one commits an audit record.
#[derive(Debug)]
pub struct ProviderRegistry<S> {
    method: PaymentMethod,
    operators: BTreeSet<Address>,
    store: S,
}

impl<S: RegistryStore> ProviderRegistry<S> {
    /// Creates a registry over `store`.
    pub fn new(
        method: PaymentMethod,
        operators: impl IntoIterator<Item = Address>,
        store: S,
    ) -> Self {
        Self {
            method,
            operators: operators.into_iter().collect(),
            store,
        }
    }

    /// Payment method this registry serves.
    pub fn method(&self) -> &PaymentMethod {
        &self.method
    }

    /// Whether `caller` may mutate the registry.
    pub fn is_operator(&self, caller: &Address) -> bool {
        self.operators.contains(caller)
    }

    /// Whether `hash` is allow-listed.
    pub fn is_registered(&self, hash: &ProviderHash) -> bool {
        self.store.contains(hash)
    }

    /// Allow-lists `hash`.
    ///
    /// # Errors
    ///
    /// `UnauthorizedRegistryMutation` for non-operators,
    /// `ProviderHashAlreadyRegistered` if `hash` is present, or a store error.
    pub fn add(
        &mut self,
        caller: &Address,
        hash: ProviderHash,
    ) -> Result<RegistryEvent, RegistryError> {
        self.apply(caller, RegistryOperation::add(hash))
    }

    /// Withdraws `hash`.
    ///
    /// # Errors
    ///
    /// `UnauthorizedRegistryMutation` for non-operators,
    /// `ProviderHashNotRegistered` if `hash` is absent, or a store error.
    pub fn remove(
        &mut self,
        caller: &Address,
        hash: ProviderHash,
    ) -> Result<RegistryEvent, RegistryError> {
        self.apply(caller, RegistryOperation::remove(hash))
    }

    /// Applies one operation; the single mutation path behind `add` and
    /// `remove`.
    pub fn apply(
        &mut self,
        caller: &Address,
        operation: RegistryOperation,
    ) -> Result<RegistryEvent, RegistryError> {
        if let Err(err) = self.check(caller, &operation) {
            warn!(
                method = %self.method,
                caller = %caller,
                provider_hash = %operation.provider_hash,
                error = %err,
                "registry mutation rejected"
            );
            return Err(err);
        }

        let event = RegistryEvent::seal(
            self.store.events().len() as u64,
            self.method.clone(),
            operation,
            caller.clone(),
            Utc::now(),
            self.head(),
        )?;
        self.store.commit(event.clone())?;

        info!(
            method = %self.method,
            caller = %caller,
            provider_hash = %operation.provider_hash,
            action = %operation.action,
            sequence = event.sequence,
            "registry updated"
        );
        Ok(event)
    }

    /// Validates an operation against authorization and current membership
    /// without applying it.
    pub fn check(
        &self,
        caller: &Address,
        operation: &RegistryOperation,
    ) -> Result<(), RegistryError> {
        if !self.is_operator(caller) {
            return Err(RegistryError::UnauthorizedRegistryMutation {
                method: self.method.clone(),
                caller: caller.clone(),
            });
        }
        self.check_membership(operation)
    }

    pub(crate) fn check_membership(&self, operation: &RegistryOperation) -> Result<(), RegistryError> {
        let present = self.is_registered(&operation.provider_hash);
        match (operation.action, present) {
            (RegistryAction::Add, true) => Err(RegistryError::ProviderHashAlreadyRegistered {
                method: self.method.clone(),
                provider_hash: operation.provider_hash,
            }),
            (RegistryAction::Remove, false) => Err(RegistryError::ProviderHashNotRegistered {
                method: self.method.clone(),
                provider_hash: operation.provider_hash,
            }),
            _ => Ok(()),
        }
    }

    /// Current members, sorted.
    pub fn enumerate(&self) -> Vec<ProviderHash> {
        self.store.hashes()
    }

    /// Digest of the latest audit record, `None` before the first mutation.
    pub fn head(&self) -> Option<RecordDigest> {
        self.store.head().map(|e| e.digest)
    }

    /// Audit history, oldest first.
    pub fn history(&self) -> &[RegistryEvent] {
        self.store.events()
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn operator() -> Address {
        Address::parse("0x00000000000000000000000000000000000000aa").unwrap()
    }

    fn make_registry() -> ProviderRegistry<MemoryStore> {
        ProviderRegistry::new(
            PaymentMethod::parse("venmo").unwrap(),
            [operator()],
            MemoryStore::new(),
        )
    }

    #[test]
    fn add_then_remove() {
        let mut registry = make_registry();
        let hash = ProviderHash::digest(b"t");
        registry.add(&operator(), hash).unwrap();
        assert!(registry.is_registered(&hash));
        registry.remove(&operator(), hash).unwrap();
        assert!(!registry.is_registered(&hash));
        assert_eq!(registry.history().len(), 2);
    }

    #[test]
    fn history_is_chained() {
        let mut registry = make_registry();
        let first = registry.add(&operator(), ProviderHash::digest(b"a")).unwrap();
        let second = registry.add(&operator(), ProviderHash::digest(b"b")).unwrap();
        assert_eq!(first.sequence, 0);
        assert_eq!(first.prev_digest, None);
        assert_eq!(second.sequence, 1);
        assert_eq!(second.prev_digest, Some(first.digest));
    }

    #[test]
    fn unauthorized_check_precedes_membership() {
        let mut registry = make_registry();
        let stranger = Address::parse("0x00000000000000000000000000000000000000bb").unwrap();
        let err = registry
            .remove(&stranger, ProviderHash::digest(b"missing"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnauthorizedRegistryMutation { .. }));
    }

    #[test]
    fn operator_casing_is_irrelevant() {
        let mut registry = make_registry();
        let shouted = Address::parse("0x00000000000000000000000000000000000000AA").unwrap();
        assert!(registry.add(&shouted, ProviderHash::digest(b"t")).is_ok());
    }
}
