//! Provider template registry for payment proofs.
//!
//! This crate provides:
//! - Provider template hashing and positional blueprints
//! - A per-payment-method allow-list of provider hashes with operator
//!   authorization and a hash-chained audit history
//! - In-memory and journal-backed stores behind the `RegistryStore` trait
//! - The batched lifecycle: plan, submit as one proposal, execute
//! - A release gate combining proof verification with registry membership
//!
//! ## Quick Start
//!
//! ```rust
//! use payproof_canonical::{Address, PaymentMethod, ProviderHash};
//! use payproof_registry::{MemoryStore, ProviderRegistry};
//!
//! let operator = Address::parse("0x00000000000000000000000000000000000000aa")?;
//! let mut registry = ProviderRegistry::new(
//!     PaymentMethod::parse("venmo")?,
//!     [operator.clone()],
//!     MemoryStore::new(),
//! );
//!
//! let hash = ProviderHash::digest(b"template");
//! registry.add(&operator, hash)?;
//! assert!(registry.is_registered(&hash));
//! assert_eq!(registry.history().len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Batched lifecycle.
pub mod batch;
/// Error types for registry operations.
pub mod error;
/// Audit events and operations.
pub mod event;
/// History filtering.
pub mod filter;
/// Release gate.
pub mod gate;
/// Journal-backed store.
pub mod journal;
/// In-memory store.
pub mod memory;
/// The registry itself.
pub mod registry;
/// Thread-safe handle.
pub mod shared;
/// Provider templates.
pub mod template;
/// Store trait.
pub mod traits;

pub use batch::{
    execute_proposal, plan_batch, submit_batch, BatchPlan, ExecutionReport,
    FileProposalSubmitter, Proposal, ProposalSubmitter, SkipReason, SkippedEntry,
    SubmissionReceipt,
};
pub use error::{GateError, RegistryError};
pub use event::{RegistryAction, RegistryEvent, RegistryOperation};
pub use filter::{
    filter_history, ActionFilter, AndFilter, CallerFilter, EventFilter, OrFilter,
    ProviderHashFilter, TimeRangeFilter,
};
pub use gate::{Approval, ReleaseGate};
pub use journal::JournalStore;
pub use memory::MemoryStore;
pub use payproof_journal::WriteOptions;
pub use registry::ProviderRegistry;
pub use shared::SharedRegistry;
pub use template::{ProviderTemplate, ResponseMatch, ResponseRedaction, TemplateBlueprint};
pub use traits::RegistryStore;
