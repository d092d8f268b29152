//! Append-only journal for provider registry audit records.
//!
//! This crate provides:
//! - Framed, append-only storage for audit record JSON
//! - Reader/writer APIs with strict and permissive modes
//! - A digest check for individual records
//!
//! ## Quick Start
//!
//! ```rust
//! use payproof_canonical::compute_record_digest;
//! use payproof_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("venmo.ppj");
//!
//! let mut record = json!({
//!     "sequence": 0,
//!     "method": "venmo",
//!     "action": "add",
//!     "provider_hash": "0x73a41b2bcac0e9d60ed438cd53bff9f840e756193b02f74ba5926d32ade392d7",
//!     "caller": "0x0000000000000000000000000000000000000001",
//!     "recorded_at": "2024-01-01T00:00:00Z"
//! });
//! record["digest"] = serde_json::to_value(compute_record_digest(&record)?)?;
//!
//! let mut writer = JournalWriter::open(&path, WriteOptions::default())?;
//! writer.append_record(&record)?;
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open(&path, ReadMode::Strict)?;
//! while let Some(read) = reader.read_record()? {
//!     assert!(payproof_journal::verify_record_digest(&read)?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## File layout
//!
//! A 16-byte header (`PPJ1`, version, reserved) followed by frames of
//! `kind:u8, reserved:[u8;3], len:u32 LE, payload`.

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Frame structure and serialization.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
/// Record JSON type alias and helpers.
pub mod record;
/// Verification helpers for journal records.
pub mod verification;
/// Journal writer implementation.
pub mod writer;

pub use errors::JournalError;
pub use frame::{FrameKind, JournalHeader, RecordFrame};
pub use reader::{JournalReader, ReadMode};
pub use record::{is_valid_record_structure, RecordJson};
pub use verification::verify_record_digest;
pub use writer::{JournalWriter, WriteOptions};
