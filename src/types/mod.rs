//! Types module
//!
//! Contains core data structures used throughout the crate.
//! This module organizes types into logical submodules:
//! - `entry`: Account identifiers and persisted history entries
//! - `event`: Transient event records consumed by hooks
//! - `error`: Error types for ledger, store, and import failures

pub mod entry;
pub mod error;
pub mod event;

pub use entry::{AccountId, HistoryEntry};
pub use error::{ImportError, LedgerError, StoreError};
pub use event::{EventKind, EventRecord};
