//! Core ledger module
//!
//! This module contains the transactional heart of the crate:
//! - `store` - SQLite-backed balances and the append-only history log
//! - `ledger` - Validation, tax, and the atomic transfer protocol
//! - `hooks` - Before/after listener pipeline with veto support
//! - `legacy` - One-time migration of the previous on-disk format

pub mod hooks;
pub mod ledger;
pub mod legacy;
pub mod store;

pub use hooks::{AfterHook, BeforeHook, HookRegistry, Verdict};
pub use ledger::Ledger;
pub use legacy::ImportOutcome;
pub use store::LedgerStore;
