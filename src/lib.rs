//! Economy Ledger Library
//! # Overview
//!
//! This library provides a transactional balance ledger: per-account
//! integer balances, taxed peer-to-peer transfers, an append-only
//! history log, and a veto-capable hook pipeline around every mutation.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (HistoryEntry, EventRecord, errors)
//! - [`config`] - JSON configuration with load-time sanitizing
//! - [`cli`] - CLI argument parsing, dispatch, and rendering
//! - [`core`] - Business logic components:
//!   - [`core::store`] - SQLite-backed balances and history log
//!   - [`core::ledger`] - Validation, tax, and atomic transfers
//!   - [`core::hooks`] - Before/after listener pipeline
//!   - [`core::legacy`] - One-time migration of the old on-disk format
//!
//! # Operations
//!
//! The ledger exposes a small operation set:
//!
//! - **balance**: Read a balance, creating the account on first access
//! - **add / reduce**: Mint into or burn out of an account, untaxed
//! - **set**: Bring a balance to an exact target value
//! - **transfer**: Move value between accounts, withholding tax
//! - **history / purge**: Query or trim the append-only transfer log
//! - **top_balances**: Rank accounts by balance
//!
//! # Invariants
//!
//! Committed balances never go negative, every mutation appends exactly
//! one history entry, and a failed operation leaves no trace: the
//! balance write and the history append share one transaction.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod types;

pub use config::LedgerConfig;
pub use core::{HookRegistry, ImportOutcome, Ledger, LedgerStore, Verdict};
pub use types::{
    AccountId, EventKind, EventRecord, HistoryEntry, ImportError, LedgerError, StoreError,
};
