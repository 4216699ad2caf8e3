//! Error types for the economy ledger
//!
//! This module defines all error types that can occur while mutating or
//! querying the ledger. Errors are designed to be descriptive and
//! user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Validation Errors**: Negative amounts, empty account ids, self transfers
//! - **Balance Errors**: Insufficient funds, would-be-negative or overflowing balances
//! - **Policy Errors**: Operations vetoed by a registered before-hook
//! - **Store Errors**: SQLite failures and poisoned locks
//! - **Import Errors**: Failures while migrating a legacy database

use thiserror::Error;

/// Main error type for ledger operations
///
/// Every fallible ledger operation returns this enum. A returned error
/// always means the operation committed nothing: balances and history
/// are exactly as they were before the call.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Negative amount in a transfer-style operation
    ///
    /// Transfers move non-negative values; callers wanting to take money
    /// back use `reduce` or swap the endpoints.
    #[error("Invalid amount {amount}: amounts must be non-negative")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// An operation that requires a real account was given the empty id
    ///
    /// The empty id denotes the void and only ever appears as the
    /// implicit counterparty of mint and burn operations.
    #[error("Operation requires a non-empty account id")]
    InvalidAccount,

    /// Source and destination name the same account
    #[error("Cannot transfer from '{id}' to itself")]
    SelfTransfer {
        /// The account named on both sides
        id: String,
    },

    /// The debited account cannot cover the requested amount
    #[error("Insufficient funds for '{id}': balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The debited account
        id: String,
        /// Its balance at the time of the attempt
        balance: i64,
        /// The amount that was requested
        requested: i64,
    },

    /// The credit would leave the destination with a negative balance
    #[error("Balance of '{id}' would become negative")]
    NegativeBalance {
        /// The credited account
        id: String,
    },

    /// The credit would exceed the representable balance range
    #[error("Balance of '{id}' would overflow")]
    Overflow {
        /// The credited account
        id: String,
    },

    /// A registered before-hook rejected the operation
    #[error("Operation vetoed by a before-hook")]
    Vetoed,

    /// The underlying store failed; the operation was rolled back
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Persistence-layer failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite reported an error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A thread panicked while holding the connection lock
    #[error("Store connection lock is poisoned")]
    LockPoisoned,
}

/// Failures while migrating a legacy database
///
/// Import errors are reported to the caller but never abort startup:
/// the current store stays usable with whatever was migrated so far.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The legacy database could not be opened
    #[error("Cannot open legacy database: {0}")]
    Open(#[source] rusqlite::Error),

    /// The legacy balance table could not be read
    #[error("Cannot read legacy balances: {0}")]
    Read(#[source] rusqlite::Error),

    /// A migrated balance could not be written to the current store
    #[error("Cannot write migrated balance: {0}")]
    Write(#[source] StoreError),

    /// The drained legacy file could not be renamed aside
    #[error("Cannot archive legacy database: {0}")]
    Archive(#[source] std::io::Error),
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: i64) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create a SelfTransfer error
    pub fn self_transfer(id: &str) -> Self {
        LedgerError::SelfTransfer { id: id.to_string() }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(id: &str, balance: i64, requested: i64) -> Self {
        LedgerError::InsufficientFunds {
            id: id.to_string(),
            balance,
            requested,
        }
    }

    /// Create a NegativeBalance error
    pub fn negative_balance(id: &str) -> Self {
        LedgerError::NegativeBalance { id: id.to_string() }
    }

    /// Create an Overflow error
    pub fn overflow(id: &str) -> Self {
        LedgerError::Overflow { id: id.to_string() }
    }
}
