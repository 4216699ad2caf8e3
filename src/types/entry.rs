//! Account and history types for the economy ledger
//!
//! This module defines the identifier alias and the persisted history
//! entry shape shared by the store, the transfer engine, and the CLI.

/// Account identifier
///
/// Accounts are keyed by an opaque string (a player XUID, a service
/// name, or anything else the embedding application chooses). The empty
/// string is reserved: it denotes the void, the implicit counterparty
/// used when balances are minted or burned, and never names a stored
/// account.
pub type AccountId = String;

/// One committed ledger mutation, as recorded in the history log
///
/// Every successful balance change appends exactly one entry. The
/// `amount` is the requested figure before tax, so history replays the
/// caller's intent rather than the net movement of funds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Debited account, or the empty string when funds were minted
    pub from: AccountId,

    /// Credited account, or the empty string when funds were burned
    pub to: AccountId,

    /// Requested amount in minor units, before any tax was withheld
    pub amount: i64,

    /// Commit time as seconds since the Unix epoch
    pub timestamp: i64,

    /// Free-form annotation supplied by the caller
    pub note: String,
}
