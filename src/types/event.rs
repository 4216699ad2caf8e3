//! Event types for the hook pipeline
//!
//! Hooks observe ledger mutations through `EventRecord` values. Records
//! are transient: they exist only for the duration of a hook invocation
//! and are never persisted.

use crate::types::AccountId;

/// Kind of mutation a hook is being told about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A balance was overwritten to an exact value
    Set,

    /// Funds were minted into an account
    Add,

    /// Funds were burned out of an account
    Reduce,

    /// Funds moved between two accounts
    Trans,
}

/// Parameters of the operation that triggered a hook
///
/// For `Set`, `Add`, and `Reduce` the target account appears in `to`
/// and `from` is empty; `value` carries the caller's figure (the exact
/// target for `Set`, the amount otherwise). For `Trans` both sides are
/// filled in and `value` is the pre-tax amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Which operation is happening
    pub kind: EventKind,

    /// Debited side, empty for mint-style operations
    pub from: AccountId,

    /// Credited side, empty for burn-style operations
    pub to: AccountId,

    /// The caller's requested figure, before tax
    pub value: i64,
}

impl EventRecord {
    /// Builds a record for a peer-to-peer transfer.
    pub fn transfer(from: &str, to: &str, value: i64) -> Self {
        EventRecord {
            kind: EventKind::Trans,
            from: from.to_owned(),
            to: to.to_owned(),
            value,
        }
    }

    /// Builds a record for a single-account operation (set, add, reduce).
    pub fn single(kind: EventKind, id: &str, value: i64) -> Self {
        EventRecord {
            kind,
            from: AccountId::new(),
            to: id.to_owned(),
            value,
        }
    }
}
