//! Output rendering for the CLI
//!
//! The ledger itself never formats anything; this module turns history
//! entries and ranking rows into display lines. Account ids are mapped
//! to display names through [`NameResolver`], so an embedding with a
//! player directory (or any other identity source) can plug in nicer
//! names without touching the ledger.

use crate::core::store::unix_now;
use crate::types::HistoryEntry;

/// Maps account ids to display names
pub trait NameResolver {
    /// Returns a display name for `id`, or `None` when unknown.
    fn resolve_name(&self, id: &str) -> Option<String>;
}

/// Fallback resolver that displays raw account ids
pub struct RawIds;

impl NameResolver for RawIds {
    fn resolve_name(&self, id: &str) -> Option<String> {
        if id.is_empty() {
            None
        } else {
            Some(id.to_string())
        }
    }
}

/// Formats one history row as `sender -> recipient amount age (note)`.
///
/// A transfer with the void on the receiving side shows `System`, so
/// burns read like payments to the system.
pub fn format_entry(entry: &HistoryEntry, resolver: &dyn NameResolver) -> String {
    let from = resolver.resolve_name(&entry.from).unwrap_or_default();
    let to = resolver
        .resolve_name(&entry.to)
        .unwrap_or_else(|| "System".to_string());
    let age = unix_now().saturating_sub(entry.timestamp);
    format!(
        "{from} -> {to} {amount} {age}s ago ({note})",
        amount = entry.amount,
        note = entry.note
    )
}

/// Formats one ranking row as `name  balance`.
pub fn format_top_row(id: &str, balance: i64, resolver: &dyn NameResolver) -> String {
    let name = resolver
        .resolve_name(id)
        .unwrap_or_else(|| "NULL".to_string());
    format!("{name}  {balance}")
}
