//! Ledger orchestration
//!
//! This module ties the pieces together: it validates requests, runs
//! the hook pipeline, and drives the store through atomic transfers.
//! Every balance mutation is expressed as a transfer between two
//! endpoints, where an empty endpoint denotes the void (minting when it
//! is the source, burning when it is the destination).

use std::path::Path;
use std::sync::Arc;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::core::hooks::{HookRegistry, Verdict};
use crate::core::legacy::{self, ImportOutcome};
use crate::core::store::{unix_now, LedgerStore};
use crate::types::{
    AccountId, EventKind, EventRecord, HistoryEntry, ImportError, LedgerError, StoreError,
};

/// Transactional balance ledger
///
/// One value owns the store handle, the hook registry, and the tax
/// policy; everything takes `&self`, so a `Ledger` can be shared across
/// threads (all store access funnels through one connection lock).
/// Hooks fire outside that lock, which means a hook may freely call
/// back into the ledger.
pub struct Ledger {
    store: LedgerStore,
    hooks: HookRegistry,
    tax_rate: f32,
}

impl Ledger {
    /// Opens (or creates) a ledger backed by the database at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the SQLite database file
    /// * `default_balance` - Balance granted to accounts on first access
    /// * `tax_rate` - Fraction of peer transfers withheld and burned;
    ///   values outside `0.0..=1.0` (or non-finite) are clamped
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or its
    /// schema cannot be initialized.
    pub fn open(path: &Path, default_balance: i64, tax_rate: f32) -> Result<Self, StoreError> {
        let store = LedgerStore::open(path, default_balance)?;
        info!(path = %path.display(), default_balance, tax_rate, "ledger opened");
        Ok(Self::with_store(store, tax_rate))
    }

    /// Opens a ledger on a throwaway in-memory database.
    pub fn open_in_memory(default_balance: i64, tax_rate: f32) -> Result<Self, StoreError> {
        let store = LedgerStore::open_in_memory(default_balance)?;
        Ok(Self::with_store(store, tax_rate))
    }

    fn with_store(store: LedgerStore, tax_rate: f32) -> Self {
        Ledger {
            store,
            hooks: HookRegistry::new(),
            tax_rate: sanitize_rate(tax_rate),
        }
    }

    /// The effective tax rate after clamping.
    pub fn tax_rate(&self) -> f32 {
        self.tax_rate
    }

    /// Registers a before-hook; it may veto any user-facing operation.
    pub fn register_before<F>(&self, hook: F)
    where
        F: Fn(&EventRecord) -> Verdict + Send + Sync + 'static,
    {
        self.hooks.register_before(Arc::new(hook));
    }

    /// Registers an after-hook; it observes committed operations.
    pub fn register_after<F>(&self, hook: F)
    where
        F: Fn(&EventRecord) + Send + Sync + 'static,
    {
        self.hooks.register_after(Arc::new(hook));
    }

    /// Returns an account's balance, creating the account with the
    /// default balance on first access.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccount` for the empty id and `Store` if the
    /// read (or first-access insert) fails.
    pub fn balance(&self, id: &str) -> Result<i64, LedgerError> {
        if id.is_empty() {
            return Err(LedgerError::InvalidAccount);
        }
        self.balance_inner(id)
    }

    /// Moves `amount` from one account to another, withholding tax.
    ///
    /// Either endpoint may be the empty string to mint from or burn to
    /// the void; tax applies only when both endpoints are real
    /// accounts. Before-hooks run first and may veto the operation,
    /// even ahead of amount validation.
    ///
    /// # Arguments
    ///
    /// * `from` - Debited account, or `""` to mint
    /// * `to` - Credited account, or `""` to burn
    /// * `amount` - Non-negative amount to move, before tax
    /// * `note` - Annotation stored with the history entry
    ///
    /// # Errors
    ///
    /// Returns `Vetoed`, `InvalidAmount`, `SelfTransfer`,
    /// `InsufficientFunds`, `NegativeBalance`, `Overflow`, or `Store`.
    /// On any error no balance changes and no history is written.
    pub fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: i64,
        note: &str,
    ) -> Result<(), LedgerError> {
        self.guarded(EventRecord::transfer(from, to, amount), || {
            self.transfer_inner(from, to, amount, note)
        })
    }

    /// Mints `amount` into an account.
    ///
    /// Equivalent to a transfer from the void, so no tax is withheld.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccount` for the empty id, plus anything
    /// [`Ledger::transfer`] can return.
    pub fn add(&self, id: &str, amount: i64) -> Result<(), LedgerError> {
        if id.is_empty() {
            return Err(LedgerError::InvalidAccount);
        }
        self.guarded(EventRecord::single(EventKind::Add, id, amount), || {
            self.transfer_inner("", id, amount, &format!("add {amount}"))
        })
    }

    /// Burns `amount` out of an account.
    ///
    /// Equivalent to a transfer to the void, so no tax is withheld and
    /// the account must cover the full amount.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccount` for the empty id, plus anything
    /// [`Ledger::transfer`] can return.
    pub fn reduce(&self, id: &str, amount: i64) -> Result<(), LedgerError> {
        if id.is_empty() {
            return Err(LedgerError::InvalidAccount);
        }
        self.guarded(EventRecord::single(EventKind::Reduce, id, amount), || {
            self.transfer_inner(id, "", amount, &format!("reduce {amount}"))
        })
    }

    /// Brings an account's balance to exactly `target`.
    ///
    /// Implemented as a single mint or burn of the difference, so the
    /// hook pipeline sees exactly one `Set` event rather than the
    /// internal transfer leg. The balance read that sizes the
    /// difference still creates a fresh account, even when the burn
    /// then fails.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccount` for the empty id, plus anything
    /// [`Ledger::transfer`] can return. A negative target implies a
    /// debit larger than the whole balance, so it always fails
    /// `InsufficientFunds`.
    pub fn set(&self, id: &str, target: i64) -> Result<(), LedgerError> {
        if id.is_empty() {
            return Err(LedgerError::InvalidAccount);
        }
        self.guarded(EventRecord::single(EventKind::Set, id, target), || {
            let current = self.balance_inner(id)?;
            let diff = if target >= current {
                target.checked_sub(current)
            } else {
                current.checked_sub(target)
            };
            let Some(diff) = diff else {
                return Err(LedgerError::overflow(id));
            };
            let (from, to) = if target >= current { ("", id) } else { (id, "") };
            self.transfer_inner(from, to, diff, &format!("set to {target}"))
        })
    }

    /// Returns history entries touching `id`, newest first, restricted
    /// to entries strictly younger than `max_age_secs`.
    pub fn history(&self, id: &str, max_age_secs: i64) -> Result<Vec<HistoryEntry>, LedgerError> {
        if id.is_empty() {
            return Err(LedgerError::InvalidAccount);
        }
        Ok(self.store.history_for(id, max_age_secs)?)
    }

    /// Deletes history entries aged `max_age_secs` or older.
    ///
    /// Purging is maintenance, not accounting: failures are logged and
    /// swallowed rather than surfaced.
    pub fn purge_history(&self, max_age_secs: i64) {
        match self.store.purge_history(max_age_secs) {
            Ok(deleted) => info!(deleted, "purged history entries"),
            Err(error) => warn!(%error, "history purge failed"),
        }
    }

    /// Returns up to `limit` accounts ordered by balance, richest
    /// first. Ties come back in no particular order.
    pub fn top_balances(&self, limit: u32) -> Result<Vec<(AccountId, i64)>, LedgerError> {
        Ok(self.store.top_balances(limit)?)
    }

    /// Migrates balances from a legacy database at `legacy_path`.
    ///
    /// Returns `Ok(None)` when no legacy database exists. On success
    /// the drained file is renamed aside so the migration never runs
    /// twice. Existing accounts are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns `ImportError`; the ledger stays usable with whatever was
    /// migrated before the failure.
    pub fn import_legacy(&self, legacy_path: &Path) -> Result<Option<ImportOutcome>, ImportError> {
        legacy::import_from(&self.store, legacy_path)
    }

    /// Runs `op` bracketed by the hook pipeline: before-hooks may veto,
    /// after-hooks observe the commit. Hooks never run under the store
    /// lock, so they may re-enter the ledger.
    fn guarded<F>(&self, record: EventRecord, op: F) -> Result<(), LedgerError>
    where
        F: FnOnce() -> Result<(), LedgerError>,
    {
        if self.hooks.fire_before(&record) == Verdict::Deny {
            return Err(LedgerError::Vetoed);
        }
        op()?;
        self.hooks.fire_after(&record);
        Ok(())
    }

    fn balance_inner(&self, id: &str) -> Result<i64, LedgerError> {
        surface(self.store.with_tx(|tx| Ok(tx.balance_or_init(id)?)))
    }

    /// The read-check-write cycle every mutation funnels through.
    ///
    /// Both legs plus the history append happen in one store
    /// transaction; any error rolls the whole thing back.
    fn transfer_inner(
        &self,
        from: &str,
        to: &str,
        amount: i64,
        note: &str,
    ) -> Result<(), LedgerError> {
        if amount < 0 {
            return Err(LedgerError::invalid_amount(amount));
        }
        if from == to {
            return Err(LedgerError::self_transfer(from));
        }
        surface(self.store.with_tx(|tx| {
            if !from.is_empty() {
                let balance = tx.balance_or_init(from)?;
                if balance < amount {
                    return Err(LedgerError::insufficient_funds(from, balance, amount));
                }
                tx.set_balance(from, balance - amount)?;
            }
            if !to.is_empty() {
                let balance = tx.balance_or_init(to)?;
                let credit = if from.is_empty() {
                    amount
                } else {
                    amount - tax_of(amount, self.tax_rate)
                };
                let updated = balance
                    .checked_add(credit)
                    .ok_or_else(|| LedgerError::overflow(to))?;
                if updated < 0 {
                    return Err(LedgerError::negative_balance(to));
                }
                tx.set_balance(to, updated)?;
            }
            tx.append_entry(&HistoryEntry {
                from: from.to_owned(),
                to: to.to_owned(),
                amount,
                timestamp: unix_now(),
                note: note.to_owned(),
            })?;
            Ok(())
        }))
    }
}

/// Store failures are worth an error-level record; business failures
/// (insufficient funds, vetoes) are expected outcomes and stay quiet.
fn surface<T>(result: Result<T, LedgerError>) -> Result<T, LedgerError> {
    if let Err(LedgerError::Store(cause)) = &result {
        error!(%cause, "store failure, operation rolled back");
    }
    result
}

/// Tax withheld on a peer transfer: `floor(amount * rate)`.
///
/// Computed in decimal so large balances keep exact integer results
/// where binary floating point would drift.
fn tax_of(amount: i64, rate: f32) -> i64 {
    let Some(rate) = Decimal::from_f32(rate) else {
        return 0;
    };
    if rate <= Decimal::ZERO {
        return 0;
    }
    (Decimal::from(amount) * rate).floor().to_i64().unwrap_or(0)
}

fn sanitize_rate(rate: f32) -> f32 {
    if rate.is_finite() {
        rate.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
