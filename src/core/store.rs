//! SQLite-backed account store and history log
//!
//! This module owns all persistence: account balances, the append-only
//! history log, and the transactional scope that keeps them in step.
//! A single `Mutex<Connection>` serializes every access, so one store
//! value can be shared freely across threads.
//!
//! Balances live in `accounts (id, balance)` and history in
//! `history (sender, recipient, amount, time, note)` with a
//! time-descending index, which keeps recent-first queries cheap even
//! when the log grows large.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::types::{AccountId, HistoryEntry, StoreError};

/// Returns the current time as seconds since the Unix epoch.
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

/// Persistent account store
///
/// Reads that only need a consistent snapshot (`history_for`,
/// `top_balances`, `purge_history`) take the connection lock for a
/// single statement. Mutations go through [`LedgerStore::with_tx`],
/// which wraps them in one SQLite transaction that commits on success
/// and rolls back on any error.
pub struct LedgerStore {
    conn: Mutex<Connection>,
    default_balance: i64,
}

impl LedgerStore {
    /// Opens (or creates) the store at `path`.
    ///
    /// `default_balance` is handed to accounts on their first access.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or the
    /// schema cannot be initialized.
    pub fn open(path: &Path, default_balance: i64) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?, default_balance)
    }

    /// Opens a throwaway in-memory store, mainly for tests and benches.
    pub fn open_in_memory(default_balance: i64) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, default_balance)
    }

    fn from_connection(conn: Connection, default_balance: i64) -> Result<Self, StoreError> {
        init_schema(&conn)?;
        Ok(LedgerStore {
            conn: Mutex::new(conn),
            default_balance,
        })
    }

    /// Runs `f` inside one SQLite transaction.
    ///
    /// The closure receives a [`StoreTx`] scope for reads and writes.
    /// If it returns `Ok` the transaction commits; if it returns `Err`
    /// (or panics) the transaction rolls back and no partial state
    /// survives.
    pub(crate) fn with_tx<T, E>(
        &self,
        f: impl FnOnce(&StoreTx<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;
        let value = {
            let scope = StoreTx {
                tx: &tx,
                default_balance: self.default_balance,
            };
            f(&scope)?
        };
        tx.commit().map_err(StoreError::from)?;
        Ok(value)
    }

    /// Inserts an account only if no row with that id exists yet.
    ///
    /// Returns `true` when the row was written, `false` when an existing
    /// balance was left untouched. Used by the legacy importer, which
    /// must never clobber live data.
    pub(crate) fn insert_if_absent(&self, id: &str, balance: i64) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO accounts (id, balance) VALUES (?1, ?2)",
            params![id, balance],
        )?;
        Ok(inserted > 0)
    }

    /// Reports whether an account row exists, without creating one.
    pub(crate) fn contains(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let row: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM accounts WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(row.is_some())
    }

    /// Returns history entries touching `id`, newest first.
    ///
    /// Timestamps have one-second granularity, so entries sharing a
    /// second are ordered by their position in the log, latest append
    /// first. Only entries strictly younger than `max_age_secs` are
    /// returned, so an age of zero yields nothing.
    pub fn history_for(
        &self,
        id: &str,
        max_age_secs: i64,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        let cutoff = unix_now().saturating_sub(max_age_secs);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT sender, recipient, amount, time, note FROM history \
             WHERE (sender = ?1 OR recipient = ?1) AND time > ?2 \
             ORDER BY time DESC, rowid DESC",
        )?;
        let entries = stmt
            .query_map(params![id, cutoff], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Deletes every history entry aged `max_age_secs` or older.
    ///
    /// The boundary is inclusive: an entry exactly `max_age_secs` old is
    /// removed, and an age of zero wipes the whole log. Returns the
    /// number of deleted entries.
    pub fn purge_history(&self, max_age_secs: i64) -> Result<usize, StoreError> {
        let cutoff = unix_now().saturating_sub(max_age_secs);
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM history WHERE time <= ?1", params![cutoff])?;
        Ok(deleted)
    }

    /// Returns up to `limit` accounts ordered by balance, richest first.
    ///
    /// A void row is excluded if one ever shows up in a foreign
    /// database. Ties come back in no particular order.
    pub fn top_balances(&self, limit: u32) -> Result<Vec<(AccountId, i64)>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, balance FROM accounts WHERE id <> '' \
             ORDER BY balance DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

/// Transactional scope handed to [`LedgerStore::with_tx`] closures
///
/// Everything done through a scope belongs to one SQLite transaction.
pub struct StoreTx<'a> {
    tx: &'a Transaction<'a>,
    default_balance: i64,
}

impl StoreTx<'_> {
    /// Reads a balance, creating the account with the default balance on
    /// first access.
    pub(crate) fn balance_or_init(&self, id: &str) -> Result<i64, StoreError> {
        let existing: Option<i64> = self
            .tx
            .query_row(
                "SELECT balance FROM accounts WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match existing {
            Some(balance) => Ok(balance),
            None => {
                self.tx.execute(
                    "INSERT INTO accounts (id, balance) VALUES (?1, ?2)",
                    params![id, self.default_balance],
                )?;
                Ok(self.default_balance)
            }
        }
    }

    /// Overwrites a balance. The row must already exist; callers always
    /// read through `balance_or_init` first.
    pub(crate) fn set_balance(&self, id: &str, balance: i64) -> Result<(), StoreError> {
        self.tx.execute(
            "UPDATE accounts SET balance = ?1 WHERE id = ?2",
            params![balance, id],
        )?;
        Ok(())
    }

    /// Appends one entry to the history log.
    pub(crate) fn append_entry(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        self.tx.execute(
            "INSERT INTO history (sender, recipient, amount, time, note) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.from,
                entry.to,
                entry.amount,
                entry.timestamp,
                entry.note
            ],
        )?;
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = MEMORY;
         PRAGMA synchronous = NORMAL;
         CREATE TABLE IF NOT EXISTS accounts (
             id      TEXT PRIMARY KEY NOT NULL,
             balance INTEGER NOT NULL
         ) WITHOUT ROWID;
         CREATE TABLE IF NOT EXISTS history (
             sender    TEXT NOT NULL,
             recipient TEXT NOT NULL,
             amount    INTEGER NOT NULL,
             time      INTEGER NOT NULL,
             note      TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_history_time ON history (time DESC);",
    )
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        from: row.get(0)?,
        to: row.get(1)?,
        amount: row.get(2)?,
        timestamp: row.get(3)?,
        note: row.get(4)?,
    })
}
