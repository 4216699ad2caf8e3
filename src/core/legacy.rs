//! One-time migration of a legacy balance database
//!
//! Earlier deployments stored balances keyed by an 8-byte
//! little-endian blob instead of a decimal string. When such a file is
//! found next to the current store, its rows are copied over once and
//! the file is renamed aside so the migration never repeats.
//!
//! The copy is deliberately not transactional: a crash mid-import
//! leaves the already-migrated accounts in place and the legacy file
//! untouched, so the next startup simply resumes. Existing accounts
//! always win over legacy rows.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::{info, warn};

use crate::core::store::LedgerStore;
use crate::types::ImportError;

/// Tally of a completed migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Accounts copied into the current store
    pub imported: usize,
    /// Legacy rows skipped (undecodable id or account already present)
    pub skipped: usize,
}

/// Migrates `legacy_path` into `store` if the file exists.
///
/// Returns `Ok(None)` when there is nothing to migrate. After a
/// successful pass the legacy file is renamed with an `_old` suffix.
pub(crate) fn import_from(
    store: &LedgerStore,
    legacy_path: &Path,
) -> Result<Option<ImportOutcome>, ImportError> {
    if !legacy_path.exists() {
        return Ok(None);
    }
    info!(path = %legacy_path.display(), "legacy balance data detected, migrating");

    let outcome = copy_balances(store, legacy_path)?;

    let archived = archive_path(legacy_path);
    std::fs::rename(legacy_path, &archived).map_err(ImportError::Archive)?;
    info!(
        imported = outcome.imported,
        skipped = outcome.skipped,
        archived = %archived.display(),
        "legacy migration complete"
    );
    Ok(Some(outcome))
}

fn copy_balances(store: &LedgerStore, legacy_path: &Path) -> Result<ImportOutcome, ImportError> {
    let legacy = Connection::open_with_flags(legacy_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(ImportError::Open)?;

    let mut stmt = legacy
        .prepare("SELECT hex(XUID), Money FROM money")
        .map_err(ImportError::Read)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(ImportError::Read)?;

    let mut outcome = ImportOutcome {
        imported: 0,
        skipped: 0,
    };
    for row in rows {
        let (hex_id, balance) = match row {
            Ok(pair) => pair,
            Err(cause) => {
                warn!(%cause, "unreadable legacy row, skipping");
                outcome.skipped += 1;
                continue;
            }
        };
        let Some(id) = decode_legacy_id(&hex_id) else {
            warn!(%hex_id, "undecodable legacy identifier, skipping");
            outcome.skipped += 1;
            continue;
        };
        match store.insert_if_absent(&id, balance) {
            Ok(true) => outcome.imported += 1,
            Ok(false) => {
                warn!(%id, "account already exists, keeping current balance");
                outcome.skipped += 1;
            }
            Err(cause) => return Err(ImportError::Write(cause)),
        }
    }
    Ok(outcome)
}

/// Legacy ids are the hex dump of an 8-byte little-endian integer.
/// Parsing the dump big-endian and swapping the bytes recovers the
/// numeric id, which is then rendered in decimal like current ids.
fn decode_legacy_id(hex_id: &str) -> Option<String> {
    let big_endian = u64::from_str_radix(hex_id.trim(), 16).ok()?;
    Some(big_endian.swap_bytes().to_string())
}

fn archive_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("legacy");
    let name = match path.extension().and_then(OsStr::to_str) {
        Some(ext) => format!("{stem}_old.{ext}"),
        None => format!("{stem}_old"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn write_legacy_db(path: &Path, rows: &[(u64, i64)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE money (XUID BLOB PRIMARY KEY UNIQUE NOT NULL, Money NUMERIC NOT NULL)",
        )
        .unwrap();
        for (id, balance) in rows {
            conn.execute(
                "INSERT INTO money (XUID, Money) VALUES (?1, ?2)",
                params![id.to_le_bytes().as_slice(), balance],
            )
            .unwrap();
        }
    }

    #[test]
    fn decodes_byte_swapped_hex_ids() {
        let id: u64 = 2_535_461_588_737_967;
        let hex_dump: String = id
            .to_le_bytes()
            .iter()
            .map(|byte| format!("{byte:02X}"))
            .collect();

        assert_eq!(decode_legacy_id(&hex_dump), Some(id.to_string()));
    }

    #[test]
    fn rejects_garbage_hex() {
        assert_eq!(decode_legacy_id("not-hex"), None);
        assert_eq!(decode_legacy_id(""), None);
        // Longer than 8 bytes cannot be a legacy id.
        assert_eq!(decode_legacy_id("00112233445566778899"), None);
    }

    #[test]
    fn archive_path_appends_old_suffix() {
        assert_eq!(
            archive_path(Path::new("/data/money.db")),
            PathBuf::from("/data/money_old.db")
        );
        assert_eq!(
            archive_path(Path::new("money")),
            PathBuf::from("money_old")
        );
    }

    #[test]
    fn migrates_rows_and_renames_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let legacy_path = dir.path().join("money.db");
        write_legacy_db(&legacy_path, &[(17, 900), (4_242, 50)]);

        let store = LedgerStore::open_in_memory(0).unwrap();
        let outcome = import_from(&store, &legacy_path).unwrap().unwrap();

        assert_eq!(outcome.imported, 2);
        assert_eq!(outcome.skipped, 0);
        assert!(store.contains("17").unwrap());
        assert!(store.contains("4242").unwrap());
        assert!(!legacy_path.exists());
        assert!(dir.path().join("money_old.db").exists());
    }

    #[test]
    fn existing_accounts_are_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let legacy_path = dir.path().join("money.db");
        write_legacy_db(&legacy_path, &[(17, 900)]);

        let store = LedgerStore::open_in_memory(0).unwrap();
        store.insert_if_absent("17", 1_234).unwrap();

        let outcome = import_from(&store, &legacy_path).unwrap().unwrap();
        assert_eq!(outcome.imported, 0);
        assert_eq!(outcome.skipped, 1);

        let balance = store.with_tx(|tx| tx.balance_or_init("17")).unwrap();
        assert_eq!(balance, 1_234);
    }

    #[test]
    fn missing_legacy_file_is_a_clean_no_op() {
        let store = LedgerStore::open_in_memory(0).unwrap();
        let outcome = import_from(&store, Path::new("/nonexistent/money.db")).unwrap();
        assert_eq!(outcome, None);
    }

    #[test]
    fn second_run_finds_nothing_to_do() {
        let dir = tempfile::tempdir().unwrap();
        let legacy_path = dir.path().join("money.db");
        write_legacy_db(&legacy_path, &[(17, 900)]);

        let store = LedgerStore::open_in_memory(0).unwrap();
        import_from(&store, &legacy_path).unwrap();

        assert_eq!(import_from(&store, &legacy_path).unwrap(), None);
    }
}
