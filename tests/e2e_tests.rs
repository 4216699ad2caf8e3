//! End-to-end integration tests
//!
//! These tests drive the crate the way an embedding application would:
//! a ledger is opened on a real database file in a temporary directory,
//! operations run against the public API (or through the CLI dispatch),
//! and the process-restart story is exercised by dropping the ledger
//! and reopening the same file.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use rusqlite::{params, Connection};
    use tempfile::TempDir;

    use economy_ledger::cli::{self, CliArgs, Command};
    use economy_ledger::{EventRecord, Ledger, LedgerConfig, LedgerError, Verdict};

    /// Creates a data directory whose config grants 100 on first access
    /// and withholds 10% tax on peer transfers.
    fn data_dir_with_config() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            dir.path().join("ledger.json"),
            r#"{ "default_balance": 100, "tax_rate": 0.1 }"#,
        )
        .expect("Failed to write config");
        dir
    }

    fn run(dir: &TempDir, command: Command) -> Result<(), cli::CliError> {
        let args = CliArgs {
            data_dir: dir.path().to_path_buf(),
            command,
        };
        cli::run(&args)
    }

    fn open_ledger(dir: &TempDir) -> Ledger {
        let config = LedgerConfig::load_or_init(&dir.path().join("ledger.json"))
            .expect("Failed to load config");
        Ledger::open(
            &dir.path().join("economy.db"),
            config.default_balance,
            config.tax_rate,
        )
        .expect("Failed to open ledger")
    }

    #[test]
    fn balances_and_history_survive_a_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("economy.db");

        {
            let ledger = Ledger::open(&path, 100, 0.10).unwrap();
            ledger.add("alice", 500).unwrap();
            ledger.transfer("alice", "bob", 100, "money pay").unwrap();
        }

        let ledger = Ledger::open(&path, 100, 0.10).unwrap();
        assert_eq!(ledger.balance("alice").unwrap(), 500);
        assert_eq!(ledger.balance("bob").unwrap(), 190);

        let entries = ledger.history("alice", 86_400).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].note, "money pay");
        assert_eq!(entries[1].note, "add 500");
    }

    #[test]
    fn cli_commands_share_one_store() {
        let dir = data_dir_with_config();

        run(&dir, Command::Add { id: "alice".into(), amount: 500 }).unwrap();
        run(
            &dir,
            Command::Pay {
                from: "alice".into(),
                to: "bob".into(),
                amount: 100,
            },
        )
        .unwrap();
        run(&dir, Command::Hist { id: "alice".into(), age: 86_400 }).unwrap();
        run(&dir, Command::Top { count: 5 }).unwrap();

        let ledger = open_ledger(&dir);
        assert_eq!(ledger.balance("alice").unwrap(), 500);
        assert_eq!(ledger.balance("bob").unwrap(), 190);
    }

    #[test]
    fn cli_surfaces_ledger_failures() {
        let dir = data_dir_with_config();

        let result = run(&dir, Command::Reduce { id: "alice".into(), amount: 101 });
        assert!(matches!(
            result,
            Err(cli::CliError::Ledger(LedgerError::InsufficientFunds { .. }))
        ));

        // The failed reduce must not have touched the balance.
        let ledger = open_ledger(&dir);
        assert_eq!(ledger.balance("alice").unwrap(), 100);
    }

    #[test]
    fn purge_command_wipes_history() {
        let dir = data_dir_with_config();

        run(&dir, Command::Add { id: "alice".into(), amount: 5 }).unwrap();
        run(&dir, Command::Purge { age: 0 }).unwrap();

        let ledger = open_ledger(&dir);
        assert!(ledger.history("alice", i64::MAX).unwrap().is_empty());
    }

    #[test]
    fn legacy_database_is_migrated_once_on_startup() {
        let dir = data_dir_with_config();
        let legacy_path = dir.path().join("money.db");

        // A pre-migration database keyed by little-endian id blobs.
        let id: u64 = 2_535_461_588_737_967;
        {
            let conn = Connection::open(&legacy_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE money \
                 (XUID BLOB PRIMARY KEY UNIQUE NOT NULL, Money NUMERIC NOT NULL)",
            )
            .unwrap();
            conn.execute(
                "INSERT INTO money (XUID, Money) VALUES (?1, ?2)",
                params![id.to_le_bytes().as_slice(), 900_i64],
            )
            .unwrap();
        }

        run(&dir, Command::Balance { id: id.to_string() }).unwrap();

        assert!(!legacy_path.exists());
        assert!(dir.path().join("money_old.db").exists());

        let ledger = open_ledger(&dir);
        assert_eq!(ledger.balance(&id.to_string()).unwrap(), 900);
    }

    #[test]
    fn after_hooks_may_reenter_the_ledger() {
        let ledger = Arc::new(Ledger::open_in_memory(100, 0.0).unwrap());
        let observed = Arc::new(AtomicUsize::new(0));

        let inner = Arc::clone(&ledger);
        let sink = Arc::clone(&observed);
        ledger.register_after(move |record: &EventRecord| {
            // Reading back through the ledger must not deadlock.
            let balance = inner.balance(&record.to).unwrap();
            sink.store(balance as usize, Ordering::SeqCst);
        });

        ledger.add("alice", 400).unwrap();
        assert_eq!(observed.load(Ordering::SeqCst), 500);
    }

    #[test]
    fn vetoes_keep_the_store_clean_end_to_end() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("economy.db");

        {
            let ledger = Ledger::open(&path, 100, 0.0).unwrap();
            ledger.register_before(|record: &EventRecord| {
                if record.value > 1_000 {
                    Verdict::Deny
                } else {
                    Verdict::Allow
                }
            });

            ledger.add("alice", 200).unwrap();
            assert!(matches!(
                ledger.add("alice", 2_000),
                Err(LedgerError::Vetoed)
            ));
        }

        let ledger = Ledger::open(&path, 100, 0.0).unwrap();
        assert_eq!(ledger.balance("alice").unwrap(), 300);
        assert_eq!(ledger.history("alice", 86_400).unwrap().len(), 1);
    }

    #[test]
    fn config_file_is_created_with_defaults_on_first_run() {
        let dir = TempDir::new().unwrap();

        run(&dir, Command::Balance { id: "alice".into() }).unwrap();

        let text = std::fs::read_to_string(dir.path().join("ledger.json")).unwrap();
        assert!(text.contains("default_balance"));
        assert!(text.contains("tax_rate"));

        // Default config grants nothing on first access.
        let ledger = open_ledger(&dir);
        assert_eq!(ledger.balance("alice").unwrap(), 0);
    }
}
