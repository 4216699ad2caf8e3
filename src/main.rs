//! Economy Ledger CLI
//!
//! Command-line interface for the transactional balance ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- balance alice
//! cargo run -- add alice 500
//! cargo run -- pay alice bob 100
//! cargo run -- hist alice --age 3600
//! cargo run -- --data-dir /srv/ledger top 10
//! ```
//!
//! State lives under the data directory (default `data/`): the SQLite
//! database, the JSON config, and, if present, a legacy database that
//! is migrated once on startup. Set `RUST_LOG` to control diagnostics
//! (e.g. `RUST_LOG=economy_ledger=debug`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid arguments, insufficient funds, store failure, etc.)

use economy_ledger::cli;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    if let Err(e) = cli::run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
