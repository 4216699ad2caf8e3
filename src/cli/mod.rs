// CLI module
// Command-line dispatch and output rendering

mod args;
mod render;

pub use args::{CliArgs, Command};
pub use render::{format_entry, format_top_row, NameResolver, RawIds};

use std::io;

use clap::Parser;
use thiserror::Error;
use tracing::warn;

use crate::config::LedgerConfig;
use crate::core::Ledger;
use crate::types::{LedgerError, StoreError};

/// Database file name inside the data directory.
const DB_FILE: &str = "economy.db";

/// Config file name inside the data directory.
const CONFIG_FILE: &str = "ledger.json";

/// Legacy database migrated (once) when found inside the data directory.
const LEGACY_DB_FILE: &str = "money.db";

/// Errors surfaced to the terminal by [`run`]
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or created
    #[error("Config error: {0}")]
    Config(#[from] io::Error),

    /// The ledger store could not be opened
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A ledger operation failed
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The ranking command is disabled by configuration
    #[error("Balance ranking is not enabled")]
    RankingDisabled,
}

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing required arguments, or
/// the --help flag), clap displays an error message or help text and
/// exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Loads config, opens the ledger under the data directory, migrates
/// legacy data if present, and executes one command.
///
/// # Errors
///
/// Returns `CliError` when config loading, store opening, or the
/// requested operation fails. A failed legacy migration is logged and
/// does not abort the command.
pub fn run(args: &CliArgs) -> Result<(), CliError> {
    let data_dir = args.data_dir.as_path();
    let config = LedgerConfig::load_or_init(&data_dir.join(CONFIG_FILE))?;
    let ledger = Ledger::open(
        &data_dir.join(DB_FILE),
        config.default_balance,
        config.tax_rate,
    )?;

    if let Err(cause) = ledger.import_legacy(&data_dir.join(LEGACY_DB_FILE)) {
        warn!(%cause, "legacy migration failed, continuing without it");
    }

    dispatch(&ledger, &config, &args.command)
}

fn dispatch(ledger: &Ledger, config: &LedgerConfig, command: &Command) -> Result<(), CliError> {
    let resolver = RawIds;
    let symbol = config.currency_symbol.as_str();
    match command {
        Command::Balance { id } => {
            let balance = ledger.balance(id)?;
            println!("Balance: {symbol}{balance}");
        }
        Command::Add { id, amount } => {
            ledger.add(id, *amount)?;
            println!("Added {symbol}{amount} to {id}");
        }
        Command::Reduce { id, amount } => {
            ledger.reduce(id, *amount)?;
            println!("Reduced {id} by {symbol}{amount}");
        }
        Command::Set { id, amount } => {
            ledger.set(id, *amount)?;
            println!("Set {id} to {symbol}{amount}");
        }
        Command::Pay { from, to, amount } => {
            ledger.transfer(from, to, *amount, "money pay")?;
            println!("Paid {symbol}{amount} from {from} to {to}");
        }
        Command::Hist { id, age } => {
            for entry in ledger.history(id, *age)? {
                println!("{}", render::format_entry(&entry, &resolver));
            }
        }
        Command::Purge { age } => {
            ledger.purge_history(*age);
            println!("History purged");
        }
        Command::Top { count } => {
            if !config.enable_ranking {
                return Err(CliError::RankingDisabled);
            }
            println!("===== Ranking =====");
            for (id, balance) in ledger.top_balances(*count)? {
                println!("{}", render::format_top_row(&id, balance, &resolver));
            }
            println!("===================");
        }
    }
    Ok(())
}
