use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage account balances with taxed transfers and history
#[derive(Parser, Debug)]
#[command(name = "economy-ledger")]
#[command(about = "Manage account balances with taxed transfers and history", long_about = None)]
pub struct CliArgs {
    /// Directory holding the database and config file
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = "data",
        help = "Directory holding the database and config file"
    )]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Ledger operations available from the command line
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Show an account's balance, creating the account on first use
    Balance {
        /// Account id
        id: String,
    },

    /// Mint an amount into an account
    Add {
        /// Account id
        id: String,
        /// Amount in minor units
        amount: i64,
    },

    /// Burn an amount out of an account
    Reduce {
        /// Account id
        id: String,
        /// Amount in minor units
        amount: i64,
    },

    /// Overwrite an account's balance
    Set {
        /// Account id
        id: String,
        /// Target balance in minor units
        amount: i64,
    },

    /// Pay another account; tax is withheld from the credit
    Pay {
        /// Paying account id
        from: String,
        /// Receiving account id
        to: String,
        /// Amount in minor units, before tax
        amount: i64,
    },

    /// Show an account's recent transfers, newest first
    Hist {
        /// Account id
        id: String,
        /// Maximum entry age in seconds
        #[arg(long, value_name = "SECONDS", default_value_t = 86_400)]
        age: i64,
    },

    /// Delete history entries at least this old
    Purge {
        /// Age threshold in seconds; 0 wipes the whole log
        #[arg(long, value_name = "SECONDS", default_value_t = 0)]
        age: i64,
    },

    /// Show the highest balances
    Top {
        /// How many accounts to list
        #[arg(value_name = "COUNT", default_value_t = 5)]
        count: u32,
    },
}
