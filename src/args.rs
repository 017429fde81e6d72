//! Command line interface of the `splitter` binary.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// splitter: keeps track of what everybody in the group spent, and tells who
/// should pay whom so that everybody ends up having paid the same.
#[derive(Debug, Parser, Clone)]
#[command(name = "splitter", version)]
pub struct Args {
    /// JSON file holding the roster and the location of the expenses file.
    #[arg(long, env = "SPLITTER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Expenses file to use, overriding the one from the configuration.
    #[arg(long, env = "SPLITTER_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::WARN, global = true)]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Record an expense.
    Add(AddArgs),
    /// List recorded expenses, optionally filtered.
    List(ListArgs),
    /// Delete the expense with the given number, as shown by `list`.
    Delete {
        index: usize,
    },
    /// Delete every expense.
    Reset {
        /// Required, as there is no way back.
        #[arg(long)]
        yes: bool,
    },
    /// Append the expenses of a CSV file (payer,amount,memo,date).
    Import {
        file: PathBuf,
    },
    /// Show what each participant paid and how far they are from an equal split.
    Balances {
        /// Print CSV instead of a table.
        #[arg(long)]
        csv: bool,
    },
    /// Show who should pay whom.
    Settle {
        /// Settle the expenses of this CSV file instead of the recorded ones.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print CSV instead of sentences.
        #[arg(long)]
        csv: bool,
    },
}

#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Who paid.
    pub payer: String,

    /// How much, e.g. 120.50
    pub amount: Decimal,

    /// What it was for.
    pub memo: String,

    /// When it happened (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// Only expenses paid by this participant.
    #[arg(long)]
    pub payer: Option<String>,

    /// Only expenses on or after this date (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Only expenses on or before this date (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only expenses whose memo contains this text.
    #[arg(long)]
    pub memo: Option<String>,
}
