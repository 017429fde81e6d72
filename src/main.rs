use anyhow::Context;
use clap::Parser;
use expense_splitter::{
    args::{Args, Command},
    config::Config,
    run,
    store::{ExpenseBook, JsonFileStore},
};
use std::{fs::File, io::Write, process::ExitCode};
use tracing::{debug, error, trace};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.log_level);
    debug!("Log level set to {}", args.log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn main_inner(args: Args) -> anyhow::Result<()> {
    trace!("{args:?}");

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(store) = args.store {
        config = config.with_store_path(store);
    }
    debug!("Using expenses from {}", config.store_path().display());

    let mut book = ExpenseBook::new(
        JsonFileStore::new(config.store_path()),
        config.roster().to_vec(),
    );
    let mut stdout = std::io::stdout().lock();

    match args.command {
        Command::Add(add_args) => run::add(&mut book, add_args),
        Command::List(list_args) => run::list(&book, list_args, stdout),
        Command::Delete { index } => run::delete(&mut book, index),
        Command::Reset { yes } => run::reset(&mut book, yes),
        Command::Import { file } => {
            let input = File::open(&file)
                .with_context(|| format!("Unable to open {}", file.display()))?;
            let count = run::import(&mut book, input)?;
            writeln!(stdout, "Imported {count} expenses from {}", file.display())?;
            Ok(())
        }
        Command::Balances { csv } => run::balances(&book, csv, stdout),
        Command::Settle {
            input: Some(file),
            csv,
        } => {
            let input = File::open(&file)
                .with_context(|| format!("Unable to open {}", file.display()))?;
            run::run(input, csv, stdout)
        }
        Command::Settle { input: None, csv } => run::settle(&book, csv, stdout),
    }
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use the given log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                "expense_splitter",
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
