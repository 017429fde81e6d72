//! What each command does, independently of how it was invoked.

use crate::{
    args::{AddArgs, ListArgs},
    filter::RecordFilter,
    input, output,
    settlement::{self, compute_balances, ExpenseRecord},
    store::{ExpenseBook, RecordStore},
};

use anyhow::{bail, Context, Result};
use std::io::Write;
use tracing::{debug, info};

/// Settle the expenses read as CSV from `input_stream`, without going through a store.
/// Writes one instruction per line to `output_stream`, or CSV when `csv` is set.
pub fn run(input_stream: impl std::io::Read, csv: bool, output_stream: impl Write) -> Result<()> {
    let records = input::parse(input_stream)?;
    settle_records(&records, csv, output_stream)
}

pub fn add<S: RecordStore>(book: &mut ExpenseBook<S>, args: AddArgs) -> Result<()> {
    let mut record = ExpenseRecord::new(args.payer, args.amount, args.memo);
    if let Some(date) = args.date {
        record = record.with_date(date);
    }

    let snapshot = book.snapshot()?;
    let revision = book.append(record, snapshot.revision)?;
    debug!("expenses now at revision {}", revision);
    Ok(())
}

pub fn list<S: RecordStore>(
    book: &ExpenseBook<S>,
    args: ListArgs,
    mut output_stream: impl Write,
) -> Result<()> {
    let filter = RecordFilter {
        payer: args.payer,
        from: args.from,
        to: args.to,
        memo_contains: args.memo,
    };

    let snapshot = book.snapshot()?;
    let matching = filter.apply(&snapshot.records);
    debug!(
        "{} of {} expenses match {:?}",
        matching.len(),
        snapshot.records.len(),
        filter
    );

    for line in output::render_records(matching) {
        writeln!(output_stream, "{}", line)?;
    }
    Ok(())
}

pub fn delete<S: RecordStore>(book: &mut ExpenseBook<S>, index: usize) -> Result<()> {
    let snapshot = book.snapshot()?;
    book.delete(index, snapshot.revision)?;
    Ok(())
}

pub fn reset<S: RecordStore>(book: &mut ExpenseBook<S>, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("Refusing to delete every expense without --yes");
    }

    let snapshot = book.snapshot()?;
    book.reset(snapshot.revision)?;
    Ok(())
}

pub fn import<S: RecordStore>(
    book: &mut ExpenseBook<S>,
    input_stream: impl std::io::Read,
) -> Result<usize> {
    let records = input::parse(input_stream).context("Unable to import expenses")?;
    let count = records.len();

    let snapshot = book.snapshot()?;
    book.extend(records, snapshot.revision)?;
    info!("imported {} expenses", count);
    Ok(count)
}

pub fn balances<S: RecordStore>(
    book: &ExpenseBook<S>,
    csv: bool,
    mut output_stream: impl Write,
) -> Result<()> {
    let snapshot = book.snapshot()?;
    let balances = compute_balances(&snapshot.records)?;

    if csv {
        output::write_balances(output_stream, &balances)?;
        return Ok(());
    }

    if balances.is_empty() {
        writeln!(output_stream, "No expenses recorded yet.")?;
        return Ok(());
    }
    for line in output::render_totals(&balances) {
        writeln!(output_stream, "{}", line)?;
    }
    writeln!(
        output_stream,
        "Total {}, {} each",
        settlement::in_minor_units(balances.total()),
        settlement::in_minor_units(balances.fair_share())
    )?;
    Ok(())
}

pub fn settle<S: RecordStore>(
    book: &ExpenseBook<S>,
    csv: bool,
    output_stream: impl Write,
) -> Result<()> {
    let snapshot = book.snapshot()?;
    debug!(
        "settling {} expenses at revision {}",
        snapshot.records.len(),
        snapshot.revision
    );
    settle_records(&snapshot.records, csv, output_stream)
}

fn settle_records(records: &[ExpenseRecord], csv: bool, mut output_stream: impl Write) -> Result<()> {
    let settlement = settlement::settle(records)?;
    debug!(
        "{} participants, {} transfers",
        settlement.balances.len(),
        settlement.transfers.len()
    );

    if csv {
        output::write_transfers(output_stream, &settlement.transfers)?;
        return Ok(());
    }

    for line in output::render_instructions(&settlement.transfers) {
        writeln!(output_stream, "{}", line)?;
    }
    Ok(())
}
