use crate::settlement::{in_minor_units, Amount, Balances, ExpenseRecord, Transfer};

use serde::Serialize;

#[derive(Serialize)]
struct BalanceRow<'a> {
    participant: &'a str,
    paid: Amount,
    net: Amount,
}

#[derive(Serialize)]
struct TransferRow<'a> {
    from: &'a str,
    to: &'a str,
    amount: Amount,
}

/// Writes one CSV row per participant, in first-occurrence order.
pub fn write_balances(
    output_stream: impl std::io::Write,
    balances: &Balances,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(output_stream);

    for balance in balances.iter() {
        writer.serialize(BalanceRow {
            participant: &balance.participant,
            paid: in_minor_units(balance.paid),
            net: in_minor_units(balance.net),
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the transfers to the given stream, in the order they were planned.
pub fn write_transfers(
    output_stream: impl std::io::Write,
    transfers: &[Transfer],
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(output_stream);

    for transfer in transfers {
        writer.serialize(TransferRow {
            from: &transfer.from,
            to: &transfer.to,
            amount: in_minor_units(transfer.amount),
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// One human-readable line per transfer.
pub fn render_instructions(transfers: &[Transfer]) -> Vec<String> {
    if transfers.is_empty() {
        return vec!["Nothing to settle, everyone is even.".to_string()];
    }

    transfers.iter().map(Transfer::to_string).collect()
}

/// One line per record, numbered so that they can be deleted by index.
pub fn render_records<'a>(records: impl IntoIterator<Item = (usize, &'a ExpenseRecord)>) -> Vec<String> {
    let lines: Vec<String> = records
        .into_iter()
        .map(|(index, record)| {
            let date = match record.occurred_on() {
                Some(date) => format!(" on {}", date),
                None => String::new(),
            };
            format!(
                "[{}] {} spent {} for {}{}",
                index,
                record.payer(),
                in_minor_units(record.amount()),
                record.memo(),
                date
            )
        })
        .collect();

    if lines.is_empty() {
        return vec!["No expenses recorded yet.".to_string()];
    }
    lines
}

/// Totals per payer, widest name first padded so the amounts line up.
pub fn render_totals(balances: &Balances) -> Vec<String> {
    let width = balances
        .iter()
        .map(|balance| balance.participant.chars().count())
        .max()
        .unwrap_or(0);

    balances
        .iter()
        .map(|balance| {
            format!(
                "{:<width$}  paid {:>10}  net {:>10}",
                balance.participant,
                in_minor_units(balance.paid).to_string(),
                in_minor_units(balance.net).to_string(),
                width = width
            )
        })
        .collect()
}
