//! SettlementPlanner: who pays whom, and how much.
//!
//! Greedy two-pointer sweep over debtors and creditors, both taken in the order
//! participants first appear in the balances:
//! - the current debtor pays the current creditor the smaller of what the one owes
//!   and what the other is due,
//! - whoever is settled by that payment is left behind, and the sweep moves on,
//! - it stops as soon as either side runs out.
//!
//! This doesn't always find the fewest possible payments (finding those is NP-hard),
//! but it never needs more than `debtors + creditors - 1` of them, and it always
//! produces the same list for the same balances. It is kept as is on purpose: users
//! compare its output to what they got before.

use super::{in_minor_units, minor_unit, Amount, Balances, Participant, SettlementError};

use std::fmt;

/// A single payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub from: Participant,
    pub to: Participant,
    pub amount: Amount,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pays {} to {}",
            self.from,
            in_minor_units(self.amount),
            self.to
        )
    }
}

/// Plan the transfers that bring every balance back to zero.
///
/// Participants whose balance is zero are left out. Fails only when the balances
/// don't sum to zero, within one minor unit per participant.
pub fn plan(balances: &Balances) -> Result<Vec<Transfer>, SettlementError> {
    // (participant, outstanding magnitude)
    let mut debtors: Vec<(&str, Amount)> = Vec::new();
    let mut creditors: Vec<(&str, Amount)> = Vec::new();

    for balance in balances.iter() {
        if balance.is_debtor() {
            debtors.push((balance.participant.as_str(), -balance.net));
        } else if balance.is_creditor() {
            creditors.push((balance.participant.as_str(), balance.net));
        }
    }

    check_consistency(&debtors, &creditors, balances.len())?;

    let mut transfers = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let (debtor, owed) = debtors[i];
        let (creditor, due) = creditors[j];
        let amount = owed.min(due);

        if !amount.is_zero() {
            transfers.push(Transfer {
                from: debtor.to_owned(),
                to: creditor.to_owned(),
                amount,
            });
        }

        debtors[i].1 -= amount;
        creditors[j].1 -= amount;

        if debtors[i].1.is_zero() {
            i += 1;
        }
        if creditors[j].1.is_zero() {
            j += 1;
        }
    }

    Ok(transfers)
}

// Both sides are allowed to drift apart by one minor unit per participant,
// which is the most the rounding of each balance can introduce.
fn check_consistency(
    debtors: &[(&str, Amount)],
    creditors: &[(&str, Amount)],
    participants: usize,
) -> Result<(), SettlementError> {
    let debts: Amount = debtors.iter().map(|(_, owed)| *owed).sum();
    let credits: Amount = creditors.iter().map(|(_, due)| *due).sum();
    let tolerance = minor_unit() * Amount::from(participants);

    if (debts - credits).abs() > tolerance {
        return Err(SettlementError::InvariantViolation {
            debts,
            credits,
            tolerance,
        });
    }

    Ok(())
}
