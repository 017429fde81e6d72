//! BalanceCalculator: how far each participant is from an equal split.
//!
//! fair share = total spent / number of distinct payers
//! net        = paid - fair share, rounded to the currency's minor unit
//!
//! A positive net means the participant overpaid and is owed money (creditor),
//! a negative net means they owe money (debtor).

use super::{
    error::{InputProblem, SettlementError},
    round_currency, Amount, ExpenseRecord, Participant,
};

use std::collections::HashMap;

/// Where a single participant stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub participant: Participant,

    /// Everything this participant paid for.
    pub paid: Amount,

    /// `paid - fair share`, rounded. Positive: owed money. Negative: owes money.
    pub net: Amount,
}

impl Balance {
    pub fn is_creditor(&self) -> bool {
        self.net.is_sign_positive() && !self.net.is_zero()
    }

    pub fn is_debtor(&self) -> bool {
        self.net.is_sign_negative() && !self.net.is_zero()
    }
}

/// Balances of every participant, in the order they first paid for something.
///
/// A HashMap alone would lose that order, and the planner needs it to produce
/// the same transfers on every run, so the order is kept separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Balances {
    order: Vec<Participant>,
    by_participant: HashMap<Participant, Balance>,
    total: Amount,
    fair_share: Amount,
}

impl Balances {
    /// Build balances from already computed net amounts, keeping the given order.
    /// A participant listed twice has its amounts added up.
    ///
    /// Nothing is checked here: the planner refuses balances that don't sum to zero.
    pub fn from_net<P: Into<Participant>>(nets: impl IntoIterator<Item = (P, Amount)>) -> Self {
        let mut balances = Self::default();
        for (participant, net) in nets {
            let participant = participant.into();
            match balances.by_participant.get_mut(&participant) {
                Some(balance) => balance.net += net,
                None => {
                    balances.order.push(participant.clone());
                    balances.by_participant.insert(
                        participant.clone(),
                        Balance {
                            participant,
                            paid: Amount::ZERO,
                            net,
                        },
                    );
                }
            }
        }

        balances
    }

    /// Balances in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &Balance> {
        self.order
            .iter()
            .filter_map(move |participant| self.by_participant.get(participant))
    }

    pub fn get(&self, participant: &str) -> Option<&Balance> {
        self.by_participant.get(participant)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of every amount paid.
    pub fn total(&self) -> Amount {
        self.total
    }

    /// Unrounded share each participant is expected to pay.
    pub fn fair_share(&self) -> Amount {
        self.fair_share
    }

    /// Sum of all the net amounts. Zero, give or take the rounding of each balance.
    pub fn net_sum(&self) -> Amount {
        self.iter().map(|balance| balance.net).sum()
    }
}

/// Reduce a snapshot of records into one balance per distinct payer.
///
/// The order of the records doesn't change any amount, only the order in
/// which participants are listed.
pub fn compute_balances(records: &[ExpenseRecord]) -> Result<Balances, SettlementError> {
    let mut order: Vec<Participant> = Vec::new();
    let mut paid_by: HashMap<Participant, Amount> = HashMap::new();
    let mut total = Amount::ZERO;

    for (index, record) in records.iter().enumerate() {
        let invalid = |problem: InputProblem| SettlementError::InvalidRecord { index, problem };
        validate(record).map_err(invalid)?;

        total = total
            .checked_add(record.amount())
            .ok_or_else(|| invalid(InputProblem::TooLarge(record.amount())))?;

        match paid_by.get_mut(record.payer()) {
            Some(sum) => {
                *sum = sum
                    .checked_add(record.amount())
                    .ok_or_else(|| invalid(InputProblem::TooLarge(record.amount())))?
            }
            None => {
                order.push(record.payer().to_owned());
                paid_by.insert(record.payer().to_owned(), record.amount());
            }
        }
    }

    // Nobody paid for anything, so nobody owes anything either.
    if order.is_empty() {
        return Ok(Balances::default());
    }

    let fair_share = total / Amount::from(order.len());

    let by_participant = order
        .iter()
        .map(|participant| {
            let paid = paid_by[participant];
            let balance = Balance {
                participant: participant.clone(),
                paid,
                net: net_amount(paid, fair_share),
            };
            (participant.clone(), balance)
        })
        .collect();

    Ok(Balances {
        order,
        by_participant,
        total,
        fair_share,
    })
}

// A share that rounds to nothing is plain zero, never "-0.00".
fn net_amount(paid: Amount, fair_share: Amount) -> Amount {
    let net = round_currency(paid - fair_share);
    if net.is_zero() {
        Amount::ZERO
    } else {
        net
    }
}

fn validate(record: &ExpenseRecord) -> Result<(), InputProblem> {
    if record.payer().trim().is_empty() {
        return Err(InputProblem::EmptyPayer);
    }
    if record.amount().is_sign_negative() && !record.amount().is_zero() {
        return Err(InputProblem::NegativeAmount(record.amount()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{compute_balances, Balances};
    use crate::settlement::{
        error::{InputProblem, SettlementError},
        ExpenseRecord,
    };

    use rust_decimal_macros::dec;

    fn nets(balances: &Balances) -> Vec<(String, rust_decimal::Decimal)> {
        balances
            .iter()
            .map(|b| (b.participant.clone(), b.net))
            .collect()
    }

    #[test]
    fn test_compute_balances_empty() {
        let balances = compute_balances(&[]).expect("empty input is not an error");
        assert!(balances.is_empty());
        assert_eq!(dec!(0), balances.total());
        assert_eq!(dec!(0), balances.fair_share());
    }

    #[test]
    fn test_compute_balances_one_creditor_one_debtor() {
        let records = vec![
            ExpenseRecord::new("A", dec!(100), "rent"),
            ExpenseRecord::new("B", dec!(0), "nothing"),
            ExpenseRecord::new("C", dec!(50), "food"),
        ];

        let balances = compute_balances(&records).unwrap();
        assert_eq!(dec!(150), balances.total());
        assert_eq!(dec!(50), balances.fair_share());
        assert_eq!(
            vec![
                ("A".to_string(), dec!(50)),
                ("B".to_string(), dec!(-50)),
                ("C".to_string(), dec!(0)),
            ],
            nets(&balances)
        );
    }

    #[test]
    fn test_compute_balances_groups_by_payer() {
        let records = vec![
            ExpenseRecord::new("B", dec!(10), "milk"),
            ExpenseRecord::new("A", dec!(30), "bread"),
            ExpenseRecord::new("B", dec!(20), "eggs"),
            ExpenseRecord::new("A", dec!(60), "rice"),
        ];

        let balances = compute_balances(&records).unwrap();
        assert_eq!(dec!(30), balances.get("B").unwrap().paid);
        assert_eq!(dec!(90), balances.get("A").unwrap().paid);

        // B paid first, so B is listed first.
        assert_eq!(
            vec![("B".to_string(), dec!(-30)), ("A".to_string(), dec!(30))],
            nets(&balances)
        );
    }

    #[test]
    fn test_compute_balances_rounds_to_cents() {
        let records = vec![
            ExpenseRecord::new("A", dec!(100), "internet"),
            ExpenseRecord::new("B", dec!(0), "nothing"),
            ExpenseRecord::new("C", dec!(0), "nothing"),
        ];

        let balances = compute_balances(&records).unwrap();
        assert_eq!(
            vec![
                ("A".to_string(), dec!(66.67)),
                ("B".to_string(), dec!(-33.33)),
                ("C".to_string(), dec!(-33.33)),
            ],
            nets(&balances)
        );
        // Off by one cent because of the rounding, but never more than a cent per participant.
        assert_eq!(dec!(0.01), balances.net_sum());
    }

    #[test]
    fn test_compute_balances_single_payer() {
        let records = vec![
            ExpenseRecord::new("A", dec!(12.34), "soap"),
            ExpenseRecord::new("A", dec!(5), "salt"),
        ];

        let balances = compute_balances(&records).unwrap();
        assert_eq!(1, balances.len());
        assert_eq!(dec!(0), balances.get("A").unwrap().net);
        assert_eq!(dec!(17.34), balances.get("A").unwrap().paid);
    }

    #[test]
    fn test_compute_balances_invalid_records() {
        for (records, want) in vec![
            (
                vec![
                    ExpenseRecord::new("A", dec!(10), "ok"),
                    ExpenseRecord::new("B", dec!(-0.01), "refund?"),
                ],
                SettlementError::InvalidRecord {
                    index: 1,
                    problem: InputProblem::NegativeAmount(dec!(-0.01)),
                },
            ),
            (
                vec![ExpenseRecord::new("  ", dec!(10), "who?")],
                SettlementError::InvalidRecord {
                    index: 0,
                    problem: InputProblem::EmptyPayer,
                },
            ),
        ] {
            assert_eq!(Err(want), compute_balances(&records));
        }
    }

    #[test]
    fn test_compute_balances_overflow() {
        use rust_decimal::Decimal;

        for (records, want_index) in vec![
            (
                vec![
                    ExpenseRecord::new("A", Decimal::MAX, "everything"),
                    ExpenseRecord::new("B", Decimal::MAX, "everything again"),
                ],
                1,
            ),
            (
                vec![
                    ExpenseRecord::new("A", Decimal::MAX, "everything"),
                    ExpenseRecord::new("A", dec!(1), "one more"),
                ],
                1,
            ),
        ] {
            match compute_balances(&records) {
                Err(SettlementError::InvalidRecord {
                    index,
                    problem: InputProblem::TooLarge(_),
                }) => assert_eq!(want_index, index),
                got => panic!("unexpected result: {:?}", got),
            }
        }
    }

    #[test]
    fn test_compute_balances_is_idempotent() {
        let records = vec![
            ExpenseRecord::new("A", dec!(10.10), "x"),
            ExpenseRecord::new("B", dec!(20.20), "y"),
            ExpenseRecord::new("C", dec!(0.07), "z"),
        ];

        let first = compute_balances(&records).unwrap();
        let second = compute_balances(&records).unwrap();
        assert_eq!(first, second);
        assert_eq!(nets(&first), nets(&second));
    }

    #[test]
    fn test_from_net_merges_duplicates() {
        let balances = Balances::from_net(vec![("A", dec!(5)), ("B", dec!(-10)), ("A", dec!(5))]);
        assert_eq!(
            vec![("A".to_string(), dec!(10)), ("B".to_string(), dec!(-10))],
            nets(&balances)
        );
    }
}
