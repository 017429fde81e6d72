use super::Amount;
use thiserror::Error;

/// Why a single record was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputProblem {
    #[error("amount {0} is negative")]
    NegativeAmount(Amount),

    #[error("payer is empty")]
    EmptyPayer,

    /// Adding this amount to what was already spent would overflow.
    #[error("amount {0} is too large to add up")]
    TooLarge(Amount),
}

/// Note: an empty list of records is not an error, it simply settles to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// A record can't take part in the split. It is never dropped or coerced.
    #[error("invalid expense record #{index}: {problem}")]
    InvalidRecord { index: usize, problem: InputProblem },

    /// The amount isn't a finite number (NaN, infinity...).
    #[error("invalid amount: {0} is not a finite number")]
    InvalidAmount(String),

    /// What debtors owe and what creditors are due don't match.
    /// The balances were inconsistent to begin with: this is a bug, not a user error.
    #[error(
        "balances don't sum to zero: debtors owe {debts}, creditors are due {credits} (tolerance {tolerance})"
    )]
    InvariantViolation {
        debts: Amount,
        credits: Amount,
        tolerance: Amount,
    },
}
