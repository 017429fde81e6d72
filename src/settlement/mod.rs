//! Turns a snapshot of expense records into the payments that settle the group.
//!
//! records -> `balance::compute_balances` -> `Balances` -> `plan::plan` -> transfers
//!
//! Everything in here is a pure function of its input: no I/O, no logging and
//! no state kept between calls.

pub mod balance;
pub mod error;
pub mod plan;
pub mod record;

pub use balance::{compute_balances, Balance, Balances};
pub use error::SettlementError;
pub use plan::{plan, Transfer};
pub use record::ExpenseRecord;

use rust_decimal::RoundingStrategy;

// Using named types doesn't provide any compiler help, but it helps a lot with
// readability: `HashMap<Participant, Amount>` reads better than `HashMap<String, Decimal>`.
pub type Participant = String;

// Money is never stored as a float, so splitting 100 three ways doesn't drift.
pub type Amount = rust_decimal::Decimal;

/// Number of minor currency units kept on balances and transfers (cents, paise...).
pub const CURRENCY_PRECISION: u32 = 2;

/// Round an amount to the currency's minor unit, half away from zero.
pub fn round_currency(amount: Amount) -> Amount {
    amount.round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounded to the minor unit and written with exactly that many decimals:
/// "50.00", not "50", and "11.00", not "10.99", for 10.999.
/// Formatting a `Decimal` with `{:.2}` truncates, so amounts shown to users go through this.
pub fn in_minor_units(amount: Amount) -> Amount {
    let mut amount = round_currency(amount);
    amount.rescale(CURRENCY_PRECISION);
    amount
}

/// Smallest representable currency unit, i.e. 0.01.
pub fn minor_unit() -> Amount {
    Amount::new(1, CURRENCY_PRECISION)
}

/// Balances plus the transfers that zero them.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub balances: Balances,
    pub transfers: Vec<Transfer>,
}

/// Compute the balances of `records`, then plan the transfers that settle them.
pub fn settle(records: &[ExpenseRecord]) -> Result<Settlement, SettlementError> {
    let balances = compute_balances(records)?;
    let transfers = plan(&balances)?;

    Ok(Settlement {
        balances,
        transfers,
    })
}
