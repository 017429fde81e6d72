use super::{error::SettlementError, Amount, Participant};

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// One expense: somebody paid some amount for something.
///
/// Records are owned by the store; the settlement code only ever reads them.
/// The serialized field names match the documents written by earlier versions
/// of the app (`name`, `amount`, `reason`), where the amount is a plain JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(rename = "name")]
    payer: Participant,

    #[serde(with = "rust_decimal::serde::float")]
    amount: Amount,

    #[serde(rename = "reason", default)]
    memo: String,

    #[serde(rename = "date", default, skip_serializing_if = "Option::is_none")]
    occurred_on: Option<NaiveDate>,
}

impl ExpenseRecord {
    pub fn new(payer: impl Into<Participant>, amount: Amount, memo: impl Into<String>) -> Self {
        Self {
            payer: payer.into(),
            amount,
            memo: memo.into(),
            occurred_on: None,
        }
    }

    /// Build a record from a float, as handed over by forms or JSON numbers.
    /// NaN and infinities have no decimal representation and are refused.
    pub fn try_from_f64(
        payer: impl Into<Participant>,
        amount: f64,
        memo: impl Into<String>,
    ) -> Result<Self, SettlementError> {
        let amount =
            Amount::from_f64(amount).ok_or_else(|| SettlementError::InvalidAmount(amount.to_string()))?;

        Ok(Self::new(payer, amount, memo))
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.occurred_on = Some(date);
        self
    }

    pub fn payer(&self) -> &str {
        &self.payer
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn occurred_on(&self) -> Option<NaiveDate> {
        self.occurred_on
    }
}

#[cfg(test)]
mod tests {
    use super::ExpenseRecord;
    use crate::settlement::SettlementError;

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_try_from_f64() {
        let record = ExpenseRecord::try_from_f64("A", 12.5, "lunch").expect("finite amount");
        assert_eq!(dec!(12.5), record.amount());
        assert_eq!("A", record.payer());
        assert_eq!("lunch", record.memo());
        assert_eq!(None, record.occurred_on());
    }

    #[test]
    fn test_try_from_f64_not_finite() {
        for value in vec![f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let got = ExpenseRecord::try_from_f64("A", value, "lunch");
            assert!(
                matches!(got, Err(SettlementError::InvalidAmount(_))),
                "{:?}",
                got
            );
        }
    }

    #[test]
    fn test_json_document_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let record = ExpenseRecord::new("Ravi", dec!(120.5), "milk").with_date(date);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            r#"{"name":"Ravi","amount":120.5,"reason":"milk","date":"2024-03-09"}"#,
            json
        );

        let back: ExpenseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_json_without_date() {
        let record: ExpenseRecord =
            serde_json::from_str(r#"{"name": "Asha", "amount": 40, "reason": "bread"}"#).unwrap();
        assert_eq!(ExpenseRecord::new("Asha", dec!(40), "bread"), record);
    }
}
