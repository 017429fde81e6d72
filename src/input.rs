use crate::settlement::{Amount, ExpenseRecord};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error("malformed CSV: {0}")]
    Csv(String), // CSV is malformed

    #[error("invalid expense: {0}")]
    Format(String), // Data format is incorrect
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<<ExpenseRow as TryInto<ExpenseRecord>>::Error> for Error {
    fn from(err: <ExpenseRow as TryInto<ExpenseRecord>>::Error) -> Self {
        Self::Format(err.to_string())
    }
}

// When importing a CSV file, I'm making the assumption that we want to completely
// abort on errors: it makes sense to fix the file, then try again, rather than
// silently settling on half of the expenses.
pub fn parse(input_stream: impl std::io::Read) -> Result<Vec<ExpenseRecord>, Error> {
    let buffered = std::io::BufReader::new(input_stream);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(buffered);

    reader.deserialize::<ExpenseRow>().map(convert).collect()
}

// Convert from a csv deserialise result into an expense record result.
fn convert(row: Result<ExpenseRow, csv::Error>) -> Result<ExpenseRecord, Error> {
    Ok(row?.try_into()?)
}

// I have an ExpenseRow type because I can't directly deserialise into my "domain" type,
// i.e. ExpenseRecord: its fields are private and the CSV columns don't match the
// JSON document the store writes.
#[derive(Debug, Deserialize)]
pub struct ExpenseRow {
    payer: String,

    amount: Option<Amount>,

    #[serde(default)]
    memo: Option<String>,

    #[serde(default)]
    date: Option<NaiveDate>,
}

impl TryFrom<ExpenseRow> for ExpenseRecord {
    type Error = &'static str;
    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        if row.payer.is_empty() {
            return Err("missing payer");
        }
        let amount = match row.amount {
            Some(amount) => amount,
            None => return Err("missing amount"),
        };

        let record = ExpenseRecord::new(row.payer, amount, row.memo.unwrap_or_default());
        Ok(match row.date {
            Some(date) => record.with_date(date),
            None => record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, Error, ExpenseRow};
    use crate::settlement::ExpenseRecord;

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    // Parsing well-formed data should return every record, in order.
    fn test_parse_ok() {
        let data = r#"payer,amount,memo,date
Asha,120.50,groceries,2024-03-01
Ravi,40,milk,
Asha,0,nothing,2024-03-02"#;
        let reader = std::io::Cursor::new(data);
        let records = parse(reader).expect("parsing should succeed");

        assert_eq!(
            vec![
                ExpenseRecord::new("Asha", dec!(120.50), "groceries")
                    .with_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
                ExpenseRecord::new("Ravi", dec!(40), "milk"),
                ExpenseRecord::new("Asha", dec!(0), "nothing")
                    .with_date(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()),
            ],
            records
        );
    }

    #[test]
    fn test_parse_ok_with_whitespace() {
        let data = r#"payer,     amount,     memo,date
Asha, 1.0, soap ,
  Ravi , 2.5 , rice,   2024-01-31
        Kiran          ,3,,"#;
        let reader = std::io::Cursor::new(data);
        let records = parse(reader).expect("parsing should succeed");

        assert_eq!(3, records.len());
        assert_eq!("Ravi", records[1].payer());
        assert_eq!("rice", records[1].memo());
        assert_eq!("", records[2].memo());
    }

    #[test]
    // Parsing incorrectly formatted data should return an Err.
    fn test_parse_invalid_format() {
        for (data, err_contains) in vec![
            (
                r#"payer,amount,memo,date
Asha,1.0,soap"#,
                "found record with 3 fields, but the previous record has 4 fields",
            ),
            (
                r#"payer,amount,memo,date
Asha,1.0,soap,,,"#,
                "found record with 6 fields, but the previous record has 4 fields",
            ),
            (
                r#"payer,amount,memo,date
Asha,1.0,soap,yesterday"#,
                "CSV deserialize error",
            ),
        ] {
            let reader = std::io::Cursor::new(data);
            match parse(reader) {
                Err(Error::Csv(msg)) => assert!(msg.contains(err_contains), "{:?}", msg),
                got => panic!("unexpected result: {:?}", got),
            }
        }
    }

    #[test]
    // Rows without a payer or an amount should fail to convert into a record.
    fn test_parse_invalid_data() {
        for (data, want_err) in vec![
            (
                r#"payer,amount,memo,date
Asha,,soap,"#,
                Error::Format("missing amount".to_string()),
            ),
            (
                r#"payer,amount,memo,date
,12,soap,"#,
                Error::Format("missing payer".to_string()),
            ),
        ] {
            let reader = std::io::Cursor::new(data);
            assert_eq!(Err(want_err), parse(reader));
        }
    }

    #[test]
    fn test_row_into_record() {
        let row = ExpenseRow {
            payer: "Asha".to_string(),
            amount: Some(dec!(12.5)),
            memo: None,
            date: Some(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()),
        };

        let record: ExpenseRecord = row.try_into().unwrap();
        assert_eq!(dec!(12.5), record.amount());
        assert_eq!("", record.memo());
        assert_eq!(NaiveDate::from_ymd_opt(2024, 5, 6), record.occurred_on());
    }
}
