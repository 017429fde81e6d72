use crate::settlement::ExpenseRecord;

use chrono::NaiveDate;

/// Narrows down the list of expenses shown to the user.
///
/// Every criterion is optional, and a record has to satisfy all the set ones.
/// A record without a date never matches a date bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub payer: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub memo_contains: Option<String>,
}

impl RecordFilter {
    pub fn matches(&self, record: &ExpenseRecord) -> bool {
        if let Some(payer) = &self.payer {
            if !record.payer().eq_ignore_ascii_case(payer) {
                return false;
            }
        }

        if self.from.is_some() || self.to.is_some() {
            let date = match record.occurred_on() {
                Some(date) => date,
                None => return false,
            };
            if self.from.map_or(false, |from| date < from) {
                return false;
            }
            if self.to.map_or(false, |to| date > to) {
                return false;
            }
        }

        if let Some(needle) = &self.memo_contains {
            let needle = needle.to_lowercase();
            if !record.memo().to_lowercase().contains(&needle) {
                return false;
            }
        }

        true
    }

    /// Matching records, along with their position in `records` so they can
    /// still be deleted by index.
    pub fn apply<'a>(&self, records: &'a [ExpenseRecord]) -> Vec<(usize, &'a ExpenseRecord)> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::RecordFilter;
    use crate::settlement::ExpenseRecord;

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn records() -> Vec<ExpenseRecord> {
        vec![
            ExpenseRecord::new("Asha", dec!(10), "Milk").with_date(date(1)),
            ExpenseRecord::new("Ravi", dec!(20), "rice").with_date(date(5)),
            ExpenseRecord::new("Asha", dec!(30), "milk and eggs").with_date(date(10)),
            ExpenseRecord::new("Kiran", dec!(40), "gas"),
        ]
    }

    fn indices(filter: &RecordFilter) -> Vec<usize> {
        filter
            .apply(&records())
            .into_iter()
            .map(|(index, _)| index)
            .collect()
    }

    #[test]
    fn test_no_criteria_matches_everything() {
        assert_eq!(vec![0, 1, 2, 3], indices(&RecordFilter::default()));
    }

    #[test]
    fn test_filter_criteria() {
        for (filter, want) in vec![
            (
                RecordFilter {
                    payer: Some("asha".to_string()),
                    ..Default::default()
                },
                vec![0, 2],
            ),
            (
                RecordFilter {
                    from: Some(date(5)),
                    ..Default::default()
                },
                vec![1, 2],
            ),
            (
                RecordFilter {
                    from: Some(date(2)),
                    to: Some(date(9)),
                    ..Default::default()
                },
                vec![1],
            ),
            (
                RecordFilter {
                    memo_contains: Some("MILK".to_string()),
                    ..Default::default()
                },
                vec![0, 2],
            ),
            (
                RecordFilter {
                    payer: Some("Asha".to_string()),
                    to: Some(date(5)),
                    ..Default::default()
                },
                vec![0],
            ),
            (
                RecordFilter {
                    payer: Some("nobody".to_string()),
                    ..Default::default()
                },
                vec![],
            ),
        ] {
            assert_eq!(want, indices(&filter), "{:?}", filter);
        }
    }
}
