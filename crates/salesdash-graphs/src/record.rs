//! Raw and typed sales rows.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "sales",
    "order_date",
    "category",
    "product_name",
    "customer_name",
];

/// One untyped CSV row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 1-based line in the source file (the header is line 1).
    pub line: usize,
    fields: HashMap<String, String>,
}

impl RawRow {
    /// Creates an empty row for the given source line.
    pub fn new(line: usize) -> Self {
        Self {
            line,
            fields: HashMap::new(),
        }
    }

    /// Builds a row from `(column, value)` pairs.
    pub fn from_pairs<'a>(line: usize, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { line, fields }
    }

    /// Sets a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Value of a column, if present.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// One sales transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Order amount. `NaN` only when malformed rows are propagated.
    pub sales: f64,
    /// Order timestamp. `None` is the invalid-date sentinel.
    pub order_date: Option<NaiveDateTime>,
    /// Product category.
    pub category: String,
    /// Product name.
    pub product_name: String,
    /// Customer name.
    pub customer_name: String,
}

/// Ordered, immutable sequence of records loaded by one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wraps parsed records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// All records in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Record at `index`.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sales amounts in file order.
    pub fn sales(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.sales)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.category.as_str()))
            .map(|r| r.category.clone())
            .collect()
    }

    /// Earliest and latest order date, ignoring undated records.
    pub fn date_extent(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut dates = self.records.iter().filter_map(|r| r.order_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(sales: f64, category: &str, day: Option<u32>) -> Record {
        Record {
            sales,
            order_date: day.map(|d| {
                NaiveDate::from_ymd_opt(2017, 3, d)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            }),
            category: category.to_string(),
            product_name: "Stapler".to_string(),
            customer_name: "Claire Gute".to_string(),
        }
    }

    #[test]
    fn test_raw_row_lookup() {
        let mut row = RawRow::from_pairs(2, [("sales", "12.5"), ("category", "Furniture")]);
        row.insert("order_date", "2017-01-01");
        assert_eq!(row.get("sales"), Some("12.5"));
        assert_eq!(row.get("order_date"), Some("2017-01-01"));
        assert_eq!(row.get("customer_name"), None);
        assert_eq!(row.line, 2);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let dataset: Dataset = [
            record(1.0, "Technology", Some(1)),
            record(2.0, "Furniture", Some(2)),
            record(3.0, "Technology", Some(3)),
            record(4.0, "Office Supplies", Some(4)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            dataset.categories(),
            vec!["Technology", "Furniture", "Office Supplies"]
        );
    }

    #[test]
    fn test_date_extent_skips_undated() {
        let dataset = Dataset::new(vec![
            record(1.0, "A", Some(9)),
            record(2.0, "A", None),
            record(3.0, "A", Some(2)),
        ]);
        let (lo, hi) = dataset.date_extent().unwrap();
        assert_eq!(lo.date(), NaiveDate::from_ymd_opt(2017, 3, 2).unwrap());
        assert_eq!(hi.date(), NaiveDate::from_ymd_opt(2017, 3, 9).unwrap());

        assert!(Dataset::default().date_extent().is_none());
        assert!(Dataset::new(vec![record(1.0, "A", None)]).date_extent().is_none());
    }
}
