//! Typed parsing of raw rows into records.
//!
//! Each field parse returns a [`FieldError`] instead of coercing silently.
//! Rows are collected together with a [`ValidationReport`]; the configured
//! [`RowPolicy`] decides whether a row with field errors is dropped or kept
//! with `NaN` sales / no date.

use crate::record::{Dataset, RawRow, Record};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use salesdash_config::{DataConfig, RowPolicy};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a single field failed to parse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// Column absent or blank.
    #[error("missing value")]
    Missing,
    /// Not a decimal number.
    #[error("'{0}' is not a number")]
    NotANumber(String),
    /// `inf`, `NaN` and friends.
    #[error("'{0}' is not a finite amount")]
    NonFinite(String),
    /// Sales amounts are non-negative.
    #[error("negative amount '{0}'")]
    Negative(String),
    /// None of the configured date formats matched.
    #[error("'{0}' is not a recognised date")]
    BadDate(String),
}

/// Options controlling row parsing.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// `chrono` formats tried after RFC 3339.
    pub date_formats: Vec<String>,
    /// Handling of rows with field errors.
    pub row_policy: RowPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::from(&DataConfig::default())
    }
}

impl From<&DataConfig> for ParseOptions {
    fn from(config: &DataConfig) -> Self {
        Self {
            date_formats: config.date_formats.clone(),
            row_policy: config.row_policy,
        }
    }
}

/// Parses a sales amount such as `261.96`, `$1,204.50` or ` 14 `.
pub fn parse_sales(raw: &str) -> Result<f64, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Missing);
    }

    let cleaned: String = trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let value: f64 = cleaned
        .parse()
        .map_err(|_| FieldError::NotANumber(trimmed.to_string()))?;

    if !value.is_finite() {
        return Err(FieldError::NonFinite(trimmed.to_string()));
    }
    if value < 0.0 {
        return Err(FieldError::Negative(trimmed.to_string()));
    }
    Ok(value)
}

/// Parses an order date with RFC 3339 first, then each format in order.
///
/// Date-only formats resolve to midnight.
pub fn parse_order_date<S: AsRef<str>>(raw: &str, formats: &[S]) -> Result<NaiveDateTime, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Missing);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }

    for format in formats {
        let format = format.as_ref();
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
        if let Some(dt) = NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(dt);
        }
    }

    Err(FieldError::BadDate(trimmed.to_string()))
}

/// A field error located in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based source line.
    pub line: usize,
    /// Offending column.
    pub column: &'static str,
    /// What went wrong.
    pub error: FieldError,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.column, self.error)
    }
}

/// The record built from one row plus the field errors found on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    /// Record with `NaN` / `None` in place of unparseable fields.
    pub record: Record,
    /// Field errors, empty for a clean row.
    pub errors: Vec<RowError>,
}

impl RowOutcome {
    /// Whether every field parsed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parses one raw row.
pub fn parse_row(row: &RawRow, options: &ParseOptions) -> RowOutcome {
    let mut errors = Vec::new();
    let mut fail = |column: &'static str, error: FieldError| {
        errors.push(RowError {
            line: row.line,
            column,
            error,
        });
    };

    let sales = match parse_sales(row.get("sales").unwrap_or_default()) {
        Ok(value) => value,
        Err(error) => {
            fail("sales", error);
            f64::NAN
        }
    };

    let order_date = match parse_order_date(
        row.get("order_date").unwrap_or_default(),
        &options.date_formats,
    ) {
        Ok(date) => Some(date),
        Err(error) => {
            fail("order_date", error);
            None
        }
    };

    let text = |column: &str| row.get(column).map(str::trim).unwrap_or_default().to_string();

    RowOutcome {
        record: Record {
            sales,
            order_date,
            category: text("category"),
            product_name: text("product_name"),
            customer_name: text("customer_name"),
        },
        errors,
    }
}

/// Per-load summary of what the parser accepted and rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Data rows seen.
    pub rows_read: usize,
    /// Rows that made it into the dataset.
    pub rows_kept: usize,
    /// Rows with at least one field error.
    pub rows_flagged: usize,
    /// Every field error, in file order.
    pub errors: Vec<RowError>,
}

impl ValidationReport {
    /// Whether no row had a field error.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Rows dropped by the row policy.
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} kept, {} flagged, {} dropped",
            self.rows_read,
            self.rows_kept,
            self.rows_flagged,
            self.rows_dropped()
        )
    }
}

/// A dataset together with the report produced while parsing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDataset {
    /// Accepted records.
    pub dataset: Dataset,
    /// Parse report.
    pub report: ValidationReport,
}

/// Parses every row, applying the row policy.
pub fn parse_rows<I>(rows: I, options: &ParseOptions) -> ParsedDataset
where
    I: IntoIterator<Item = RawRow>,
{
    let mut report = ValidationReport::default();
    let mut records = Vec::new();

    for row in rows {
        report.rows_read += 1;
        let outcome = parse_row(&row, options);

        if !outcome.is_clean() {
            report.rows_flagged += 1;
            for error in &outcome.errors {
                debug!(%error, "Rejected field");
            }
            report.errors.extend(outcome.errors);
            if options.row_policy == RowPolicy::Skip {
                continue;
            }
        }

        records.push(outcome.record);
    }

    report.rows_kept = records.len();
    if !report.is_clean() {
        warn!(
            flagged = report.rows_flagged,
            policy = ?options.row_policy,
            first = %report.errors[0],
            "Malformed rows in dataset"
        );
    }

    ParsedDataset {
        dataset: Dataset::new(records),
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn row(line: usize, sales: &str, date: &str) -> RawRow {
        RawRow::from_pairs(
            line,
            [
                ("sales", sales),
                ("order_date", date),
                ("category", " Furniture "),
                ("product_name", "Bookcase"),
                ("customer_name", "Claire Gute"),
            ],
        )
    }

    #[test]
    fn test_parse_sales_accepts_common_shapes() {
        assert_eq!(parse_sales("261.96"), Ok(261.96));
        assert_eq!(parse_sales(" 14 "), Ok(14.0));
        assert_eq!(parse_sales("$1,204.50"), Ok(1204.5));
        assert_eq!(parse_sales("0"), Ok(0.0));
    }

    #[test]
    fn test_parse_sales_rejections() {
        assert_eq!(parse_sales(""), Err(FieldError::Missing));
        assert_eq!(parse_sales("abc"), Err(FieldError::NotANumber("abc".into())));
        assert_eq!(parse_sales("inf"), Err(FieldError::NonFinite("inf".into())));
        assert_eq!(parse_sales("NaN"), Err(FieldError::NonFinite("NaN".into())));
        assert_eq!(parse_sales("-3"), Err(FieldError::Negative("-3".into())));
    }

    #[test]
    fn test_parse_order_date_formats() {
        let formats = ParseOptions::default().date_formats;

        let iso = parse_order_date("2017-11-08", &formats).unwrap();
        assert_eq!((iso.year(), iso.month(), iso.day(), iso.hour()), (2017, 11, 8, 0));

        let us = parse_order_date("11/8/2017", &formats).unwrap();
        assert_eq!(us.date(), iso.date());

        let stamped = parse_order_date("2017-11-08 14:30:00", &formats).unwrap();
        assert_eq!(stamped.hour(), 14);

        let rfc = parse_order_date("2017-11-08T09:15:00+02:00", &formats).unwrap();
        assert_eq!(rfc.hour(), 9);
    }

    #[test]
    fn test_parse_order_date_rejections() {
        let formats = ParseOptions::default().date_formats;
        assert_eq!(parse_order_date("  ", &formats), Err(FieldError::Missing));
        assert_eq!(
            parse_order_date("yesterday", &formats),
            Err(FieldError::BadDate("yesterday".into()))
        );
        assert!(parse_order_date("2017-11-08", &[] as &[&str]).is_err());
    }

    #[test]
    fn test_parse_row_collects_all_errors() {
        let outcome = parse_row(&row(4, "abc", "soon"), &ParseOptions::default());
        assert!(!outcome.is_clean());
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].column, "sales");
        assert_eq!(outcome.errors[1].column, "order_date");
        assert_eq!(outcome.errors[0].line, 4);
        assert!(outcome.record.sales.is_nan());
        assert!(outcome.record.order_date.is_none());
        assert_eq!(outcome.record.category, "Furniture");
        assert_eq!(
            outcome.errors[0].to_string(),
            "line 4: sales: 'abc' is not a number"
        );
    }

    #[test]
    fn test_skip_policy_drops_flagged_rows() {
        let rows = vec![row(2, "10", "2017-01-01"), row(3, "x", "2017-01-02"), row(4, "30", "bad")];
        let parsed = parse_rows(rows, &ParseOptions::default());

        assert_eq!(parsed.dataset.len(), 1);
        assert_eq!(parsed.report.rows_read, 3);
        assert_eq!(parsed.report.rows_kept, 1);
        assert_eq!(parsed.report.rows_flagged, 2);
        assert_eq!(parsed.report.rows_dropped(), 2);
        assert_eq!(
            parsed.report.to_string(),
            "3 rows read, 1 kept, 2 flagged, 2 dropped"
        );
    }

    #[test]
    fn test_propagate_policy_keeps_flagged_rows() {
        let options = ParseOptions {
            row_policy: RowPolicy::Propagate,
            ..ParseOptions::default()
        };
        let rows = vec![row(2, "10", "2017-01-01"), row(3, "x", "2017-01-02")];
        let parsed = parse_rows(rows, &options);

        assert_eq!(parsed.dataset.len(), 2);
        assert!(parsed.dataset.records()[1].sales.is_nan());
        assert_eq!(parsed.report.rows_flagged, 1);
        assert_eq!(parsed.report.rows_dropped(), 0);
    }

    #[test]
    fn test_missing_columns_are_field_errors() {
        let outcome = parse_row(&RawRow::new(2), &ParseOptions::default());
        assert_eq!(outcome.errors[0].error, FieldError::Missing);
        assert_eq!(outcome.record.product_name, "");
    }
}
