//! Test utilities and shared test helpers for SalesDash.
//!
//! This module provides logging setup, fixtures, and helper functions that can
//! be used across all crates in the workspace for unit and integration testing.

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating an order timestamp.
pub fn mock_datetime(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, min, sec))
        .expect("invalid mock datetime")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Sample sales datasets in the dashboard's CSV shape.
pub mod sales_fixtures {
    /// Header row shared by every fixture.
    pub const HEADER: &str = "order_date,category,product_name,customer_name,sales";

    /// Six well-formed orders across three categories.
    pub fn small_csv() -> String {
        [
            HEADER,
            "2017-11-08,Furniture,Bush Somerset Collection Bookcase,Claire Gute,261.96",
            "2017-11-08,Furniture,Hon Deluxe Fabric Upholstered Stacking Chairs,Claire Gute,731.94",
            "2017-06-12,Office Supplies,Self-Adhesive Address Labels,Darrin Van Huff,14.62",
            "2016-10-11,Furniture,Bretford CR4500 Series Slim Rectangular Table,Sean O'Donnell,957.5775",
            "2016-10-11,Office Supplies,Eldon Fold 'N Roll Cart System,Sean O'Donnell,22.368",
            "2015-06-09,Technology,Mitel 5320 IP Phone VoIP phone,Brosina Hoffman,907.152",
        ]
        .join("\n")
    }

    /// Total of the `sales` column of [`small_csv`].
    pub const SMALL_TOTAL: f64 = 261.96 + 731.94 + 14.62 + 957.5775 + 22.368 + 907.152;

    /// Orders with a malformed amount on line 3 and a malformed date on line 4.
    pub fn malformed_csv() -> String {
        [
            HEADER,
            "2017-11-08,Furniture,Bookcase,Claire Gute,261.96",
            "2017-11-09,Furniture,Chair,Claire Gute,abc",
            "not-a-date,Technology,Phone,Brosina Hoffman,907.15",
            "2017-11-10,Technology,Phone,Brosina Hoffman,100",
        ]
        .join("\n")
    }

    /// Header only.
    pub fn empty_csv() -> String {
        format!("{HEADER}\n")
    }

    /// Generates `count` orders, one per day from 2017-01-01, cycling categories.
    pub fn generated_csv(count: usize) -> String {
        let categories = ["Furniture", "Office Supplies", "Technology"];
        let start = chrono::NaiveDate::from_ymd_opt(2017, 1, 1).expect("valid start date");
        let mut lines = vec![HEADER.to_string()];
        for i in 0..count {
            let date = start + chrono::Duration::days(i as i64);
            lines.push(format!(
                "{},{},Product {},Customer {},{:.2}",
                date.format("%Y-%m-%d"),
                categories[i % categories.len()],
                i,
                i % 7,
                (i as f64 * 13.7) % 1000.0
            ));
        }
        lines.join("\n")
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use proptest::prelude::*;

    /// Strategy for a single non-negative, finite sales amount.
    pub fn sales_amount_strategy() -> impl Strategy<Value = f64> {
        0.0f64..100_000.0
    }

    /// Strategy for a non-empty vector of sales amounts.
    pub fn sales_vec_strategy(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(sales_amount_strategy(), 1..max_len.max(2))
    }

    /// Strategy for category names drawn from a small alphabet.
    pub fn category_strategy() -> impl Strategy<Value = String> {
        r"[A-Z][a-z]{2,10}".prop_map(|s| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_init_logging_multiple_calls() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_mock_datetime() {
        let ts = mock_datetime(2024, 1, 1, 12, 0, 0);
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.month(), 1);
        assert_eq!(ts.hour(), 12);
    }

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0001, 0.001);
        assert_approx_eq(1.0, 0.9999, 0.001);
    }

    #[test]
    #[should_panic(expected = "not approximately equal")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq(1.0, 1.1, 0.05);
    }

    #[test]
    fn test_fixture_shapes() {
        assert_eq!(sales_fixtures::small_csv().lines().count(), 7);
        assert_eq!(sales_fixtures::empty_csv().lines().count(), 1);
        assert_eq!(sales_fixtures::generated_csv(10).lines().count(), 11);
    }
}
