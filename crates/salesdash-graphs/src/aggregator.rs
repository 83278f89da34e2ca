//! Summary statistics over the sales column.

use crate::record::Dataset;
use salesdash_common::{format_currency, format_number, StatTarget};
use serde::Serialize;
use tracing::debug;

/// Total, mean, max and count of sales for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Sum of all sales.
    pub total: f64,
    /// Number of records.
    pub count: usize,
    /// `total / count`, `NaN` for an empty dataset.
    pub mean: f64,
    /// Largest sale, `None` for an empty dataset.
    pub max: Option<f64>,
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self::from_values(std::iter::empty())
    }
}

impl SummaryStats {
    /// Aggregates a dataset's sales column.
    pub fn compute(dataset: &Dataset) -> Self {
        let stats = Self::from_values(dataset.sales());
        debug!(
            count = stats.count,
            total = stats.total,
            "Computed summary statistics"
        );
        stats
    }

    /// Aggregates raw values in a single pass.
    ///
    /// The total is a plain float sum, so a `NaN` value makes both `total`
    /// and `mean` `NaN`. `max` follows `f64::max` and skips `NaN`.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (total, count, max) = values.into_iter().fold(
            (0.0_f64, 0_usize, None::<f64>),
            |(total, count, max), v| {
                let max = match max {
                    Some(m) => Some(m.max(v)),
                    None => Some(v),
                };
                (total + v, count + 1, max)
            },
        );

        let mean = if count == 0 {
            f64::NAN
        } else {
            total / count as f64
        };

        Self {
            total,
            count,
            mean,
            max,
        }
    }

    /// Numeric value of a display target.
    pub fn value_of(&self, target: StatTarget) -> f64 {
        match target {
            StatTarget::TotalSales => self.total,
            StatTarget::TotalOrders => self.count as f64,
            StatTarget::AvgSales => self.mean,
            StatTarget::MaxSales => self.max.unwrap_or(0.0),
        }
    }

    /// Display text of a target, currency-prefixed where appropriate.
    pub fn display(&self, target: StatTarget) -> String {
        let value = self.value_of(target);
        if target.is_currency() {
            format_currency(value)
        } else {
            format_number(value)
        }
    }
}
