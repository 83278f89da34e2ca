//! Hover tooltip content.

use crate::binner::Bucket;
use crate::chart::ChartInput;
use crate::record::Record;
use salesdash_common::{format_currency, format_date, ChartKind};
use serde::Serialize;
use std::fmt;

/// Labelled lines shown next to a hovered mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    /// `(label, value)` pairs in display order.
    pub lines: Vec<(String, String)>,
}

impl Tooltip {
    fn new<const N: usize>(lines: [(&str, String); N]) -> Self {
        Self {
            lines: lines
                .into_iter()
                .map(|(label, value)| (label.to_string(), value))
                .collect(),
        }
    }

    /// Tooltip for a histogram bucket.
    pub fn for_bucket(bucket: &Bucket) -> Self {
        Self::new([
            (
                "Range",
                format!("{} - {}", format_currency(bucket.x0), format_currency(bucket.x1)),
            ),
            ("Count", format!("{} orders", bucket.count)),
        ])
    }

    /// Tooltip for a scatter point.
    pub fn for_scatter(record: &Record) -> Self {
        Self::new([
            ("Category", record.category.clone()),
            ("Sales", format_currency(record.sales)),
            ("Product", record.product_name.clone()),
        ])
    }

    /// Tooltip for a time series point.
    pub fn for_timeseries(record: &Record) -> Self {
        Self::new([
            (
                "Date",
                record
                    .order_date
                    .map(format_date)
                    .unwrap_or_else(|| "Invalid Date".to_string()),
            ),
            ("Sales", format_currency(record.sales)),
            ("Customer", record.customer_name.clone()),
        ])
    }

    /// Tooltip for the datum behind a mark of `kind`.
    pub fn for_datum(kind: ChartKind, datum: usize, input: &ChartInput<'_>) -> Option<Self> {
        match kind {
            ChartKind::Histogram => input.histogram.buckets.get(datum).map(Self::for_bucket),
            ChartKind::Scatter => input.dataset.get(datum).map(Self::for_scatter),
            ChartKind::TimeSeries => input.dataset.get(datum).map(Self::for_timeseries),
        }
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (label, value)) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}
