//! Common type definitions shared by the config, graphs and binary crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three drawable chart surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Sales amount distribution
    Histogram,
    /// Sales amount by category
    Scatter,
    /// Sales amount over order date
    TimeSeries,
}

impl ChartKind {
    /// All charts in dashboard order.
    pub const ALL: [ChartKind; 3] = [Self::Histogram, Self::Scatter, Self::TimeSeries];

    /// Render target handle, also used as the output file stem.
    pub fn target(self) -> &'static str {
        match self {
            Self::Histogram => "histogram",
            Self::Scatter => "scatter",
            Self::TimeSeries => "timeseries",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}

/// One of the four numeric display targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatTarget {
    /// Sum of all sales
    #[serde(rename = "total-sales")]
    TotalSales,
    /// Number of orders
    #[serde(rename = "total-orders")]
    TotalOrders,
    /// Mean order value
    #[serde(rename = "avg-sales")]
    AvgSales,
    /// Largest single order
    #[serde(rename = "max-sales")]
    MaxSales,
}

impl StatTarget {
    /// All stat targets in card order.
    pub const ALL: [StatTarget; 4] = [
        Self::TotalSales,
        Self::TotalOrders,
        Self::AvgSales,
        Self::MaxSales,
    ];

    /// Element handle of the display target.
    pub fn id(self) -> &'static str {
        match self {
            Self::TotalSales => "total-sales",
            Self::TotalOrders => "total-orders",
            Self::AvgSales => "avg-sales",
            Self::MaxSales => "max-sales",
        }
    }

    /// Human readable card label.
    pub fn label(self) -> &'static str {
        match self {
            Self::TotalSales => "Total Sales",
            Self::TotalOrders => "Total Orders",
            Self::AvgSales => "Average Sale",
            Self::MaxSales => "Max Sale",
        }
    }

    /// Whether the value is shown with a `$` prefix.
    pub fn is_currency(self) -> bool {
        !matches!(self, Self::TotalOrders)
    }
}

impl fmt::Display for StatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Available drawing width for the charts, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Container width shared by all three charts
    pub width: u32,
}

impl Viewport {
    /// Creates a viewport of the given width.
    pub fn new(width: u32) -> Self {
        Self { width }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.width)
    }
}
