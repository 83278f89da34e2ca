//! # SalesDash Graphs
//!
//! Sales dataset ingest, statistics and chart rendering.
//!
//! Rows are fetched from a file or URL, parsed into [`Record`]s, reduced to
//! [`SummaryStats`] and a binned [`Histogram`], laid out as [`ChartScene`]s
//! through the scales in [`scale`], and drawn with plotters.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod binner;
pub mod chart;
pub mod counter;
pub mod data_fetcher;
pub mod manager;
pub mod parser;
pub mod record;
pub mod renderer;
pub mod scale;
pub mod theme;
pub mod tooltip;

// Chart layouts
pub mod histogram;
pub mod scatter;
pub mod timeseries;

pub use aggregator::SummaryStats;
pub use binner::{Bucket, Histogram, DEFAULT_BINS};
pub use chart::{ChartFrame, ChartInput, ChartLayout, ChartScene, Mark, MarkShape};
pub use counter::CounterAnimation;
pub use data_fetcher::{decode_csv, DataFetcher, DataSource};
pub use histogram::HistogramChart;
pub use manager::{DashboardModel, GraphManager, RenderOutput, StatsSnapshot, STATS_FILE};
pub use parser::{parse_rows, ParseOptions, ParsedDataset, RowError, ValidationReport};
pub use record::{Dataset, RawRow, Record, REQUIRED_COLUMNS};
pub use renderer::{GraphRenderer, PlottersRenderer};
pub use scale::{BandScale, LinearScale, OrdinalScale, TimeScale};
pub use scatter::ScatterChart;
pub use theme::Theme;
pub use timeseries::TimeSeriesChart;
pub use tooltip::Tooltip;
