//! Configuration schema definitions using serde.
//!
//! Every section is `#[serde(default)]`, so a config file only needs to name
//! the values it changes.

use salesdash_common::{ChartKind, LoggingConfig};
use serde::{Deserialize, Serialize};

/// Main configuration structure for SalesDash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset source and parsing options.
    pub data: DataConfig,
    /// Shared chart geometry.
    pub layout: LayoutConfig,
    /// Histogram options.
    pub histogram: HistogramConfig,
    /// Scatter plot options.
    pub scatter: ScatterConfig,
    /// Time series options.
    pub timeseries: TimeSeriesConfig,
    /// Colors used by every chart.
    pub palette: PaletteConfig,
    /// Stat counter animation.
    pub animation: AnimationConfig,
    /// Render target location and format.
    pub output: OutputConfig,
    /// Logging setup.
    pub logging: LoggingConfig,
}

/// What to do with rows whose `sales` or `order_date` fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Report and drop the row.
    Skip,
    /// Report and keep the row with `NaN` sales and/or no date.
    Propagate,
}

/// Dataset configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Local CSV path or `http(s)` URL.
    pub source: String,
    /// `chrono` formats tried, in order, after RFC 3339.
    pub date_formats: Vec<String>,
    /// Handling of malformed rows.
    pub row_policy: RowPolicy,
    /// Timeout for remote sources.
    pub request_timeout_seconds: u64,
}

/// Chart margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginConfig {
    /// Top margin.
    pub top: u32,
    /// Right margin.
    pub right: u32,
    /// Bottom margin (x axis and its title).
    pub bottom: u32,
    /// Left margin (y axis and its title).
    pub left: u32,
}

/// Shared chart geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Container width used until a resize reports another one.
    pub width: u32,
    /// Margins around the plotting area.
    pub margins: MarginConfig,
    /// Histogram height.
    pub histogram_height: u32,
    /// Scatter plot height.
    pub scatter_height: u32,
    /// Time series height.
    pub timeseries_height: u32,
}

impl LayoutConfig {
    /// Outer height of the given chart.
    pub fn height_of(&self, chart: ChartKind) -> u32 {
        match chart {
            ChartKind::Histogram => self.histogram_height,
            ChartKind::Scatter => self.scatter_height,
            ChartKind::TimeSeries => self.timeseries_height,
        }
    }
}

/// Histogram options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Number of equal-width buckets.
    pub bins: usize,
    /// Approximate x axis tick count.
    pub x_ticks: usize,
}

/// Scatter plot options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    /// Band padding fraction, used for inner and outer padding.
    pub band_padding: f64,
    /// Vertical jitter as a fraction of the bandwidth.
    pub jitter: f64,
    /// Seed for the jitter; `None` draws a fresh seed each pass.
    pub jitter_seed: Option<u64>,
    /// Point radius.
    pub point_radius: u32,
    /// Point opacity.
    pub opacity: f64,
    /// Approximate x axis tick count.
    pub x_ticks: usize,
}

/// Time series options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeriesConfig {
    /// Point radius.
    pub point_radius: u32,
    /// Point opacity.
    pub opacity: f64,
    /// Approximate x axis tick count.
    pub x_ticks: usize,
    /// Approximate y axis tick count.
    pub y_ticks: usize,
}

/// Dashboard colors as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Histogram bars.
    pub primary: String,
    /// Highlighted histogram bar.
    pub highlight: String,
    /// Time series points.
    pub series: String,
    /// Category colors for the scatter plot, cycled in category order.
    pub categories: Vec<String>,
    /// Chart background.
    pub background: String,
    /// Axis titles and labels.
    pub text: String,
    /// Grid lines.
    pub grid: String,
}

/// Counter animation for the stat cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Whether counters are animated in the terminal.
    pub enabled: bool,
    /// Animation length.
    pub duration_ms: u64,
    /// Frame interval.
    pub frame_ms: u64,
}

/// Image format of the chart render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Raster output.
    Png,
    /// Vector output.
    Svg,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Render target location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving chart images and `stats.json`.
    pub directory: String,
    /// Chart image format.
    pub format: OutputFormat,
}
