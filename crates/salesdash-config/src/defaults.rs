//! Default configuration values.

use crate::schema::*;
use salesdash_common::LoggingConfig;

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            layout: LayoutConfig::default(),
            histogram: HistogramConfig::default(),
            scatter: ScatterConfig::default(),
            timeseries: TimeSeriesConfig::default(),
            palette: PaletteConfig::default(),
            animation: AnimationConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: "cleanedSuperstoreSalesDataset.csv".to_string(),
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%m/%d/%Y".to_string(),
                "%d-%m-%Y".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y/%m/%d".to_string(),
            ],
            row_policy: RowPolicy::Skip,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 30,
            right: 30,
            bottom: 50,
            left: 60,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 960,
            margins: MarginConfig::default(),
            histogram_height: 350,
            scatter_height: 350,
            timeseries_height: 400,
        }
    }
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self { bins: 30, x_ticks: 8 }
    }
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            band_padding: 0.3,
            jitter: 0.8,
            jitter_seed: None,
            point_radius: 4,
            opacity: 0.6,
            x_ticks: 8,
        }
    }
}

impl Default for TimeSeriesConfig {
    fn default() -> Self {
        Self {
            point_radius: 3,
            opacity: 0.5,
            x_ticks: 10,
            y_ticks: 8,
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            primary: "#667eea".to_string(),
            highlight: "#4facfe".to_string(),
            series: "#43e97b".to_string(),
            categories: vec![
                "#667eea".to_string(),
                "#f093fb".to_string(),
                "#4facfe".to_string(),
            ],
            background: "#ffffff".to_string(),
            text: "#4a5568".to_string(),
            grid: "#e2e8f0".to_string(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 1500,
            frame_ms: 16,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "dashboard".to_string(),
            format: OutputFormat::Png,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesdash_common::ChartKind;

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.margins, MarginConfig { top: 30, right: 30, bottom: 50, left: 60 });
        assert_eq!(layout.height_of(ChartKind::Histogram), 350);
        assert_eq!(layout.height_of(ChartKind::Scatter), 350);
        assert_eq!(layout.height_of(ChartKind::TimeSeries), 400);
    }

    #[test]
    fn test_chart_defaults() {
        let config = Config::default();
        assert_eq!(config.histogram.bins, 30);
        assert_eq!(config.scatter.band_padding, 0.3);
        assert_eq!(config.palette.categories.len(), 3);
        assert_eq!(config.data.row_policy, RowPolicy::Skip);
        assert_eq!(config.output.format.extension(), "png");
    }
}
