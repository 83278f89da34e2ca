//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use regex::Regex;
use salesdash_common::{DashError, Result};
use std::sync::LazyLock;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #667eea)
pub static HEX_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern"));

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if config.data.source.trim().is_empty() {
            return Err(DashError::validation_field(
                "data source cannot be empty",
                "data.source",
            ));
        }

        let layout = &config.layout;
        let margins = layout.margins;
        if layout.width <= margins.left.saturating_add(margins.right) {
            return Err(DashError::validation_field(
                format!(
                    "width {} leaves no room between margins {} and {}",
                    layout.width, margins.left, margins.right
                ),
                "layout.width",
            ));
        }
        for (field, height) in [
            ("layout.histogram_height", layout.histogram_height),
            ("layout.scatter_height", layout.scatter_height),
            ("layout.timeseries_height", layout.timeseries_height),
        ] {
            if height <= margins.top.saturating_add(margins.bottom) {
                return Err(DashError::validation_field(
                    format!("height {height} leaves no room between vertical margins"),
                    field,
                ));
            }
        }

        if config.histogram.bins == 0 {
            return Err(DashError::validation_field(
                "histogram needs at least one bin",
                "histogram.bins",
            ));
        }

        let padding = config.scatter.band_padding;
        if !(0.0..1.0).contains(&padding) {
            return Err(DashError::validation_field(
                format!("band padding {padding} must be in [0, 1)"),
                "scatter.band_padding",
            ));
        }
        if !(0.0..=1.0).contains(&config.scatter.jitter) {
            return Err(DashError::validation_field(
                "jitter must be in [0, 1]",
                "scatter.jitter",
            ));
        }
        for (field, opacity) in [
            ("scatter.opacity", config.scatter.opacity),
            ("timeseries.opacity", config.timeseries.opacity),
        ] {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(DashError::validation_field("opacity must be in [0, 1]", field));
            }
        }

        if config.animation.frame_ms == 0 {
            return Err(DashError::validation_field(
                "frame interval must be positive",
                "animation.frame_ms",
            ));
        }

        Self::validate_palette(config)
    }

    fn validate_palette(config: &Config) -> Result<()> {
        let palette = &config.palette;
        if palette.categories.is_empty() {
            return Err(DashError::validation_field(
                "category palette cannot be empty",
                "palette.categories",
            ));
        }

        let named = [
            ("palette.primary", &palette.primary),
            ("palette.highlight", &palette.highlight),
            ("palette.series", &palette.series),
            ("palette.background", &palette.background),
            ("palette.text", &palette.text),
            ("palette.grid", &palette.grid),
        ];
        let categories = palette
            .categories
            .iter()
            .map(|color| ("palette.categories", color));

        for (field, color) in named.into_iter().chain(categories) {
            if !HEX_COLOR_REGEX.is_match(color) {
                return Err(DashError::validation_field(
                    format!("'{color}' is not a #rrggbb color"),
                    field,
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: DashError) -> Option<String> {
        match err {
            DashError::Validation { field, .. } => field,
            _ => None,
        }
    }

    #[test]
    fn test_hex_color_regex() {
        assert!(HEX_COLOR_REGEX.is_match("#FFFFFF"));
        assert!(HEX_COLOR_REGEX.is_match("#667eea"));
        assert!(!HEX_COLOR_REGEX.is_match("667eea"));
        assert!(!HEX_COLOR_REGEX.is_match("#fff"));
        assert!(!HEX_COLOR_REGEX.is_match("#ZZ0000"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_zero_bins() {
        let mut config = Config::default();
        config.histogram.bins = 0;
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(err).as_deref(), Some("histogram.bins"));
    }

    #[test]
    fn test_rejects_overflowing_margins() {
        let mut config = Config::default();
        config.layout.margins.left = u32::MAX;
        config.layout.margins.right = u32::MAX;
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(err).as_deref(), Some("layout.width"));
    }

    #[test]
    fn test_rejects_narrow_width() {
        let mut config = Config::default();
        config.layout.width = 80;
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(err).as_deref(), Some("layout.width"));
    }

    #[test]
    fn test_rejects_full_padding() {
        let mut config = Config::default();
        config.scatter.band_padding = 1.0;
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(err).as_deref(), Some("scatter.band_padding"));
    }

    #[test]
    fn test_rejects_bad_category_color() {
        let mut config = Config::default();
        config.palette.categories.push("teal".to_string());
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(err).as_deref(), Some("palette.categories"));
    }
}
