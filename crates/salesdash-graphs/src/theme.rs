//! Resolved chart colors.

use plotters::style::RGBColor;
use salesdash_common::{DashError, Result};
use salesdash_config::PaletteConfig;

/// Parses a `#rrggbb` color string.
pub fn parse_color(color: &str) -> Result<RGBColor> {
    let invalid = || DashError::validation(format!("Invalid hex color '{color}'"));

    let hex = color.trim().strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Palette handed to layouts and the renderer for one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Histogram bars.
    pub primary: RGBColor,
    /// Hovered marks.
    pub highlight: RGBColor,
    /// Time series points.
    pub series: RGBColor,
    /// Ordinal palette for categories.
    pub categories: Vec<RGBColor>,
    /// Canvas fill.
    pub background: RGBColor,
    /// Labels and titles.
    pub text: RGBColor,
    /// Grid lines.
    pub grid: RGBColor,
}

impl Theme {
    /// Resolves every configured color.
    pub fn from_palette(palette: &PaletteConfig) -> Result<Self> {
        let categories = palette
            .categories
            .iter()
            .map(|c| parse_color(c))
            .collect::<Result<Vec<_>>>()?;

        if categories.is_empty() {
            return Err(DashError::validation_field(
                "Category palette cannot be empty",
                "palette.categories",
            ));
        }

        Ok(Self {
            primary: parse_color(&palette.primary)?,
            highlight: parse_color(&palette.highlight)?,
            series: parse_color(&palette.series)?,
            categories,
            background: parse_color(&palette.background)?,
            text: parse_color(&palette.text)?,
            grid: parse_color(&palette.grid)?,
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: RGBColor(0x66, 0x7e, 0xea),
            highlight: RGBColor(0x4f, 0xac, 0xfe),
            series: RGBColor(0x43, 0xe9, 0x7b),
            categories: vec![
                RGBColor(0x66, 0x7e, 0xea),
                RGBColor(0xf0, 0x93, 0xfb),
                RGBColor(0x4f, 0xac, 0xfe),
            ],
            background: RGBColor(0xff, 0xff, 0xff),
            text: RGBColor(0x4a, 0x55, 0x68),
            grid: RGBColor(0xe2, 0xe8, 0xf0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#667eea").unwrap(), RGBColor(102, 126, 234));
        assert_eq!(parse_color(" #FFFFFF ").unwrap(), RGBColor(255, 255, 255));
        assert!(parse_color("667eea").is_err());
        assert!(parse_color("#66").is_err());
        assert!(parse_color("#gggggg").is_err());
        assert!(parse_color("#ééé").is_err());
    }

    #[test]
    fn test_default_palette_matches_default_theme() {
        let theme = Theme::from_palette(&PaletteConfig::default()).unwrap();
        assert_eq!(theme, Theme::default());
    }

    #[test]
    fn test_bad_palette_entry_fails() {
        let mut palette = PaletteConfig::default();
        palette.categories.push("blue".to_string());
        assert!(Theme::from_palette(&palette).is_err());

        palette.categories.clear();
        assert!(Theme::from_palette(&PaletteConfig {
            categories: Vec::new(),
            ..PaletteConfig::default()
        })
        .is_err());
    }
}
