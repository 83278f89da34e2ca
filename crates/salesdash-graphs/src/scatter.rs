//! Sales by category scatter plot with jittered bands.

use crate::chart::{
    Axis, AxisSide, ChartFrame, ChartInput, ChartLayout, ChartScene, LegendEntry, Mark, MarkShape,
    Tick,
};
use crate::scale::{BandScale, LinearScale, OrdinalScale};
use crate::theme::Theme;
use salesdash_common::{format_currency, truncate_string, ChartKind};
use salesdash_config::ScatterConfig;
use tracing::debug;

/// Legend offset from the right edge of the plotting area.
const LEGEND_INSET: f64 = 100.0;
/// Vertical distance between legend rows.
const LEGEND_ROW: f64 = 20.0;
/// Longest legend label that fits inside the inset.
const LEGEND_LABEL_CHARS: usize = 16;

/// Lays out one point per record, banded by category.
#[derive(Debug, Clone)]
pub struct ScatterChart {
    config: ScatterConfig,
}

impl ScatterChart {
    /// Creates the layout.
    pub fn new(config: ScatterConfig) -> Self {
        Self { config }
    }

    fn rng(&self) -> fastrand::Rng {
        match self.config.jitter_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

impl ChartLayout for ScatterChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Scatter
    }

    fn layout(&self, input: &ChartInput<'_>, frame: ChartFrame, theme: &Theme) -> ChartScene {
        let (inner_width, inner_height) = (frame.inner_width(), frame.inner_height());
        let dataset = input.dataset;
        let categories = dataset.categories();

        let max = input.stats.max.unwrap_or(0.0);
        let x = LinearScale::new((0.0, max), (0.0, inner_width));
        let y = BandScale::new(categories.iter().cloned(), (inner_height, 0.0))
            .with_padding(self.config.band_padding);
        let color = OrdinalScale::new(categories.iter().cloned(), theme.categories.clone());
        let bandwidth = y.bandwidth();

        let x_axis = Axis::new(
            AxisSide::Bottom,
            "Sales Amount ($)",
            x.ticks(self.config.x_ticks)
                .into_iter()
                .map(|v| Tick {
                    position: x.map(v),
                    label: format_currency(v),
                })
                .collect(),
        );

        let band_centers: Vec<(f64, &String)> = categories
            .iter()
            .filter_map(|c| y.band(c).map(|start| (start + bandwidth / 2.0, c)))
            .collect();
        let y_axis = Axis::new(
            AxisSide::Left,
            "Category",
            band_centers
                .iter()
                .map(|(position, c)| Tick {
                    position: *position,
                    label: (*c).clone(),
                })
                .collect(),
        );

        let mut scene = ChartScene::new(frame, theme.clone(), x_axis, y_axis);
        scene.grid = band_centers.iter().map(|(p, _)| *p).collect();

        let mut rng = self.rng();
        scene.marks = dataset
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| record.sales.is_finite())
            .filter_map(|(i, record)| {
                let band = y.band(&record.category)?;
                let jitter = (rng.f64() - 0.5) * bandwidth * self.config.jitter;
                Some(Mark {
                    shape: MarkShape::Point {
                        cx: x.map(record.sales),
                        cy: band + bandwidth / 2.0 + jitter,
                        radius: f64::from(self.config.point_radius),
                    },
                    color: color
                        .map(record.category.as_str())
                        .copied()
                        .unwrap_or(theme.primary),
                    opacity: self.config.opacity,
                    datum: i,
                })
            })
            .collect();

        scene.legend = categories
            .iter()
            .enumerate()
            .map(|(i, c)| LegendEntry {
                label: truncate_string(c, LEGEND_LABEL_CHARS),
                color: color.map(c.as_str()).copied().unwrap_or(theme.primary),
                x: inner_width - LEGEND_INSET,
                y: i as f64 * LEGEND_ROW,
            })
            .collect();

        debug!(
            points = scene.marks.len(),
            categories = categories.len(),
            "Scatter laid out"
        );
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::SummaryStats;
    use crate::binner::Histogram;
    use crate::record::{Dataset, Record};
    use salesdash_config::LayoutConfig;

    fn dataset() -> Dataset {
        [
            (100.0, "Furniture"),
            (50.0, "Technology"),
            (200.0, "Furniture"),
            (10.0, "Office Supplies"),
        ]
        .into_iter()
        .map(|(sales, category)| Record {
            sales,
            order_date: None,
            category: category.to_string(),
            product_name: "Item".to_string(),
            customer_name: "Someone".to_string(),
        })
        .collect()
    }

    fn scene(seed: u64) -> ChartScene {
        let dataset = dataset();
        let stats = SummaryStats::compute(&dataset);
        let histogram = Histogram::default();
        let input = ChartInput {
            dataset: &dataset,
            stats: &stats,
            histogram: &histogram,
        };
        let config = ScatterConfig {
            jitter_seed: Some(seed),
            ..ScatterConfig::default()
        };
        let frame = ChartFrame::new(ChartKind::Scatter, &LayoutConfig::default());
        ScatterChart::new(config).layout(&input, frame, &Theme::default())
    }

    #[test]
    fn test_points_stay_inside_their_band() {
        let scene = scene(42);
        assert_eq!(scene.marks.len(), 4);

        let band = BandScale::new(["Furniture", "Technology", "Office Supplies"], (270.0, 0.0))
            .with_padding(0.3);
        let bandwidth = band.bandwidth();
        let records = dataset();
        for mark in &scene.marks {
            let MarkShape::Point { cy, .. } = mark.shape else {
                panic!("expected a point");
            };
            let start = band.band(&records.records()[mark.datum].category).unwrap();
            let center = start + bandwidth / 2.0;
            assert!((cy - center).abs() <= 0.4 * bandwidth + 1e-9);
        }
    }

    #[test]
    fn test_seeded_jitter_is_deterministic() {
        assert_eq!(scene(7), scene(7));
    }

    #[test]
    fn test_colors_follow_first_seen_categories() {
        let scene = scene(1);
        let theme = Theme::default();
        assert_eq!(scene.marks[0].color, theme.categories[0]);
        assert_eq!(scene.marks[1].color, theme.categories[1]);
        assert_eq!(scene.marks[3].color, theme.categories[2]);
    }

    #[test]
    fn test_legend_rows() {
        let scene = scene(1);
        let labels: Vec<&str> = scene.legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["Furniture", "Technology", "Office Supplies"]);
        assert_eq!(scene.legend[0].x, 770.0);
        assert_eq!(scene.legend[2].y, 40.0);
    }

    #[test]
    fn test_first_category_at_bottom() {
        let scene = scene(1);
        let furniture = scene.y_axis.ticks.iter().find(|t| t.label == "Furniture").unwrap();
        let office = scene.y_axis.ticks.iter().find(|t| t.label == "Office Supplies").unwrap();
        assert!(furniture.position > office.position);
    }

    #[test]
    fn test_max_sale_lands_on_right_edge() {
        let scene = scene(3);
        let MarkShape::Point { cx, .. } = scene.marks[2].shape else {
            panic!("expected a point");
        };
        assert_eq!(cx, 870.0);
    }
}
