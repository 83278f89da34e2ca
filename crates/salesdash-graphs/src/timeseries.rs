//! Sales over order date.

use crate::chart::{
    Axis, AxisSide, ChartFrame, ChartInput, ChartLayout, ChartScene, Mark, MarkShape, Tick,
};
use crate::scale::{LinearScale, TimeScale};
use crate::theme::Theme;
use salesdash_common::{format_currency, ChartKind};
use salesdash_config::TimeSeriesConfig;
use tracing::debug;

/// Lays out one point per dated record.
#[derive(Debug, Clone)]
pub struct TimeSeriesChart {
    config: TimeSeriesConfig,
}

impl TimeSeriesChart {
    /// Creates the layout.
    pub fn new(config: TimeSeriesConfig) -> Self {
        Self { config }
    }
}

impl ChartLayout for TimeSeriesChart {
    fn kind(&self) -> ChartKind {
        ChartKind::TimeSeries
    }

    fn layout(&self, input: &ChartInput<'_>, frame: ChartFrame, theme: &Theme) -> ChartScene {
        let (inner_width, inner_height) = (frame.inner_width(), frame.inner_height());
        let dataset = input.dataset;

        let y = LinearScale::new((0.0, input.stats.max.unwrap_or(0.0)), (inner_height, 0.0));
        let y_ticks = y.ticks(self.config.y_ticks);
        let y_axis = Axis::new(
            AxisSide::Left,
            "Sales Amount ($)",
            y_ticks
                .iter()
                .map(|v| Tick {
                    position: y.map(*v),
                    label: format_currency(*v),
                })
                .collect(),
        );

        let Some(extent) = dataset.date_extent() else {
            let mut scene = ChartScene::new(
                frame,
                theme.clone(),
                Axis::new(AxisSide::Bottom, "Order Date", Vec::new()),
                y_axis,
            );
            scene.grid = y_ticks.iter().map(|v| y.map(*v)).collect();
            debug!("No dated records, time series left empty");
            return scene;
        };

        let x = TimeScale::new(extent, (0.0, inner_width));
        let x_axis = Axis::new(
            AxisSide::Bottom,
            "Order Date",
            x.tick_labels(self.config.x_ticks)
                .into_iter()
                .map(|(t, label)| Tick {
                    position: x.map(t),
                    label,
                })
                .collect(),
        );

        let mut scene = ChartScene::new(frame, theme.clone(), x_axis, y_axis);
        scene.grid = y_ticks.iter().map(|v| y.map(*v)).collect();
        scene.marks = dataset
            .records()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.sales.is_finite())
            .filter_map(|(i, r)| {
                let date = r.order_date?;
                Some(Mark {
                    shape: MarkShape::Point {
                        cx: x.map(date),
                        cy: y.map(r.sales),
                        radius: f64::from(self.config.point_radius),
                    },
                    color: theme.series,
                    opacity: self.config.opacity,
                    datum: i,
                })
            })
            .collect();

        debug!(
            points = scene.marks.len(),
            skipped = dataset.len() - scene.marks.len(),
            "Time series laid out"
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
    use salesdash_common::test_utils::mock_datetime;
    use salesdash_config::LayoutConfig;

    fn record(sales: f64, day: Option<u32>) -> Record {
        Record {
            sales,
            order_date: day.map(|d| mock_datetime(2017, 1, d, 0, 0, 0)),
            category: "Furniture".to_string(),
            product_name: "Chair".to_string(),
            customer_name: "Claire Gute".to_string(),
        }
    }

    fn layout(dataset: &Dataset) -> ChartScene {
        let stats = SummaryStats::compute(dataset);
        let histogram = Histogram::default();
        let input = ChartInput {
            dataset,
            stats: &stats,
            histogram: &histogram,
        };
        let frame = ChartFrame::new(ChartKind::TimeSeries, &LayoutConfig::default());
        TimeSeriesChart::new(TimeSeriesConfig::default()).layout(&input, frame, &Theme::default())
    }

    #[test]
    fn test_points_map_date_and_sales() {
        let dataset = Dataset::new(vec![record(0.0, Some(1)), record(200.0, Some(11))]);
        let scene = layout(&dataset);
        assert_eq!(scene.marks.len(), 2);

        let MarkShape::Point { cx, cy, radius } = scene.marks[1].shape else {
            panic!("expected a point");
        };
        assert_eq!((cx, cy, radius), (870.0, 0.0, 3.0));
        assert_eq!(scene.marks[0].shape, MarkShape::Point { cx: 0.0, cy: 320.0, radius: 3.0 });
        assert_eq!(scene.marks[0].color, Theme::default().series);
    }

    #[test]
    fn test_undated_records_are_skipped() {
        let dataset = Dataset::new(vec![
            record(10.0, Some(1)),
            record(20.0, None),
            record(30.0, Some(3)),
        ]);
        let scene = layout(&dataset);
        let data: Vec<usize> = scene.marks.iter().map(|m| m.datum).collect();
        assert_eq!(data, vec![0, 2]);
    }

    #[test]
    fn test_no_dates_gives_axes_only() {
        let scene = layout(&Dataset::new(vec![record(10.0, None)]));
        assert!(scene.marks.is_empty());
        assert!(scene.x_axis.ticks.is_empty());
        assert!(!scene.y_axis.ticks.is_empty());
    }

    #[test]
    fn test_axis_labels() {
        let dataset = Dataset::new(vec![record(10.0, Some(1)), record(5000.0, Some(31))]);
        let scene = layout(&dataset);
        assert_eq!(scene.x_axis.title, "Order Date");
        assert_eq!(scene.y_axis.ticks.last().unwrap().label, "$5.0K");
        assert!(!scene.x_axis.ticks.is_empty());
    }
}
