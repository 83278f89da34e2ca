//! Sales distribution histogram.

use crate::chart::{
    Axis, AxisSide, ChartFrame, ChartInput, ChartLayout, ChartScene, Mark, MarkShape, Rect, Tick,
};
use crate::scale::LinearScale;
use crate::theme::Theme;
use salesdash_common::{format_currency, ChartKind};
use salesdash_config::HistogramConfig;
use tracing::debug;

/// Default tick count on the frequency axis.
const Y_TICKS: usize = 10;

/// Lays out one bar per histogram bucket.
#[derive(Debug, Clone)]
pub struct HistogramChart {
    config: HistogramConfig,
}

impl HistogramChart {
    /// Creates the layout.
    pub fn new(config: HistogramConfig) -> Self {
        Self { config }
    }
}

impl ChartLayout for HistogramChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Histogram
    }

    fn layout(&self, input: &ChartInput<'_>, frame: ChartFrame, theme: &Theme) -> ChartScene {
        let (inner_width, inner_height) = (frame.inner_width(), frame.inner_height());
        let histogram = input.histogram;

        let (_, max) = histogram.domain.unwrap_or((0.0, 0.0));
        let x = LinearScale::new((0.0, max), (0.0, inner_width));
        let y = LinearScale::new((0.0, histogram.max_count() as f64), (inner_height, 0.0));

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
        let y_ticks = y.ticks(Y_TICKS);
        let y_axis = Axis::new(
            AxisSide::Left,
            "Frequency",
            y_ticks
                .iter()
                .map(|v| Tick {
                    position: y.map(*v),
                    label: format!("{v}"),
                })
                .collect(),
        );

        let mut scene = ChartScene::new(frame, theme.clone(), x_axis, y_axis);
        scene.grid = y_ticks.iter().map(|v| y.map(*v)).collect();
        scene.marks = histogram
            .buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                let left = x.map(bucket.x0) + 1.0;
                let top = y.map(bucket.count as f64);
                Mark {
                    shape: MarkShape::Bar(Rect {
                        x: left,
                        y: top,
                        width: (x.map(bucket.x1) - x.map(bucket.x0) - 2.0).max(0.0),
                        height: (inner_height - top).max(0.0),
                    }),
                    color: theme.primary,
                    opacity: 1.0,
                    datum: i,
                }
            })
            .collect();

        debug!(bars = scene.marks.len(), "Histogram laid out");
        scene
    }
}
