//! Backend-independent chart scenes.
//!
//! A layout turns data and scales into a [`ChartScene`]: pixel-space marks,
//! axes, grid lines and legend entries in chart-inner coordinates (origin at
//! the top-left corner of the plotting area, inside the margins). Renderers
//! only translate by the margins and draw.

use crate::aggregator::SummaryStats;
use crate::binner::Histogram;
use crate::record::Dataset;
use crate::theme::Theme;
use plotters::style::RGBColor;
use salesdash_common::ChartKind;
use salesdash_config::{LayoutConfig, MarginConfig};

/// Radius of a hovered point.
pub const HOVER_RADIUS: f64 = 6.0;

/// Canvas size and margins of one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    /// Which chart this frame belongs to.
    pub kind: ChartKind,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Space around the plotting area.
    pub margins: MarginConfig,
}

impl ChartFrame {
    /// Frame for `kind` at the configured viewport width.
    pub fn new(kind: ChartKind, layout: &LayoutConfig) -> Self {
        Self {
            kind,
            width: layout.width,
            height: layout.height_of(kind),
            margins: layout.margins,
        }
    }

    /// Plotting area width, never negative.
    pub fn inner_width(&self) -> f64 {
        self.width
            .saturating_sub(self.margins.left.saturating_add(self.margins.right)) as f64
    }

    /// Plotting area height, never negative.
    pub fn inner_height(&self) -> f64 {
        self.height
            .saturating_sub(self.margins.top.saturating_add(self.margins.bottom)) as f64
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, `>= 0`.
    pub width: f64,
    /// Height, `>= 0`.
    pub height: f64,
}

impl Rect {
    /// Whether the point lies inside or on the edge.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Geometry of a mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkShape {
    /// A histogram bar.
    Bar(Rect),
    /// A circle.
    Point {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Radius.
        radius: f64,
    },
}

/// One drawable datum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mark {
    /// Geometry.
    pub shape: MarkShape,
    /// Fill color.
    pub color: RGBColor,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f64,
    /// Index of the bucket or record this mark represents.
    pub datum: usize,
}

impl Mark {
    /// Whether the point hits this mark.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        match self.shape {
            MarkShape::Bar(rect) => rect.contains(px, py),
            MarkShape::Point { cx, cy, radius } => {
                let (dx, dy) = (px - cx, py - cy);
                dx * dx + dy * dy <= radius * radius
            }
        }
    }

    /// Hover styling: bars take the highlight color, points grow and turn opaque.
    pub fn highlighted(&self, highlight: RGBColor) -> Self {
        match self.shape {
            MarkShape::Bar(_) => Self {
                color: highlight,
                ..*self
            },
            MarkShape::Point { cx, cy, .. } => Self {
                shape: MarkShape::Point {
                    cx,
                    cy,
                    radius: HOVER_RADIUS,
                },
                opacity: 1.0,
                ..*self
            },
        }
    }
}

/// Which side of the plotting area an axis sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    /// Below, labels horizontal.
    Bottom,
    /// Left, title rotated.
    Left,
}

/// A labelled tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Offset along the axis in pixels.
    pub position: f64,
    /// Label text.
    pub label: String,
}

/// A chart axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Placement.
    pub side: AxisSide,
    /// Ticks in drawing order.
    pub ticks: Vec<Tick>,
    /// Axis title.
    pub title: String,
}

impl Axis {
    /// Creates an axis.
    pub fn new(side: AxisSide, title: impl Into<String>, ticks: Vec<Tick>) -> Self {
        Self {
            side,
            ticks,
            title: title.into(),
        }
    }
}

/// A legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Category name.
    pub label: String,
    /// Swatch color.
    pub color: RGBColor,
    /// Swatch center x.
    pub x: f64,
    /// Swatch center y.
    pub y: f64,
}

/// Inputs shared by every chart layout in a pass.
#[derive(Debug, Clone, Copy)]
pub struct ChartInput<'a> {
    /// Parsed records.
    pub dataset: &'a Dataset,
    /// Summary statistics.
    pub stats: &'a SummaryStats,
    /// Binned sales.
    pub histogram: &'a Histogram,
}

/// Turns a pass's data into a scene for one chart kind.
pub trait ChartLayout: Send + Sync {
    /// Chart this layout produces.
    fn kind(&self) -> ChartKind;

    /// Builds the scene.
    fn layout(&self, input: &ChartInput<'_>, frame: ChartFrame, theme: &Theme) -> ChartScene;
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    /// Canvas and margins.
    pub frame: ChartFrame,
    /// Colors.
    pub theme: Theme,
    /// Marks in drawing order.
    pub marks: Vec<Mark>,
    /// Bottom axis.
    pub x_axis: Axis,
    /// Left axis.
    pub y_axis: Axis,
    /// Horizontal grid line offsets.
    pub grid: Vec<f64>,
    /// Legend rows, possibly empty.
    pub legend: Vec<LegendEntry>,
    /// Mark drawn with hover styling.
    pub highlighted: Option<usize>,
}

impl ChartScene {
    /// Creates a scene without marks.
    pub fn new(frame: ChartFrame, theme: Theme, x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            frame,
            theme,
            marks: Vec::new(),
            x_axis,
            y_axis,
            grid: Vec::new(),
            legend: Vec::new(),
            highlighted: None,
        }
    }

    /// Chart kind.
    pub fn kind(&self) -> ChartKind {
        self.frame.kind
    }

    /// Index of the topmost mark under the point, in chart-inner coordinates.
    pub fn mark_at(&self, px: f64, py: f64) -> Option<usize> {
        self.marks.iter().rposition(|m| m.contains(px, py))
    }

    /// Like [`ChartScene::mark_at`] with canvas coordinates.
    pub fn mark_at_canvas(&self, x: f64, y: f64) -> Option<usize> {
        self.mark_at(
            x - f64::from(self.frame.margins.left),
            y - f64::from(self.frame.margins.top),
        )
    }

    /// Marks `index` as hovered. Out-of-range indices clear the highlight.
    pub fn with_highlight(mut self, index: Option<usize>) -> Self {
        self.highlighted = index.filter(|i| *i < self.marks.len());
        self
    }

    /// Marks as they should be drawn, hover styling applied.
    pub fn styled_marks(&self) -> impl Iterator<Item = Mark> + '_ {
        self.marks.iter().enumerate().map(move |(i, m)| {
            if Some(i) == self.highlighted {
                m.highlighted(self.theme.highlight)
            } else {
                *m
            }
        })
    }
}
