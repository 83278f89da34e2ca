//! Chart scene rendering with plotters.

use crate::chart::{AxisSide, ChartScene, MarkShape};
use async_trait::async_trait;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use salesdash_common::{DashError, Result};
use salesdash_config::OutputFormat;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

const FONT_FAMILY: &str = "sans-serif";
const AXIS_FONT_SIZE: i32 = 11;
const TITLE_FONT_SIZE: i32 = 12;
const TICK_SIZE: i32 = 6;
const TICK_PADDING: i32 = 3;
/// Distance of the x axis title below the plotting area.
const X_TITLE_OFFSET: i32 = 40;
/// Distance of the y axis title left of the plotting area.
const Y_TITLE_OFFSET: i32 = 45;
const LEGEND_SWATCH_RADIUS: i32 = 5;
const LEGEND_OPACITY: f64 = 0.6;

/// Draws chart scenes to files or in-memory images.
#[async_trait]
pub trait GraphRenderer: Send + Sync {
    /// Encoded image for `scene`.
    async fn render_to_bytes(&self, scene: &ChartScene) -> Result<Vec<u8>>;

    /// Renders `scene` and writes it to `path`.
    async fn render_to_file(&self, scene: &ChartScene, path: &Path) -> Result<()> {
        let bytes = self.render_to_bytes(scene).await?;
        tokio::fs::write(path, &bytes).await?;
        info!(
            chart = %scene.kind(),
            path = %path.display(),
            bytes = bytes.len(),
            "Rendered chart"
        );
        Ok(())
    }

    /// Image format produced.
    fn format(&self) -> OutputFormat;

    /// Renderer name for logs.
    fn name(&self) -> &'static str;
}

/// [`GraphRenderer`] backed by plotters' bitmap and SVG backends.
#[derive(Debug, Clone, Copy)]
pub struct PlottersRenderer {
    format: OutputFormat,
}

impl PlottersRenderer {
    /// Creates a renderer producing `format` images.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Draws synchronously. Prefer [`GraphRenderer::render_to_bytes`] from
    /// async code.
    pub fn render_blocking(&self, scene: &ChartScene) -> Result<Vec<u8>> {
        match self.format {
            OutputFormat::Png => render_png(scene),
            OutputFormat::Svg => render_svg(scene),
        }
    }
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self::new(OutputFormat::Png)
    }
}

#[async_trait]
impl GraphRenderer for PlottersRenderer {
    async fn render_to_bytes(&self, scene: &ChartScene) -> Result<Vec<u8>> {
        let renderer = *self;
        let scene = scene.clone();
        tokio::task::spawn_blocking(move || renderer.render_blocking(&scene))
            .await
            .map_err(|e| DashError::graph_with_source("Render task failed", e))?
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn name(&self) -> &'static str {
        "plotters"
    }
}

fn render_png(scene: &ChartScene) -> Result<Vec<u8>> {
    let (width, height) = (scene.frame.width, scene.frame.height);
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_scene(&root, scene)?;
        root.present()?;
    }

    let image = image::RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| DashError::graph("Bitmap buffer does not match canvas size"))?;
    let mut encoded = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut encoded, image::ImageOutputFormat::Png)
        .map_err(|e| DashError::graph_with_source("PNG encoding failed", e))?;
    Ok(encoded.into_inner())
}

fn render_svg(scene: &ChartScene) -> Result<Vec<u8>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (scene.frame.width, scene.frame.height))
            .into_drawing_area();
        draw_scene(&root, scene)?;
        root.present()?;
    }
    Ok(svg.into_bytes())
}

/// Pixel origin of the plotting area on the canvas.
fn origin(scene: &ChartScene) -> (f64, f64) {
    (
        f64::from(scene.frame.margins.left),
        f64::from(scene.frame.margins.top),
    )
}

fn to_px(origin: f64, offset: f64) -> i32 {
    (origin + offset).round() as i32
}

fn draw_scene<DB>(root: &DrawingArea<DB, Shift>, scene: &ChartScene) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    let theme = &scene.theme;
    let (ox, oy) = origin(scene);
    let (inner_width, inner_height) = (scene.frame.inner_width(), scene.frame.inner_height());
    let (left, right) = (to_px(ox, 0.0), to_px(ox, inner_width));
    let (top, bottom) = (to_px(oy, 0.0), to_px(oy, inner_height));

    root.fill(&theme.background)?;

    for y in &scene.grid {
        let y = to_px(oy, *y);
        root.draw(&PathElement::new(
            vec![(left, y), (right, y)],
            theme.grid.stroke_width(1),
        ))?;
    }

    let mut skipped = 0usize;
    for mark in scene.styled_marks() {
        let style = mark.color.mix(mark.opacity).filled();
        match mark.shape {
            MarkShape::Bar(rect) => {
                if !(rect.x.is_finite() && rect.y.is_finite()) {
                    skipped += 1;
                    continue;
                }
                root.draw(&Rectangle::new(
                    [
                        (to_px(ox, rect.x), to_px(oy, rect.y)),
                        (to_px(ox, rect.x + rect.width), to_px(oy, rect.y + rect.height)),
                    ],
                    style,
                ))?;
            }
            MarkShape::Point { cx, cy, radius } => {
                if !(cx.is_finite() && cy.is_finite()) {
                    skipped += 1;
                    continue;
                }
                root.draw(&Circle::new(
                    (to_px(ox, cx), to_px(oy, cy)),
                    radius.round() as i32,
                    style,
                ))?;
            }
        }
    }
    if skipped > 0 {
        debug!(skipped, chart = %scene.kind(), "Skipped marks with non-finite coordinates");
    }

    let axis_style = theme.text.stroke_width(1);
    root.draw(&PathElement::new(vec![(left, bottom), (right, bottom)], axis_style))?;
    root.draw(&PathElement::new(vec![(left, top), (left, bottom)], axis_style))?;

    let tick_font = (FONT_FAMILY, AXIS_FONT_SIZE).into_font().color(&theme.text);
    let title_font = (FONT_FAMILY, TITLE_FONT_SIZE).into_font().color(&theme.text);

    for axis in [&scene.x_axis, &scene.y_axis] {
        for tick in &axis.ticks {
            match axis.side {
                AxisSide::Bottom => {
                    let x = to_px(ox, tick.position);
                    root.draw(&PathElement::new(
                        vec![(x, bottom), (x, bottom + TICK_SIZE)],
                        axis_style,
                    ))?;
                    draw_label(
                        root,
                        &tick.label,
                        (x, bottom + TICK_SIZE + TICK_PADDING),
                        tick_font.pos(Pos::new(HPos::Center, VPos::Top)),
                    );
                }
                AxisSide::Left => {
                    let y = to_px(oy, tick.position);
                    root.draw(&PathElement::new(
                        vec![(left - TICK_SIZE, y), (left, y)],
                        axis_style,
                    ))?;
                    draw_label(
                        root,
                        &tick.label,
                        (left - TICK_SIZE - TICK_PADDING, y),
                        tick_font.pos(Pos::new(HPos::Right, VPos::Center)),
                    );
                }
            }
        }
    }

    draw_label(
        root,
        &scene.x_axis.title,
        (to_px(ox, inner_width / 2.0), bottom + X_TITLE_OFFSET),
        title_font.pos(Pos::new(HPos::Center, VPos::Center)),
    );
    draw_label(
        root,
        &scene.y_axis.title,
        (left - Y_TITLE_OFFSET, to_px(oy, inner_height / 2.0)),
        (FONT_FAMILY, TITLE_FONT_SIZE)
            .into_font()
            .transform(FontTransform::Rotate270)
            .color(&theme.text)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    );

    for entry in &scene.legend {
        let (x, y) = (to_px(ox, entry.x), to_px(oy, entry.y));
        root.draw(&Circle::new(
            (x, y),
            LEGEND_SWATCH_RADIUS,
            entry.color.mix(LEGEND_OPACITY).filled(),
        ))?;
        draw_label(
            root,
            &entry.label,
            (x + 10, y + 4),
            tick_font.pos(Pos::new(HPos::Left, VPos::Bottom)),
        );
    }

    Ok(())
}

/// Text needs a system font; charts still render without one.
fn draw_label<DB>(root: &DrawingArea<DB, Shift>, text: &str, at: (i32, i32), style: TextStyle<'_>)
where
    DB: DrawingBackend,
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    if let Err(error) = root.draw(&Text::new(text, at, style)) {
        debug!(%error, text, "Skipping label");
    }
}
