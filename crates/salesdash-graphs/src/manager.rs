//! Two-stage dashboard pipeline: load, then compute and render.

use crate::aggregator::SummaryStats;
use crate::binner::Histogram;
use crate::chart::{ChartFrame, ChartInput, ChartLayout, ChartScene};
use crate::counter::CounterAnimation;
use crate::data_fetcher::DataFetcher;
use crate::histogram::HistogramChart;
use crate::parser::{parse_rows, ParseOptions, ParsedDataset, ValidationReport};
use crate::record::Dataset;
use crate::renderer::{GraphRenderer, PlottersRenderer};
use crate::scatter::ScatterChart;
use crate::theme::Theme;
use crate::timeseries::TimeSeriesChart;
use crate::tooltip::Tooltip;
use chrono::{DateTime, Utc};
use salesdash_common::{ChartKind, DashError, Result, StatTarget, Viewport};
use salesdash_config::{AnimationConfig, Config};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// File name of the stat card snapshot.
pub const STATS_FILE: &str = "stats.json";

/// Held while a pass moves its staged files into place.
static COMMIT_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Everything computed from one loaded dataset.
#[derive(Debug, Clone)]
pub struct DashboardModel {
    /// Identifies the render pass in logs and output.
    pub pass_id: Uuid,
    /// Width the scenes were laid out for.
    pub viewport: Viewport,
    /// Records owned by this pass.
    pub dataset: Arc<Dataset>,
    /// Parse report for the dataset.
    pub report: ValidationReport,
    /// Stat card values.
    pub stats: SummaryStats,
    /// Binned sales.
    pub histogram: Histogram,
    /// One scene per chart, in dashboard order.
    pub scenes: Vec<ChartScene>,
}

impl DashboardModel {
    /// Layout inputs borrowed from this model.
    pub fn input(&self) -> ChartInput<'_> {
        ChartInput {
            dataset: &self.dataset,
            stats: &self.stats,
            histogram: &self.histogram,
        }
    }

    /// Scene of one chart.
    pub fn scene(&self, kind: ChartKind) -> Option<&ChartScene> {
        self.scenes.iter().find(|s| s.kind() == kind)
    }

    /// Tooltip for the mark under a canvas point of chart `kind`.
    pub fn tooltip_at(&self, kind: ChartKind, x: f64, y: f64) -> Option<Tooltip> {
        let scene = self.scene(kind)?;
        let mark = scene.marks.get(scene.mark_at_canvas(x, y)?)?;
        Tooltip::for_datum(kind, mark.datum, &self.input())
    }

    /// One count-up animation per stat card.
    pub fn counters(&self, config: &AnimationConfig) -> Vec<(StatTarget, CounterAnimation)> {
        StatTarget::ALL
            .into_iter()
            .map(|t| (t, CounterAnimation::for_target(&self.stats, t, config)))
            .collect()
    }

    /// Serializable stat card values.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pass_id: self.pass_id,
            generated_at: Utc::now(),
            viewport: self.viewport,
            summary: self.stats,
            cards: StatTarget::ALL
                .into_iter()
                .map(|t| {
                    (
                        t.id(),
                        StatCard {
                            value: self.stats.value_of(t),
                            text: self.stats.display(t),
                        },
                    )
                })
                .collect(),
            rows_read: self.report.rows_read,
            rows_kept: self.report.rows_kept,
            rows_flagged: self.report.rows_flagged,
        }
    }
}

/// A stat card's raw value and display text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    /// Numeric value, `null` in JSON when not finite.
    pub value: f64,
    /// Formatted text.
    pub text: String,
}

/// Contents of `stats.json`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    /// Render pass that produced the snapshot.
    pub pass_id: Uuid,
    /// Wall clock time of the snapshot.
    pub generated_at: DateTime<Utc>,
    /// Layout width.
    pub viewport: Viewport,
    /// Raw statistics.
    pub summary: SummaryStats,
    /// Cards keyed by target id (`total-sales`, ...).
    pub cards: BTreeMap<&'static str, StatCard>,
    /// Data rows seen.
    pub rows_read: usize,
    /// Rows in the dataset.
    pub rows_kept: usize,
    /// Rows with field errors.
    pub rows_flagged: usize,
}

/// Files written by a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Pass that wrote them.
    pub pass_id: Uuid,
    /// Chart images in dashboard order.
    pub charts: Vec<PathBuf>,
    /// The stats snapshot.
    pub stats: PathBuf,
}

/// Drives load, compute and render for the dashboard.
pub struct GraphManager {
    config: Arc<Config>,
    fetcher: DataFetcher,
    options: ParseOptions,
    theme: Theme,
    layouts: Vec<Box<dyn ChartLayout>>,
    renderer: Arc<dyn GraphRenderer>,
}

impl GraphManager {
    /// Builds the pipeline from a configuration snapshot.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let layouts: Vec<Box<dyn ChartLayout>> = vec![
            Box::new(HistogramChart::new(config.histogram.clone())),
            Box::new(ScatterChart::new(config.scatter.clone())),
            Box::new(TimeSeriesChart::new(config.timeseries.clone())),
        ];

        Ok(Self {
            fetcher: DataFetcher::from_config(&config.data)?,
            options: ParseOptions::from(&config.data),
            theme: Theme::from_palette(&config.palette)?,
            renderer: Arc::new(PlottersRenderer::new(config.output.format)),
            layouts,
            config,
        })
    }

    /// Replaces the renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn GraphRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Configuration this manager was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Viewport from the configured width.
    pub fn default_viewport(&self) -> Viewport {
        Viewport::new(self.config.layout.width)
    }

    /// Fetches and parses the dataset. The only suspension point of a pass.
    pub async fn load(&self, token: &CancellationToken) -> Result<ParsedDataset> {
        let rows = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(DashError::Cancelled),
            rows = self.fetcher.fetch_rows() => rows?,
        };

        let parsed = parse_rows(rows, &self.options);
        info!(report = %parsed.report, "Dataset parsed");

        if token.is_cancelled() {
            return Err(DashError::Cancelled);
        }
        Ok(parsed)
    }

    /// Aggregates, bins and lays out every chart.
    pub fn compute(&self, parsed: ParsedDataset, viewport: Viewport) -> DashboardModel {
        let ParsedDataset { dataset, report } = parsed;
        let stats = SummaryStats::compute(&dataset);
        let sales: Vec<f64> = dataset.sales().collect();
        let histogram = Histogram::compute(&sales, self.config.histogram.bins);
        if histogram.excluded > 0 {
            debug!(excluded = histogram.excluded, "Values left out of the histogram");
        }

        let mut model = DashboardModel {
            pass_id: Uuid::new_v4(),
            viewport,
            dataset: Arc::new(dataset),
            report,
            stats,
            histogram,
            scenes: Vec::with_capacity(self.layouts.len()),
        };

        let scenes = self
            .layouts
            .iter()
            .map(|layout| {
                let frame = ChartFrame {
                    width: viewport.width,
                    ..ChartFrame::new(layout.kind(), &self.config.layout)
                };
                layout.layout(&model.input(), frame, &self.theme)
            })
            .collect();
        model.scenes = scenes;
        model
    }

    /// Renders every scene and writes the charts and `stats.json`.
    ///
    /// Every file is staged under a temporary name first. The whole set is
    /// then moved into place under a process-wide lock, after a single token
    /// check, so targets never mix files from two passes and a cancelled
    /// pass replaces nothing.
    pub async fn render(
        &self,
        model: &DashboardModel,
        token: &CancellationToken,
    ) -> Result<RenderOutput> {
        debug!(
            pass_id = %model.pass_id,
            renderer = self.renderer.name(),
            "Rendering charts"
        );
        let mut images = Vec::with_capacity(model.scenes.len());
        for scene in &model.scenes {
            if token.is_cancelled() {
                return Err(DashError::Cancelled);
            }
            images.push((scene.kind(), self.renderer.render_to_bytes(scene).await?));
        }
        let stats_json = serde_json::to_vec_pretty(&model.snapshot())?;

        let directory = PathBuf::from(&self.config.output.directory);
        tokio::fs::create_dir_all(&directory).await?;

        let extension = self.renderer.format().extension();
        let charts: Vec<PathBuf> = images
            .iter()
            .map(|(kind, _)| directory.join(format!("{}.{extension}", kind.target())))
            .collect();
        let stats = directory.join(STATS_FILE);

        let files = charts
            .iter()
            .zip(images.iter().map(|(_, bytes)| bytes.as_slice()))
            .chain(std::iter::once((&stats, stats_json.as_slice())));
        let mut staged = Vec::with_capacity(charts.len() + 1);
        for (path, bytes) in files {
            match stage(path, bytes, model.pass_id).await {
                Ok(file) => staged.push(file),
                Err(e) => {
                    discard(&staged).await;
                    return Err(e);
                }
            }
        }
        commit(&staged, token).await?;

        Ok(RenderOutput {
            pass_id: model.pass_id,
            charts,
            stats,
        })
    }

    /// Runs a full pass: load, compute, render.
    #[instrument(skip_all, fields(viewport = %viewport))]
    pub async fn run_pass(
        &self,
        viewport: Viewport,
        token: &CancellationToken,
    ) -> Result<(DashboardModel, RenderOutput)> {
        let parsed = self.load(token).await?;
        if parsed.dataset.is_empty() {
            warn!("Dataset is empty, charts will only show axes");
        }

        let model = self.compute(parsed, viewport);
        let output = self.render(&model, token).await?;
        info!(
            pass_id = %output.pass_id,
            records = model.dataset.len(),
            directory = %self.config.output.directory,
            "Render pass complete"
        );
        Ok((model, output))
    }
}

/// A rendered file waiting under its temporary name.
#[derive(Debug)]
struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
}

/// Writes `bytes` next to `path` under a pass-specific temporary name.
async fn stage(path: &Path, bytes: &[u8], pass_id: Uuid) -> Result<StagedFile> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{file_name}.{}.tmp", pass_id.simple()));
    tokio::fs::write(&temp, bytes).await?;
    Ok(StagedFile {
        temp,
        target: path.to_path_buf(),
    })
}

/// Removes staged files that will not be committed.
async fn discard(staged: &[StagedFile]) {
    for file in staged {
        if let Err(e) = tokio::fs::remove_file(&file.temp).await {
            warn!("Failed to remove temp file {}: {}", file.temp.display(), e);
        }
    }
}

/// Moves every staged file over its target if `token` is still live.
///
/// A newer pass cancels the older token before it starts, so whichever pass
/// takes the lock second either sees its token cancelled or is the newest.
async fn commit(staged: &[StagedFile], token: &CancellationToken) -> Result<()> {
    let _guard = COMMIT_LOCK.lock().await;
    if token.is_cancelled() {
        discard(staged).await;
        return Err(DashError::Cancelled);
    }

    for file in staged {
        tokio::fs::rename(&file.temp, &file.target).await?;
        debug!(path = %file.target.display(), "Wrote render target");
    }
    Ok(())
}
