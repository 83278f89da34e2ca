//! Integration tests for salesdash-graphs crate.
//!
//! These run whole passes against CSV fixtures written to a temp directory.

use salesdash_common::test_utils::{assert_approx_eq, init_test_logging, sales_fixtures};
use salesdash_common::{ChartKind, Viewport};
use salesdash_config::{Config, OutputFormat, RowPolicy};
use salesdash_graphs::{GraphManager, MarkShape, STATS_FILE};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn config_for(dir: &Path, csv: &str) -> Config {
    let data = dir.join("sales.csv");
    std::fs::write(&data, csv).unwrap();

    let mut config = Config::default();
    config.data.source = data.to_string_lossy().into_owned();
    config.output.directory = dir.join("charts").to_string_lossy().into_owned();
    config.scatter.jitter_seed = Some(7);
    config
}

fn manager(config: Config) -> GraphManager {
    GraphManager::from_config(Arc::new(config)).unwrap()
}

#[tokio::test]
async fn test_png_pipeline() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let manager = manager(config_for(dir.path(), &sales_fixtures::generated_csv(120)));

    let (model, output) = manager
        .run_pass(Viewport::new(640), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(model.stats.count, 120);
    assert_eq!(model.histogram.buckets.len(), 30);
    assert_eq!(model.histogram.total_count(), 120);

    for (path, kind) in output.charts.iter().zip(ChartKind::ALL) {
        let image = image::open(path).unwrap();
        assert_eq!(image.width(), 640);
        assert_eq!(image.height(), manager.config().layout.height_of(kind));
    }

    let stats: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&output.stats).unwrap()).unwrap();
    assert_eq!(stats["cards"]["total-orders"]["value"], 120.0);
    assert_approx_eq(
        stats["summary"]["total"].as_f64().unwrap(),
        model.stats.total,
        1e-6,
    );
}

#[tokio::test]
async fn test_rerender_replaces_targets() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let mut config = config_for(dir.path(), &sales_fixtures::small_csv());
    config.output.format = OutputFormat::Svg;
    let manager = manager(config);
    let token = CancellationToken::new();

    let (_, first) = manager.run_pass(Viewport::new(960), &token).await.unwrap();
    let before = std::fs::read_to_string(&first.charts[0]).unwrap();

    let (_, second) = manager.run_pass(Viewport::new(500), &token).await.unwrap();
    let after = std::fs::read_to_string(&second.charts[0]).unwrap();

    assert_eq!(first.charts, second.charts);
    assert_ne!(first.pass_id, second.pass_id);
    assert!(before.contains("960"));
    assert!(after.contains("500"));

    let files: Vec<_> = std::fs::read_dir(dir.path().join("charts"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 4);
    assert!(files.iter().any(|f| f == STATS_FILE));
}

#[tokio::test]
async fn test_superseded_pass_keeps_previous_output() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let manager = manager(config_for(dir.path(), &sales_fixtures::small_csv()));

    let (_, output) = manager
        .run_pass(Viewport::new(960), &CancellationToken::new())
        .await
        .unwrap();
    let before = std::fs::read(&output.stats).unwrap();

    let stale = CancellationToken::new();
    let parsed = manager.load(&stale).await.unwrap();
    let model = manager.compute(parsed, Viewport::new(400));
    stale.cancel();

    assert!(manager.render(&model, &stale).await.unwrap_err().is_cancelled());
    assert_eq!(std::fs::read(&output.stats).unwrap(), before);
}

#[tokio::test]
async fn test_propagate_policy_keeps_flagged_rows() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let mut config = config_for(dir.path(), &sales_fixtures::malformed_csv());
    config.data.row_policy = RowPolicy::Propagate;
    let manager = manager(config);

    let parsed = manager.load(&CancellationToken::new()).await.unwrap();
    assert_eq!(parsed.report.rows_flagged, 2);
    assert_eq!(parsed.report.rows_dropped(), 0);

    let model = manager.compute(parsed, manager.default_viewport());
    assert_eq!(model.dataset.len(), 4);
    assert!(model.stats.total.is_nan());
    assert_eq!(model.histogram.excluded, 1);
    assert_eq!(model.histogram.total_count(), 3);

    let marks = |kind| model.scene(kind).unwrap().marks.len();
    assert_eq!(marks(ChartKind::Scatter), 3);
    assert_eq!(marks(ChartKind::TimeSeries), 2);
}

#[tokio::test]
async fn test_missing_column_fails_load() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let manager = manager(config_for(
        dir.path(),
        "order_date,category,product_name,customer_name\n2017-01-01,Furniture,Chair,Claire Gute\n",
    ));

    let err = manager.load(&CancellationToken::new()).await.unwrap_err();
    assert!(err.to_string().contains("sales"));
}

#[tokio::test]
async fn test_histogram_bars_cover_inner_width() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let manager = manager(config_for(dir.path(), &sales_fixtures::generated_csv(60)));
    let parsed = manager.load(&CancellationToken::new()).await.unwrap();
    let model = manager.compute(parsed, Viewport::new(800));

    let scene = model.scene(ChartKind::Histogram).unwrap();
    let inner = scene.frame.inner_width();
    let MarkShape::Bar(last) = scene.marks.last().unwrap().shape else {
        panic!("expected a bar");
    };
    assert_approx_eq(last.x + last.width + 1.0, inner, 1e-6);

    let tip = model
        .tooltip_at(
            ChartKind::Histogram,
            last.x + f64::from(scene.frame.margins.left) + 1.0,
            scene.frame.inner_height() + f64::from(scene.frame.margins.top) - 0.5,
        )
        .unwrap();
    assert!(tip.to_string().starts_with("Range: "));
}
