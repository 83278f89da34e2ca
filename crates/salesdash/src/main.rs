//! Main entry point for SalesDash.

use clap::Parser;
use salesdash::{logging_for, AppResult, SalesDashboard};
use salesdash_common::init_logging;
use salesdash_config::ConfigLoader;
use std::path::PathBuf;
use tracing::{error, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "SALESDASH_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Log level, overriding the configured one
    #[arg(short, long)]
    log_level: Option<String>,

    /// Render once and exit instead of watching for resizes
    #[arg(long)]
    once: bool,

    /// Skip the terminal stat counters
    #[arg(long)]
    no_counters: bool,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let args = Args::parse();

    let loader = args.config.map(ConfigLoader::new).unwrap_or_else(ConfigLoader::from_env);
    let mut config = loader.load()?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    let show_counters = !args.no_counters && !args.once;
    let _log_guard = init_logging(&logging_for(&config, show_counters))?;

    info!(
        source = %config.data.source,
        output = %config.output.directory,
        "Starting SalesDash"
    );

    let mut app = SalesDashboard::new(loader, config);
    if args.no_counters {
        app = app.without_counters();
    }

    if args.once {
        match app.render_once().await {
            Ok(output) => {
                for path in output.charts.iter().chain(std::iter::once(&output.stats)) {
                    println!("{}", path.display());
                }
            }
            Err(e) => {
                error!("Render failed: {}", e);
                return Err(e);
            }
        }
        return Ok(());
    }

    app.run().await
}
