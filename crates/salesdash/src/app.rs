//! Application lifecycle: initial render, resize-driven re-renders, shutdown.

use crate::coordinator::{PassCoordinator, PassTicket};
use crate::counters::CounterBoard;
use crate::error::AppResult;
use salesdash_common::{LogStream, LoggingConfig, Result as DashResult, Viewport};
use salesdash_config::{Config, ConfigCache, ConfigLoader};
use salesdash_graphs::{DashboardModel, GraphManager, RenderOutput};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Logging settings for a run. Counters rewrite stdout, so console logs go
/// to stderr while they are shown.
pub fn logging_for(config: &Config, show_counters: bool) -> LoggingConfig {
    let mut logging = config.logging.clone();
    if show_counters {
        logging.console = LogStream::Stderr;
    }
    logging
}

/// The dashboard process.
pub struct SalesDashboard {
    loader: ConfigLoader,
    cache: Arc<ConfigCache>,
    coordinator: Arc<PassCoordinator>,
    /// Set until the first successful pass has played the counters.
    counters_pending: Arc<AtomicBool>,
}

impl SalesDashboard {
    /// Creates a dashboard from an already loaded configuration.
    pub fn new(loader: ConfigLoader, config: Config) -> Self {
        Self {
            loader,
            cache: Arc::new(ConfigCache::new(config)),
            coordinator: Arc::new(PassCoordinator::new(CancellationToken::new())),
            counters_pending: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Disables the terminal counters.
    pub fn without_counters(self) -> Self {
        self.counters_pending.store(false, Ordering::SeqCst);
        self
    }

    /// Whether the next successful pass will play the counters.
    pub fn counters_pending(&self) -> bool {
        self.counters_pending.load(Ordering::SeqCst)
    }

    /// Current configuration.
    pub fn config(&self) -> Arc<Config> {
        self.cache.get()
    }

    /// Token that stops every pass.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.coordinator.shutdown_token().clone()
    }

    /// Re-reads the configuration file. A bad file keeps the previous config.
    pub fn reload_config(&self) -> Arc<Config> {
        match self.loader.load() {
            Ok(config) => {
                info!(width = config.layout.width, "Configuration reloaded");
                self.cache.update(config);
            }
            Err(e) => warn!("Keeping previous configuration: {}", e),
        }
        self.cache.get()
    }

    /// Runs one pass to completion.
    pub async fn render_once(&self) -> AppResult<RenderOutput> {
        let ticket = self.coordinator.begin().await;
        let (_, output) = execute(self.cache.get(), &ticket).await?;
        Ok(output)
    }

    /// Starts a pass in the background, cancelling the one in flight.
    pub async fn trigger(&self) -> JoinHandle<DashResult<RenderOutput>> {
        let ticket = self.coordinator.begin().await;
        let config = self.cache.get();
        let counters_pending = Arc::clone(&self.counters_pending);

        tokio::spawn(async move {
            match execute(Arc::clone(&config), &ticket).await {
                Ok((model, output)) => {
                    info!(
                        generation = ticket.generation,
                        pass_id = %output.pass_id,
                        "Dashboard updated"
                    );
                    // resizes only redraw the charts
                    if counters_pending.swap(false, Ordering::SeqCst) {
                        play_counters(&model, &config, &ticket.token).await;
                    }
                    Ok(output)
                }
                Err(e) => {
                    if e.is_cancelled() {
                        debug!(generation = ticket.generation, "Render pass superseded");
                    } else {
                        error!(
                            generation = ticket.generation,
                            "Render pass failed, previous output kept: {}", e
                        );
                    }
                    Err(e)
                }
            }
        })
    }

    /// Renders, then re-renders on every terminal resize until Ctrl-C.
    pub async fn run(&self) -> AppResult<()> {
        let mut resize = ResizeSignal::new()?;
        let mut pending = self.trigger().await;

        loop {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    result?;
                    info!("Received shutdown signal");
                    break;
                }
                Some(()) = resize.recv() => {
                    info!("Viewport resized, re-rendering");
                    self.reload_config();
                    pending = self.trigger().await;
                }
            }
        }

        self.coordinator.shutdown_token().cancel();
        if let Err(e) = pending.await? {
            debug!("Last render pass ended early: {}", e);
        }
        info!("SalesDash has shut down");
        Ok(())
    }
}

async fn execute(
    config: Arc<Config>,
    ticket: &PassTicket,
) -> DashResult<(DashboardModel, RenderOutput)> {
    let viewport = Viewport::new(config.layout.width);
    let manager = GraphManager::from_config(config)?;
    manager.run_pass(viewport, &ticket.token).await
}

async fn play_counters(model: &DashboardModel, config: &Config, token: &CancellationToken) {
    let board = CounterBoard::new(model.counters(&config.animation));
    let mut stdout = std::io::stdout();
    let result = if config.animation.enabled {
        board.play(&mut stdout, token).await.map(|_| ())
    } else {
        board.print_final(&mut stdout)
    };
    if let Err(e) = result {
        warn!("Failed to write counters: {}", e);
    }
}

/// Terminal resize notifications. Never fires off Unix.
struct ResizeSignal {
    #[cfg(unix)]
    inner: tokio::signal::unix::Signal,
}

impl ResizeSignal {
    fn new() -> std::io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            Ok(Self {
                inner: signal(SignalKind::window_change())?,
            })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    async fn recv(&mut self) -> Option<()> {
        #[cfg(unix)]
        {
            self.inner.recv().await
        }
        #[cfg(not(unix))]
        {
            std::future::pending().await
        }
    }
}
