//! Structured logging infrastructure for SalesDash

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::error::{DashError, Result};

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, colored output for development
    Pretty,
    /// Single-line output
    Compact,
    /// Newline-delimited JSON
    Json,
}

/// Console stream used when no log file is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStream {
    /// Standard output
    #[default]
    Stdout,
    /// Standard error, leaving stdout to the stat counters
    Stderr,
}

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "salesdash_graphs=debug")
    pub level: String,
    /// Line format
    pub format: LogFormat,
    /// Optional file path for log output instead of the console
    pub file_path: Option<String>,
    /// Console stream when `file_path` is unset
    pub console: LogStream,
    /// Whether to log span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            file_path: None,
            console: LogStream::Stdout,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Builds the level filter, letting `RUST_LOG` win over the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// When logging to a file the returned guard must be kept alive for the
/// lifetime of the program, otherwise buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry().with(config.env_filter());
    let span_events = config.span_events();

    let (writer, guard) = match &config.file_path {
        Some(file_path) => {
            let path = Path::new(file_path);
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| DashError::config(format!("invalid log file path: {file_path}")))?;
            std::fs::create_dir_all(directory)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (fmt::writer::BoxMakeWriter::new(writer), Some(guard))
        }
        None => match config.console {
            LogStream::Stdout => (fmt::writer::BoxMakeWriter::new(std::io::stdout), None),
            LogStream::Stderr => (fmt::writer::BoxMakeWriter::new(std::io::stderr), None),
        },
    };
    let ansi = config.file_path.is_none();

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_ansi(ansi)
                    .with_span_events(span_events)
                    .with_target(config.include_targets)
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(ansi)
                    .with_span_events(span_events)
                    .with_target(config.include_targets)
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(span_events)
                    .with_target(config.include_targets)
                    .with_writer(writer),
            )
            .try_init(),
    };

    result.map_err(|e| DashError::config_with_source("Failed to install tracing subscriber", e))?;
    Ok(guard)
}
