//! Dataset retrieval from a local file or an HTTP(S) URL, and CSV decoding.

use crate::record::{RawRow, REQUIRED_COLUMNS};
use salesdash_common::{DashError, Result};
use salesdash_config::DataConfig;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Where the dataset lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A path on the local filesystem.
    File(PathBuf),
    /// A remote `http` or `https` resource.
    Url(Url),
}

impl DataSource {
    /// Interprets a configured source string.
    ///
    /// Anything that parses as an `http`/`https` URL is remote, everything
    /// else is treated as a path.
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(DashError::validation_field(
                "Data source cannot be empty",
                "data.source",
            ));
        }

        match Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Url(url)),
            _ => Ok(Self::File(PathBuf::from(source))),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Loads raw CSV text and splits it into header-keyed rows.
#[derive(Debug, Clone)]
pub struct DataFetcher {
    client: reqwest::Client,
    source: DataSource,
}

impl DataFetcher {
    /// Creates a fetcher for an explicit source.
    pub fn new(source: DataSource, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashError::network_with_source("Failed to build HTTP client", e))?;
        Ok(Self { client, source })
    }

    /// Creates a fetcher from the data section of the configuration.
    pub fn from_config(config: &DataConfig) -> Result<Self> {
        Self::new(
            DataSource::parse(&config.source)?,
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    /// The source this fetcher reads.
    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Reads the whole dataset as text.
    #[instrument(skip(self), fields(source = %self.source))]
    pub async fn fetch_text(&self) -> Result<String> {
        let text = match &self.source {
            DataSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                DashError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to read dataset '{}': {e}", path.display()),
                ))
            })?,
            DataSource::Url(url) => {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(DashError::network_with_status(
                        format!("Dataset request to {url} failed with {status}"),
                        status.as_u16(),
                    ));
                }
                response.text().await?
            }
        };

        debug!(bytes = text.len(), "Dataset fetched");
        Ok(text)
    }

    /// Fetches and decodes the dataset into raw rows.
    pub async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        let text = self.fetch_text().await?;
        let rows = decode_csv(&text)?;
        info!(rows = rows.len(), source = %self.source, "Dataset loaded");
        Ok(rows)
    }
}

/// Splits CSV text into rows keyed by header name.
///
/// The header row must name every column in [`REQUIRED_COLUMNS`]. Extra
/// columns are kept; short rows simply lack the trailing fields.
pub fn decode_csv(text: &str) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(DashError::validation_field("Dataset has no header row", "header"));
    }

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DashError::validation_field(
                format!("Dataset is missing required column '{column}'"),
                column,
            ));
        }
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // header is line 1
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);

        let mut row = RawRow::new(line);
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.as_str(), value);
        }
        rows.push(row);
    }

    Ok(rows)
}
