//! Error types and utilities for SalesDash

use thiserror::Error;

/// Result type alias for SalesDash operations
pub type Result<T> = std::result::Result<T, DashError>;

/// Boxed error source carried by the structured variants
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for SalesDash operations
#[derive(Error, Debug)]
pub enum DashError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors (missing data file, unwritable output directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors while fetching a remote dataset
    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// CSV framing errors (unterminated quotes, unreadable headers)
    #[error("CSV error: {message}")]
    Csv {
        message: String,
        line: Option<u64>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Chart layout and rendering errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Validation errors for configuration values or dataset shape
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A render pass was superseded before it finished
    #[error("Render pass cancelled")]
    Cancelled,

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl DashError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error carrying the HTTP status
    pub fn network_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Network {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error only signals a superseded render pass
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to DashError
impl From<reqwest::Error> for DashError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16()).unwrap_or(0);
            Self::Network {
                message: format!("HTTP error: {}", status_code),
                status_code: Some(status_code),
                source: Some(Box::new(err)),
            }
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

/// Convert from csv::Error to DashError
impl From<csv::Error> for DashError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line());
        Self::Csv {
            message: err.to_string(),
            line,
            source: Some(Box::new(err)),
        }
    }
}

/// Convert from serde_yaml::Error to DashError
impl From<serde_yaml::Error> for DashError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to DashError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for DashError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = DashError::new("test message");
        assert!(error.to_string().contains("test message"));

        let config_error = DashError::config("bins must be positive");
        assert_eq!(
            config_error.to_string(),
            "Configuration error: bins must be positive"
        );

        let network_error = DashError::network_with_status("not found", 404);
        assert!(network_error.to_string().contains("Network error"));
        assert!(matches!(
            network_error,
            DashError::Network {
                status_code: Some(404),
                ..
            }
        ));

        let validation_error = DashError::validation_field("missing column", "order_date");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(matches!(
            validation_error,
            DashError::Validation { field: Some(ref f), .. } if f == "order_date"
        ));
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped_error = DashError::with_source("Failed to read dataset", io_error);

        assert!(wrapped_error.to_string().contains("Failed to read dataset"));
        assert!(wrapped_error.source().is_some());

        let graph_error = DashError::graph_with_source(
            "Failed to draw histogram",
            io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"),
        );
        assert!(graph_error.to_string().contains("Graph error"));
        assert!(graph_error.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let dash_error: DashError = io_error.into();

        assert!(dash_error.to_string().contains("I/O error"));
        assert!(dash_error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let invalid_json = r#"{"invalid": json}"#;
        let serde_error = serde_json::from_str::<serde_json::Value>(invalid_json).unwrap_err();
        let dash_error: DashError = serde_error.into();

        assert!(dash_error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<Vec<u32>>("[1, two").unwrap_err();
        let dash_error: DashError = yaml_error.into();

        assert!(matches!(dash_error, DashError::Config { .. }));
        assert!(dash_error.source().is_some());
    }

    #[test]
    fn test_csv_error_conversion() {
        let data = "a,b\n1,2\n3\n";
        let mut reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
        let err = reader
            .records()
            .find_map(|r| r.err())
            .expect("ragged row should fail");
        let dash_error: DashError = err.into();

        assert!(matches!(dash_error, DashError::Csv { line: Some(3), .. }));
    }

    #[test]
    fn test_cancelled() {
        assert!(DashError::Cancelled.is_cancelled());
        assert!(!DashError::new("x").is_cancelled());
        assert_eq!(DashError::Cancelled.to_string(), "Render pass cancelled");
    }

    #[test]
    fn test_error_chain_preservation() {
        let root_error = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle_error = DashError::config_with_source("Middle layer", root_error);
        let top_error = DashError::with_source("Top layer", middle_error);

        let mut current_error: &dyn std::error::Error = &top_error;
        let mut error_count = 0;

        while let Some(source) = current_error.source() {
            current_error = source;
            error_count += 1;
        }

        assert_eq!(error_count, 2);
    }
}
