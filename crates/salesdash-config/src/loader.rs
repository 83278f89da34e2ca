//! Configuration loading utilities

use crate::schema::{Config, OutputFormat};
use crate::validator::ConfigValidator;
use salesdash_common::{DashError, Result as DashResult};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "SALESDASH_CONFIG_PATH";

/// Files probed, in order, when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["salesdash.yaml", "salesdash.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// What was wrong with the value
        message: String,
    },

    /// Configuration validation error
    #[error(transparent)]
    Invalid(#[from] DashError),
}

impl From<ConfigError> for DashError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(inner) => inner,
            other => DashError::config_with_source("Configuration loading failed", other),
        }
    }
}

/// Configuration loader for the application
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader reading a specific file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Loader resolving the file from `SALESDASH_CONFIG_PATH` or the default names.
    pub fn from_env() -> Self {
        let path = env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from).or_else(|| {
            DEFAULT_CONFIG_FILES
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
        });
        Self { path }
    }

    /// The file this loader reads, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads, applies environment overrides and validates.
    pub fn load(&self) -> DashResult<Config> {
        Ok(self.load_with(|key| env::var(key).ok())?)
    }

    /// Same as [`ConfigLoader::load`] with an injectable variable lookup.
    pub fn load_with<F>(&self, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.path {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration file");
                Self::parse_file(path)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Config::default()
            }
        };

        Self::apply_overrides(&mut config, lookup)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Parses a YAML file without overrides or validation.
    pub fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parses YAML text without overrides or validation.
    pub fn parse_str(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup("SALESDASH_DATA_SOURCE") {
            config.data.source = source;
        }

        if let Some(dir) = lookup("SALESDASH_OUTPUT_DIR") {
            config.output.directory = dir;
        }

        if let Some(width) = lookup("SALESDASH_WIDTH") {
            config.layout.width = width.trim().parse().map_err(|e| ConfigError::EnvParseError {
                var: "SALESDASH_WIDTH".to_string(),
                message: format!("{e}"),
            })?;
        }

        if let Some(format) = lookup("SALESDASH_OUTPUT_FORMAT") {
            config.output.format = match format.trim().to_ascii_lowercase().as_str() {
                "png" => OutputFormat::Png,
                "svg" => OutputFormat::Svg,
                other => {
                    return Err(ConfigError::EnvParseError {
                        var: "SALESDASH_OUTPUT_FORMAT".to_string(),
                        message: format!("unknown format '{other}', expected png or svg"),
                    })
                }
            };
        }

        if let Some(level) = lookup("SALESDASH_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RowPolicy;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ConfigLoader::parse_str(
            "data:\n  source: orders.csv\n  row_policy: propagate\nhistogram:\n  bins: 12\n",
        )
        .unwrap();
        assert_eq!(config.data.source, "orders.csv");
        assert_eq!(config.data.row_policy, RowPolicy::Propagate);
        assert_eq!(config.histogram.bins, 12);
        assert_eq!(config.histogram.x_ticks, 8);
        assert_eq!(config.layout.margins.left, 60);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ConfigLoader::parse_str("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_file_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "layout:\n  width: 800\noutput:\n  directory: out").unwrap();

        let vars: HashMap<&str, &str> = [
            ("SALESDASH_WIDTH", "1200"),
            ("SALESDASH_OUTPUT_FORMAT", "SVG"),
            ("SALESDASH_DATA_SOURCE", "https://example.com/orders.csv"),
        ]
        .into_iter()
        .collect();

        let config = ConfigLoader::new(file.path())
            .load_with(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.layout.width, 1200);
        assert_eq!(config.output.format, OutputFormat::Svg);
        assert_eq!(config.output.directory, "out");
        assert_eq!(config.data.source, "https://example.com/orders.csv");
    }

    #[test]
    fn test_bad_env_value() {
        let err = ConfigLoader::default()
            .load_with(|key| (key == "SALESDASH_WIDTH").then(|| "wide".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvParseError { ref var, .. } if var == "SALESDASH_WIDTH"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "histogram:\n  bins: 0").unwrap();

        let err = ConfigLoader::new(file.path()).load_with(no_env).unwrap_err();
        let err: DashError = err.into();
        assert!(matches!(err, DashError::Validation { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::new("/definitely/not/here.yaml")
            .load_with(no_env)
            .unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
