//! Configuration management for the airport atlas
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AtlasError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the airport atlas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Reference dataset configuration
    #[serde(default)]
    pub data: DataConfig,
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory holding the built front-end, served as fallback
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Reference dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory containing airports.csv, countries.csv and regions.csv
    #[serde(default = "default_data_directory")]
    pub directory: String,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Retries for transient failures (0 disables retrying)
    #[serde(default)]
    pub max_retries: u32,
}

/// Search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Result limit when the caller does not give one
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
    /// Largest limit a caller may ask for
    #[serde(default = "default_search_max_limit")]
    pub max_limit: usize,
    /// Shortest query accepted at the HTTP surface
    #[serde(default = "default_min_query_length")]
    pub min_query_length: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_data_directory() -> String {
    "data".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_search_limit() -> usize {
    50
}

fn default_search_max_limit() -> usize {
    500
}

fn default_min_query_length() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: default_data_directory(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            max_retries: 0,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            max_limit: default_search_max_limit(),
            min_query_length: default_min_query_length(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AtlasConfig {
    /// Load configuration from the file named by `ATLAS_CONFIG` (or the default location)
    /// and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(std::env::var_os("ATLAS_CONFIG").map(PathBuf::from))
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // ATLAS_SERVER__PORT=8080 overrides server.port
        builder = builder.add_source(
            Environment::with_prefix("ATLAS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AtlasConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("airport-atlas").join("config.toml"))
    }

    /// Apply default values to fields left empty
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.data.directory.is_empty() {
            self.data.directory = default_data_directory();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.search.default_limit == 0 {
            self.search.default_limit = default_search_limit();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AtlasError::config("Server port cannot be 0").into());
        }

        if self.weather.timeout_seconds > 300 {
            return Err(
                AtlasError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.weather.max_retries > 10 {
            return Err(AtlasError::config("Weather API max retries cannot exceed 10").into());
        }

        if self.search.default_limit > self.search.max_limit {
            return Err(AtlasError::config(format!(
                "Default search limit {} exceeds the maximum of {}",
                self.search.default_limit, self.search.max_limit
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AtlasError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AtlasError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(AtlasError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }

    /// Socket address string for the HTTP server
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AtlasConfig::default();
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.weather.max_retries, 0);
        assert_eq!(config.search.default_limit, 50);
        assert_eq!(config.search.min_query_length, 2);
        assert_eq!(config.data.directory, "data");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AtlasConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AtlasConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = AtlasConfig::default();
        config.search.default_limit = 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = AtlasConfig::default();
        config.weather.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = AtlasConfig::default();
        config.data.directory.clear();
        config.weather.timeout_seconds = 0;
        config.apply_defaults();
        assert_eq!(config.data.directory, "data");
        assert_eq!(config.weather.timeout_seconds, 30);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[server]\nport = 8088\n\n[data]\ndirectory = \"/srv/atlas\"\n\n[search]\ndefault_limit = 20"
        )
        .unwrap();

        let config = AtlasConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.data.directory, "/srv/atlas");
        assert_eq!(config.search.default_limit, 20);
        // untouched sections keep their defaults
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.bind_address(), "0.0.0.0:8088");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AtlasConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("airport-atlas"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
