//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::charts::ChartStyle;
use crate::dataset::{DatasetResult, DatasetLoader, FileFeedSource, HttpFeedSource, DEFAULT_BASE_URL};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub chart: ChartStyle,
}

/// Where the three feeds are loaded from
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Base URL of the remote feeds
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Local directory holding the feed files; takes precedence over `base_url`
    #[serde(default)]
    pub local_dir: Option<String>,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            local_dir: None,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl DataConfig {
    /// Loader for the configured source
    pub fn loader(&self) -> DatasetResult<DatasetLoader> {
        match &self.local_dir {
            Some(dir) => Ok(DatasetLoader::new(FileFeedSource::new(dir))),
            None => {
                let source = HttpFeedSource::new(
                    &self.base_url,
                    Duration::from_secs(self.fetch_timeout_secs),
                )?;
                Ok(DatasetLoader::new(source))
            }
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_ws_connections")]
    pub max_ws_connections: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

fn default_max_ws_connections() -> usize {
    100
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_ws_connections: default_max_ws_connections(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Directive used when `RUST_LOG` is not set
    pub fn filter_directive(&self) -> String {
        format!("covid_dashboard={},tower_http={}", self.level, self.level)
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("covid-dashboard").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Data overrides
        if let Some(url) = var("COVID_DASHBOARD_BASE_URL") {
            self.data.base_url = url;
        }
        if let Some(dir) = var("COVID_DASHBOARD_DATA_DIR") {
            self.data.local_dir = Some(dir);
        }

        // API overrides
        if let Some(host) = var("COVID_DASHBOARD_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("COVID_DASHBOARD_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!(port = %port, "Ignoring invalid COVID_DASHBOARD_PORT"),
            }
        }

        // Logging overrides
        if let Some(level) = var("COVID_DASHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("COVID_DASHBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# Daily COVID-19 Numbers configuration
#
# Environment variables override these settings:
# - COVID_DASHBOARD_BASE_URL
# - COVID_DASHBOARD_DATA_DIR
# - COVID_DASHBOARD_HOST
# - COVID_DASHBOARD_PORT
# - COVID_DASHBOARD_LOG_LEVEL
# - COVID_DASHBOARD_LOG_FORMAT

[data]
# Where time_series_19-covid-{Confirmed,Deaths,Recovered}.csv live
base_url = "https://raw.githubusercontent.com/bumbeishvili/covid19-daily-data/master"

# Read the feeds from a local directory instead
# local_dir = "./data"

# Timeout for each feed download (seconds)
fetch_timeout_secs = 30

[api]
host = "0.0.0.0"
port = 8050

# Maximum concurrent WebSocket dashboards
max_ws_connections = 100

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

[chart]
background = "#4E5D6C"
font_color = "#fff"

[chart.colors]
confirmed = "#f0ad4e"
deaths = "#d9534f"
recovered = "#5cb85c"

[chart.geo]
# natural earth, equirectangular, mercator, orthographic, robinson
projection = "natural earth"
country_color = "#868e96"
coastline_color = "#868e96"

[chart.transition]
duration_ms = 500
easing = "cubic-in-out"
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::Projection;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data.base_url, DEFAULT_BASE_URL);
        assert!(config.data.local_dir.is_none());
        assert_eq!(config.api.addr(), "0.0.0.0:8050");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.chart, ChartStyle::default());
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8050);
        assert_eq!(config.chart.geo.projection, Projection::NaturalEarth);
        assert_eq!(config.chart, ChartStyle::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[data]\nlocal_dir = \"/srv/feeds\"\n\n[api]\nport = 9000\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data.local_dir.as_deref(), Some("/srv/feeds"));
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Config::load(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[api\nport = ").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("COVID_DASHBOARD_DATA_DIR", "./feeds"),
            ("COVID_DASHBOARD_PORT", "8123"),
            ("COVID_DASHBOARD_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.data.local_dir.as_deref(), Some("./feeds"));
        assert_eq!(config.api.port, 8123);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| (k == "COVID_DASHBOARD_PORT").then(|| "lots".to_string()));
        assert_eq!(config.api.port, 8050);
    }
}
