//! Configuration management for the cvesieve exporter

use cvesieve_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Feed download settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Merge with environment variables (CVESIEVE_ prefix)
    pub fn merge_env(mut self) -> Self {
        // Feed settings
        if let Ok(val) = std::env::var("CVESIEVE_FEED_URL") {
            self.feed.url_template = val;
        }
        if let Ok(val) = std::env::var("CVESIEVE_FEED_TIMEOUT_SECONDS") {
            if let Ok(n) = val.parse() {
                self.feed.timeout_seconds = n;
            }
        }

        // Export settings
        if let Ok(val) = std::env::var("CVESIEVE_OUTPUT") {
            self.export.output_path = val;
        }
        if let Ok(val) = std::env::var("CVESIEVE_TARGET_PRODUCTS") {
            self.export.target_products = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(val) = std::env::var("CVESIEVE_START_YEAR") {
            if let Ok(n) = val.parse() {
                self.export.start_year = n;
            }
        }
        if let Ok(val) = std::env::var("CVESIEVE_END_YEAR") {
            if let Ok(n) = val.parse() {
                self.export.end_year = Some(n);
            }
        }

        // Logging
        if let Ok(val) = std::env::var("CVESIEVE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("CVESIEVE_LOG_FORMAT") {
            self.logging.format = val;
        }

        self
    }

    /// Validate settings that would make the run unable to start
    pub fn validate(&self) -> Result<()> {
        if self.export.target_products.is_empty() {
            return Err(Error::MissingConfig {
                key: String::from("export.target_products"),
            });
        }
        if let Some(end) = self.export.end_year {
            if end < self.export.start_year {
                return Err(Error::InvalidConfig {
                    key: String::from("export.end_year"),
                    message: format!(
                        "end year {} precedes start year {}",
                        end, self.export.start_year
                    ),
                });
            }
        }
        if !self.feed.url_template.contains("{year}") {
            return Err(Error::InvalidConfig {
                key: String::from("feed.url_template"),
                message: String::from("template must contain a {year} placeholder"),
            });
        }
        Ok(())
    }
}

/// Feed download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Yearly archive URL template; `{year}` is substituted per year
    #[serde(default = "default_url_template")]
    pub url_template: String,

    /// Request timeout in seconds
    #[serde(default = "default_feed_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with feed requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_url_template() -> String {
    String::from("https://nvd.nist.gov/feeds/json/cve/2.0/nvdcve-2.0-{year}.json.zip")
}

fn default_feed_timeout() -> u64 {
    60
}

fn default_user_agent() -> String {
    format!("cvesieve/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            timeout_seconds: default_feed_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output CSV path
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Product name fragments to keep (case-insensitive substring match)
    #[serde(default = "default_targets")]
    pub target_products: Vec<String>,

    /// First feed year to process
    #[serde(default = "default_start_year")]
    pub start_year: u16,

    /// Last feed year to process (defaults to the current year)
    pub end_year: Option<u16>,
}

fn default_output_path() -> String {
    String::from("mysql_mariadb_cve_full.csv")
}

fn default_targets() -> Vec<String> {
    vec![String::from("mysql"), String::from("mariadb")]
}

fn default_start_year() -> u16 {
    2020
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            target_products: default_targets(),
            start_year: default_start_year(),
            end_year: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("pretty")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Builder for constructing Config
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn output_path(mut self, path: impl Into<String>) -> Self {
        self.config.export.output_path = path.into();
        self
    }

    pub fn target_products(mut self, targets: Vec<String>) -> Self {
        self.config.export.target_products = targets;
        self
    }

    pub fn start_year(mut self, year: u16) -> Self {
        self.config.export.start_year = year;
        self
    }

    pub fn end_year(mut self, year: u16) -> Self {
        self.config.export.end_year = Some(year);
        self
    }

    pub fn feed_url(mut self, template: impl Into<String>) -> Self {
        self.config.feed.url_template = template.into();
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
