//! cvesieve Common - Shared utilities: logging and configuration
//!
//! This crate provides common functionality used across all cvesieve crates.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigBuilder, ExportConfig, FeedConfig, LoggingConfig};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogFormat};
