//! Error types for cvesieve

use thiserror::Error;

/// Result type alias using the cvesieve Error
pub type Result<T> = std::result::Result<T, Error>;

/// cvesieve error types
#[derive(Error, Debug)]
pub enum Error {
    // === Feed Errors ===
    #[error("Feed download failed: {0}")]
    FeedDownload(String),

    #[error("Feed archive error: {0}")]
    FeedArchive(String),

    #[error("Feed archive for {year} contains no JSON member")]
    EmptyArchive { year: u16 },

    // === Extraction Errors ===
    #[error("Configuration tree exceeds maximum nesting depth of {max}")]
    ExcessiveNesting { max: usize },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing required configuration: {key}")]
    MissingConfig { key: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    // === Generic ===
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Check if this error is fatal (the run should not start/continue)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Configuration(_) | Error::MissingConfig { .. } | Error::InvalidConfig { .. }
        )
    }

    /// Check if this error is scoped to a single vulnerability record.
    ///
    /// Record-scoped errors abort processing of that one record; the
    /// enclosing per-year batch continues with the next record.
    pub fn is_record_scoped(&self) -> bool {
        matches!(self, Error::ExcessiveNesting { .. })
    }

    /// Check if this error is scoped to a single feed year.
    pub fn is_year_scoped(&self) -> bool {
        matches!(
            self,
            Error::FeedDownload(_) | Error::FeedArchive(_) | Error::EmptyArchive { .. }
        )
    }

    /// Get an error code for logging/metrics
    pub fn code(&self) -> &'static str {
        match self {
            Error::FeedDownload(_) => "FEED_DOWNLOAD_FAILED",
            Error::FeedArchive(_) => "FEED_ARCHIVE_ERROR",
            Error::EmptyArchive { .. } => "FEED_ARCHIVE_EMPTY",
            Error::ExcessiveNesting { .. } => "EXCESSIVE_NESTING",
            Error::Configuration(_) => "CONFIG_ERROR",
            Error::MissingConfig { .. } => "MISSING_CONFIG",
            Error::InvalidConfig { .. } => "INVALID_CONFIG",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Csv(_) => "CSV_ERROR",
            Error::Parse(_) => "PARSE_ERROR",
            Error::Other(_) => "OTHER",
        }
    }
}
