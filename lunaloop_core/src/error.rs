//! Error types for the lunaloop_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lunaloop_core operations
///
/// Engine read paths never produce these; they surface only at the
/// boundaries (user input, config files, exports, external insight sources).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A date string that is not `YYYY-MM-DD`
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Settings update rejected at the boundary
    #[error("Settings error: {0}")]
    Settings(String),

    /// External insight source failure
    #[error("Insight error: {0}")]
    Insight(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
