//! Error types for the cycle_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cycle_core operations
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

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cycle parameters rejected at the input boundary
    #[error("Invalid cycle configuration: {0}")]
    InvalidConfiguration(String),

    /// A date string that is not a valid `YYYY-MM-DD` calendar day
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Store state error (e.g. a poisoned writer lock)
    #[error("State error: {0}")]
    State(String),

    /// Export requested with no period days and no symptom logs
    #[error("No data to export")]
    NothingToExport,

    /// Generic error
    #[error("{0}")]
    Other(String),
}
