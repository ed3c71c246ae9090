//! Custom error types for zoter.
//!
//! Every failure in this crate is fatal for the run: nothing here is retried.
//! All functions return `Result<T, ZoterError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for zoter operations.
#[derive(Debug, Error)]
pub enum ZoterError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Zotero API returned a non-success status (bad credentials land here too)
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from API
        message: String,
    },

    /// Response could not be paginated safely
    #[error("Pagination error: {0}")]
    Pagination(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Output would replace the prior report it was built from
    #[error("Refusing to overwrite input report {0:?}; rename it or pass --input_csv")]
    WouldOverwrite(std::path::PathBuf),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Row in the prior collaborator CSV is unusable
    #[error("Malformed CSV row at line {line}: {reason}")]
    MalformedRow {
        /// 1-based line number in the input file
        line: u64,
        /// What was wrong with it
        reason: String,
    },
}

/// Result type alias using `ZoterError`
pub type Result<T> = std::result::Result<T, ZoterError>;
