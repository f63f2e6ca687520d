//! Custom error types for rustdblp.
//!
//! Every failure class gets its own variant so callers *can* tell an
//! unavailable upstream from a malformed body, even though the search
//! pipeline deliberately collapses all of them to "no results".

use thiserror::Error;

/// Main error type for rustdblp operations.
#[derive(Debug, Error)]
pub enum DblpError {
    /// Network/HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream returned a non-success HTTP status
    #[error("Upstream error: {code} - {message}")]
    Upstream {
        /// HTTP status code from the upstream service
        code: i32,
        /// Status line / diagnostic message
        message: String,
    },

    /// Upstream body was not valid JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// HTML parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Bibliography file could not be parsed
    #[error("Bibliography error: {0}")]
    Bibliography(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using `DblpError`
pub type Result<T> = std::result::Result<T, DblpError>;
