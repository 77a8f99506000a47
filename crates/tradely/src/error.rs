//! Error types for Tradely client operations

use thiserror::Error;

/// Tradely client errors
#[derive(Debug, Error)]
pub enum TradelyError {
    /// Backend answered with a failure status or an unusable body
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Filesystem error while saving an artifact
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed backend URL
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No async runtime available to schedule timers on
    #[error("Runtime error: {0}")]
    RuntimeError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Tradely operations
pub type Result<T> = std::result::Result<T, TradelyError>;
