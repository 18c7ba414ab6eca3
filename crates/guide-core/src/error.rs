//! Error Types

use thiserror::Error;

/// Result type alias for guide operations
pub type Result<T> = std::result::Result<T, GuideError>;

/// Guide error types
#[derive(Error, Debug)]
pub enum GuideError {
    /// Backend unreachable or the request could not be sent
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status
    #[error("Backend returned HTTP {0}")]
    Status(u16),

    /// 2xx response whose body lacks a usable `response` field
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Persisted storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
