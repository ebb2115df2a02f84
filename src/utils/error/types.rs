//! Error types for coursedesk

use crate::core::types::BatchStatus;
use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, DeskError>;

/// Main error type
#[derive(Error, Debug)]
pub enum DeskError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport level failures (connection refused, timeouts, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// A response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// A successful response had an envelope we do not recognize
    #[error("Unrecognized response shape: {0}")]
    Shape(String),

    /// Client-side validation failure, raised before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Status change that is not an edge of the transition table
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: BatchStatus,
        /// Requested status
        to: BatchStatus,
    },

    /// A mutation for this batch id is still outstanding
    #[error("A change to batch {0} is already in progress")]
    MutationInFlight(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// The owning board has been unmounted
    #[error("Batch board is closed")]
    Closed,

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
