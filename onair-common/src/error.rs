//! Common error types for onair

use thiserror::Error;

/// Common result type for onair operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across onair crates
#[derive(Error, Debug)]
pub enum Error {
    /// Backend data service rejected the request or answered with a non-2xx status
    #[error("Backend error: {0}")]
    Backend(String),

    /// Transport-level HTTP failure (wraps reqwest::Error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed payload or time string
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
