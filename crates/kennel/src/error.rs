//! Error types for Kennel

use thiserror::Error;

/// Main error type for Kennel operations
#[derive(Error, Debug)]
pub enum KennelError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// Agent bridge setup errors
    #[error("Agent error: {0}")]
    Agent(String),
}

/// Result type alias for Kennel operations
pub type Result<T> = std::result::Result<T, KennelError>;
