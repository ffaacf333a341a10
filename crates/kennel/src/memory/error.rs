use thiserror::Error;

/// Errors returned by memory service calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    /// The addressed user or thread does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service answered with a non-success status
    #[error("Memory service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Connection, timeout, or other transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing credential or invalid client setup
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MemoryError::NotFound(_))
    }
}

impl From<reqwest::Error> for MemoryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            MemoryError::Parse(e.to_string())
        } else if e.is_timeout() {
            MemoryError::Network(format!("Request timed out: {e}"))
        } else if e.is_connect() {
            MemoryError::Network(format!("Failed to connect to memory service: {e}"))
        } else {
            MemoryError::Network(format!("Request failed: {e}"))
        }
    }
}

/// Result type alias for memory service operations
pub type Result<T> = std::result::Result<T, MemoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(MemoryError::NotFound("user u1".to_string()).is_not_found());
        assert!(
            !MemoryError::Api {
                status: 500,
                message: "boom".to_string()
            }
            .is_not_found()
        );
    }

    #[test]
    fn test_display() {
        let err = MemoryError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Memory service returned 503: unavailable");
    }
}
