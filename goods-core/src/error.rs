//! Error types for the product search service

use thiserror::Error;

/// Workspace-wide error type
#[derive(Error, Debug)]
pub enum GoodsError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GoodsError {
    pub fn api(msg: impl Into<String>) -> Self {
        GoodsError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        GoodsError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        GoodsError::Parse(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        GoodsError::Internal(msg.into())
    }
}

/// Result type alias for workspace operations
pub type GoodsResult<T> = Result<T, GoodsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(GoodsError::api("timeout").to_string(), "API error: timeout");
        assert_eq!(
            GoodsError::Config("TOP_K must be a number".to_string()).to_string(),
            "Configuration error: TOP_K must be a number"
        );
    }
}
