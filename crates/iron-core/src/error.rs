//! Error types for Iron Creator

use thiserror::Error;

/// The main error type for Iron operations
#[derive(Debug, Error)]
pub enum IronError {
    /// Bad or missing input, or a kind disabled by configuration
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Malformed configuration. Callers recover by falling back to defaults.
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO failure: {0}")]
    IoFailure(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl IronError {
    /// Shorthand for building an `InvalidRequest`
    pub fn invalid(msg: impl Into<String>) -> Self {
        IronError::InvalidRequest(msg.into())
    }
}

/// Result type alias for Iron operations
pub type Result<T> = std::result::Result<T, IronError>;

impl From<serde_json::Error> for IronError {
    fn from(err: serde_json::Error) -> Self {
        IronError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for IronError {
    fn from(err: toml::de::Error) -> Self {
        IronError::ConfigError(err.to_string())
    }
}
