use thiserror::Error;

/// Error type shared by the reader, configuration and validation layers.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

impl From<std::io::Error> for AnalyticsError {
    fn from(err: std::io::Error) -> Self {
        AnalyticsError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        AnalyticsError::Storage(err.to_string())
    }
}
