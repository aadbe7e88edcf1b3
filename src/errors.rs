use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the content, storage, and configuration layers.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Content error: {0}")]
    ContentError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, SimulatorError>;

impl From<std::io::Error> for SimulatorError {
    fn from(err: std::io::Error) -> Self {
        SimulatorError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for SimulatorError {
    fn from(err: serde_json::Error) -> Self {
        SimulatorError::ContentError(err.to_string())
    }
}
