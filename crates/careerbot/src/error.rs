//! Error types for careerbot

use thiserror::Error;

use crate::chat::SessionIdError;
use crate::model::ModelError;

/// Main error type for careerbot operations
#[derive(Error, Debug)]
pub enum CareerBotError {
    /// No usable API key was found in the environment or supplied interactively
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// The remote model call failed (network, quota, malformed response)
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid session identifier
    #[error("Session error: {0}")]
    Session(#[from] SessionIdError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<ModelError> for CareerBotError {
    fn from(e: ModelError) -> Self {
        CareerBotError::ModelUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for CareerBotError {
    fn from(e: serde_json::Error) -> Self {
        CareerBotError::Serialization(e.to_string())
    }
}

/// Result type alias for careerbot operations
pub type Result<T> = std::result::Result<T, CareerBotError>;
