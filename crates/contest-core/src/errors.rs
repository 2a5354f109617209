//! Shared error types

use thiserror::Error;

/// Core errors shared between the engine and command layers
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
