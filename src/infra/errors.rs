// src/infra/errors.rs — Error types for rubric

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RubricError {
    /// Malformed caller input. Fatal: raised before any scoring runs,
    /// never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Infra
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RubricError {
    /// Invalid-input errors are caller bugs; everything else is
    /// environmental.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, RubricError::InvalidInput(_))
    }
}
