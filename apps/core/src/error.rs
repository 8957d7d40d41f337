use std::io;
use thiserror::Error;

use crate::actors::messages::ActorError;

/// Crate-wide error type, consolidating every fallible path into a single enum.
///
/// Extraction and partitioning never fail; these variants cover configuration,
/// transcript loading, membership requests and the coordinator actor.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors (e.g. reading a transcript file).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents errors from the breakout coordinator actor.
    #[error("Actor error: {0}")]
    Actor(#[from] ActorError),

    /// Represents data validation errors (e.g. malformed transcript, bad config values).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g. unparsable environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// A membership change referenced a room that is not part of the current partition.
    #[error("Unknown breakout room: {0}")]
    UnknownRoom(String),
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}
