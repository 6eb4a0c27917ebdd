//! Error types for the Nurture query pipeline.
//!
//! This module defines a unified error enum covering every failure category
//! the pipeline distinguishes, plus the serializable error payload that is
//! handed back to callers when a request fails.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the Nurture workspace.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Embedding or vector-search failure
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Language-model call failure
    #[error("Generation error: {0}")]
    Generation(String),

    /// Configuration-related errors (including unreadable corpora)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Classify this error for the caller-facing payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Retrieval(_) => ErrorKind::RetrievalError,
            AppError::Generation(_) => ErrorKind::GenerationError,
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Serialization(_)
            | AppError::Other(_) => ErrorKind::ConfigurationError,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

/// Error taxonomy exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    RetrievalError,
    GenerationError,
    ConfigurationError,
    InvalidInput,
}

/// Uniform error payload returned when a request fails.
///
/// Serializes as `{"kind": "RetrievalError", "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub kind: ErrorKind,

    /// Human-readable failure message
    #[serde(rename = "error")]
    pub message: String,
}

impl ErrorResult {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<AppError> for ErrorResult {
    fn from(err: AppError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            AppError::Retrieval("down".to_string()).kind(),
            ErrorKind::RetrievalError
        );
        assert_eq!(
            AppError::Generation("429".to_string()).kind(),
            ErrorKind::GenerationError
        );
        assert_eq!(
            AppError::Config("missing".to_string()).kind(),
            ErrorKind::ConfigurationError
        );
        assert_eq!(
            AppError::InvalidInput("empty".to_string()).kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_error_result_from_app_error() {
        let result = ErrorResult::from(AppError::Retrieval("index unreachable".to_string()));
        assert_eq!(result.kind, ErrorKind::RetrievalError);
        assert!(result.message.contains("index unreachable"));
    }

    #[test]
    fn test_error_result_serialization() {
        let result = ErrorResult::new(ErrorKind::GenerationError, "no completion");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["kind"], "GenerationError");
        assert_eq!(json["error"], "no completion");
    }
}
