//! Error types for the fetch-extract-analyze pipeline
//!
//! Every failure a caller of the pipeline can observe is one of these variants.
//! Unparseable model replies are deliberately absent: they are absorbed into a
//! fallback `AnalysisRecord` by the response validator.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Error types for pipeline operations
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Browser binary could not be resolved or the process failed to start
    #[error("Failed to create browser session: {0}")]
    SessionCreation(String),

    /// Navigation, DOM access or screenshot capture failed
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Network, auth or rate-limit failure on the analysis model call
    #[error("Model call failed: {0}")]
    ModelCall(String),

    /// Screenshot/image source missing or empty
    #[error("Image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// Caller supplied an unusable argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing credential or malformed configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MonitorError {
    /// Build a fetch error for `url` from any displayable cause
    pub fn fetch(url: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: cause.to_string(),
        }
    }

    /// Whether this error belongs to the model-call class
    #[must_use]
    pub fn is_model_call(&self) -> bool {
        matches!(self, Self::ModelCall(_))
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(error: reqwest::Error) -> Self {
        Self::ModelCall(error.to_string())
    }
}
