//! Enrichment error types.

use thiserror::Error;

/// Result type for enrichment operations.
pub type EnrichResult<T> = Result<T, EnrichError>;

/// Errors that can occur during enrichment.
///
/// Metadata extraction and action-plan generation absorb all of these
/// into fallbacks; illustration rendering surfaces them, because there
/// is no deterministic fallback image.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Language model call failed: {0}")]
    LlmFailed(String),

    #[error("Illustration rendering failed: {0}")]
    IllustrationFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EnrichError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn llm_failed(msg: impl Into<String>) -> Self {
        Self::LlmFailed(msg.into())
    }

    pub fn illustration_failed(msg: impl Into<String>) -> Self {
        Self::IllustrationFailed(msg.into())
    }
}
