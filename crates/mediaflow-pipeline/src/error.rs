//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Media item not found: {0}")]
    NotFound(String),

    #[error("Media item has no transcript: {0}")]
    MissingTranscript(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] mediaflow_storage::StorageError),

    #[error("Firestore error: {0}")]
    Firestore(#[from] mediaflow_firestore::FirestoreError),

    #[error("Transcription error: {0}")]
    Speech(#[from] mediaflow_speech::SpeechError),

    #[error("Enrichment error: {0}")]
    Enrich(#[from] mediaflow_enrich::EnrichError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn missing_transcript(msg: impl Into<String>) -> Self {
        Self::MissingTranscript(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Caller errors rejected before any pipeline step runs.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            PipelineError::Validation(_)
                | PipelineError::NotFound(_)
                | PipelineError::MissingTranscript(_)
        )
    }
}
