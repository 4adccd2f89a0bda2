//! Processing context: the constructed clients the pipeline runs against.

use mediaflow_enrich::LlmClient;
use mediaflow_firestore::FirestoreClient;
use mediaflow_speech::TranscriptionClient;
use mediaflow_storage::StorageClient;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;

/// Shared clients and configuration for pipeline runs.
pub struct ProcessingContext {
    pub config: PipelineConfig,
    pub storage: StorageClient,
    pub firestore: FirestoreClient,
    pub speech: TranscriptionClient,
    pub llm: LlmClient,
}

impl ProcessingContext {
    /// Create a new processing context with clients built from the
    /// environment.
    pub async fn new(config: PipelineConfig) -> PipelineResult<Self> {
        let storage = StorageClient::from_env().await?;
        let firestore = FirestoreClient::from_env().await?;
        let speech = TranscriptionClient::from_env()?;
        let llm = LlmClient::from_env()?;

        Ok(Self {
            config,
            storage,
            firestore,
            speech,
            llm,
        })
    }
}
