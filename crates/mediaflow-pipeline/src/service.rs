//! Media service: creation, processing orchestration and derived features.
//!
//! The processing state machine is `pending → processing → {ready | error}`.
//! Duration probing and upload run synchronously as part of creation and a
//! failure there aborts creation with no persisted record; everything after
//! the `processing` transition is converted into a persisted `error` status
//! rather than thrown past the top level.

use std::path::Path;

use tracing::{info, warn};

use mediaflow_firestore::{
    MediaItemRepository, SummaryRepository, TagRepository, TranscriptRepository,
};
use mediaflow_media::probe_duration;
use mediaflow_models::{
    ActionPlan, CreatedMediaItem, Illustration, MediaItem, MediaItemDetail, MediaItemId,
    MediaItemSummary, MediaStatistics, MediaStatus, Summary, TagId, Transcript,
};
use mediaflow_speech::SpeechError;

use crate::context::ProcessingContext;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::ItemLogger;
use crate::validate::validate_upload;

/// Media pipeline service.
pub struct MediaService {
    ctx: ProcessingContext,
}

impl MediaService {
    /// Create a new service over a processing context.
    pub fn new(ctx: ProcessingContext) -> Self {
        Self { ctx }
    }

    fn items(&self, owner_id: &str) -> MediaItemRepository {
        MediaItemRepository::new(self.ctx.firestore.clone(), owner_id)
    }

    fn tags(&self) -> TagRepository {
        TagRepository::new(self.ctx.firestore.clone())
    }

    fn transcripts(&self) -> TranscriptRepository {
        TranscriptRepository::new(self.ctx.firestore.clone())
    }

    fn summaries(&self) -> SummaryRepository {
        SummaryRepository::new(self.ctx.firestore.clone())
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a media item from a local file.
    ///
    /// Validates the upload, probes its duration, transfers it to object
    /// storage and persists the `pending` record. These steps are
    /// synchronous parts of creation: if any of them fails, no record is
    /// persisted and the caller sees the error. An already-uploaded
    /// object is deleted best-effort when the record cannot be created.
    pub async fn create_media_item(
        &self,
        local_path: impl AsRef<Path>,
        description: Option<String>,
        owner_id: &str,
    ) -> PipelineResult<CreatedMediaItem> {
        let local_path = local_path.as_ref();

        let upload_info =
            validate_upload(local_path, self.ctx.config.max_upload_bytes).await?;

        let duration_seconds = probe_duration(local_path).await;

        let uploaded = match self
            .ctx
            .storage
            .upload_media(local_path, upload_info.content_type)
            .await
        {
            Ok(uploaded) => uploaded,
            Err(e) => {
                // The local temp file survives a failed upload
                cleanup_local_file(local_path).await;
                return Err(e.into());
            }
        };

        let item = MediaItem::new(
            MediaItemId::new(),
            owner_id,
            uploaded.url.clone(),
            description.clone(),
            duration_seconds,
        );

        if let Err(e) = self.items(owner_id).create(&item).await {
            // Creation failed after upload: remove the orphaned remote
            // object best-effort and report the failure
            if let Err(delete_err) = self.ctx.storage.delete_object(&uploaded.key).await {
                warn!(
                    "Could not delete orphaned object {}: {}",
                    uploaded.key, delete_err
                );
            }
            return Err(e.into());
        }

        info!(
            "Created media item {} for owner {} ({}s, {})",
            item.id, owner_id, duration_seconds, uploaded.url
        );

        Ok(CreatedMediaItem {
            id: item.id,
            remote_url: uploaded.url,
            description,
            duration_seconds,
            owner_id: owner_id.to_string(),
        })
    }

    // =========================================================================
    // Processing
    // =========================================================================

    /// Drive a media item through transcription and enrichment.
    ///
    /// Safe to re-invoke on an item already in `error`: transcript and
    /// summary writes are upserts keyed by the item ID, so a retry never
    /// duplicates records. Errors after the `processing` transition are
    /// persisted as the `error` status and not raised.
    pub async fn process_media_item(
        &self,
        owner_id: &str,
        id: &MediaItemId,
    ) -> PipelineResult<()> {
        let repo = self.items(owner_id);
        let item = repo
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::not_found(id.to_string()))?;

        let logger = ItemLogger::new(id, "process_media_item");
        logger.log_start("processing media item");

        // Persisted before any remote call so concurrent readers observe
        // the in-flight state
        repo.update_status(id, MediaStatus::Processing).await?;

        match self.run_processing_steps(&repo, &item, &logger).await {
            Ok(()) => {
                logger.log_completion("media item is ready");
            }
            Err(e) => {
                logger.log_error(&format!("processing failed: {}", e));
                if let Err(persist_err) = repo.mark_error(id, &e.to_string()).await {
                    logger.log_error(&format!(
                        "could not persist error status: {}",
                        persist_err
                    ));
                }
            }
        }

        Ok(())
    }

    /// The steps between `processing` and the final write.
    async fn run_processing_steps(
        &self,
        repo: &MediaItemRepository,
        item: &MediaItem,
        logger: &ItemLogger,
    ) -> PipelineResult<()> {
        logger.log_progress("transcribing");
        let text = self.ctx.speech.transcribe(&item.remote_url).await?;

        if text.trim().is_empty() {
            return Err(SpeechError::transcription_failed("transcript text is empty").into());
        }

        logger.log_progress("extracting metadata");
        let enrichment = self.ctx.llm.extract_metadata(&text).await;

        let tag_repo = self.tags();
        let mut tag_ids: Vec<TagId> = Vec::with_capacity(enrichment.tags.len());
        for name in &enrichment.tags {
            tag_ids.push(tag_repo.upsert(name).await?);
        }

        self.transcripts()
            .upsert(&Transcript::new(item.id.clone(), text))
            .await?;
        self.summaries()
            .upsert(&Summary::new(item.id.clone(), enrichment.summary.clone()))
            .await?;

        // Title, mood, tags, references and the ready status land in one
        // write
        repo.finalize_ready(&item.id, &enrichment.title, enrichment.mood, &tag_ids)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get a media item with its tags, transcript and summary resolved.
    pub async fn get_media_item(
        &self,
        owner_id: &str,
        id: &MediaItemId,
    ) -> PipelineResult<MediaItemDetail> {
        let item = self
            .items(owner_id)
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::not_found(id.to_string()))?;

        let tag_names = self.tags().names_for(&item.tag_ids).await?;

        let transcript_text = match &item.transcript_ref {
            Some(_) => self.transcripts().get(id).await?.map(|t| t.text),
            None => None,
        };
        let summary_text = match &item.summary_ref {
            Some(_) => self.summaries().get(id).await?.map(|s| s.summary_text),
            None => None,
        };

        Ok(MediaItemDetail {
            item,
            tag_names,
            transcript_text,
            summary_text,
        })
    }

    /// List the owner's media items, newest first.
    pub async fn list_media_items(
        &self,
        owner_id: &str,
    ) -> PipelineResult<Vec<MediaItemSummary>> {
        let items = self.items(owner_id).list().await?;
        let tag_repo = self.tags();

        let mut summaries = Vec::with_capacity(items.len());
        for item in items {
            let tag_names = tag_repo.names_for(&item.tag_ids).await?;
            summaries.push(MediaItemSummary {
                id: item.id,
                title: item.title,
                description: item.description,
                status: item.status,
                tag_names,
                created_at: item.created_at,
            });
        }

        Ok(summaries)
    }

    /// Per-owner upload counters.
    pub async fn media_statistics(&self, owner_id: &str) -> PipelineResult<MediaStatistics> {
        Ok(self.items(owner_id).statistics().await?)
    }

    /// Delete a media item record.
    ///
    /// Owner-scoped: deleting another user's item reports not-found. The
    /// delete does not stop an in-flight pipeline for the same item.
    pub async fn delete_media_item(
        &self,
        owner_id: &str,
        id: &MediaItemId,
    ) -> PipelineResult<()> {
        let repo = self.items(owner_id);
        repo.get(id)
            .await?
            .ok_or_else(|| PipelineError::not_found(id.to_string()))?;

        repo.delete(id).await?;
        info!("Deleted media item {} for owner {}", id, owner_id);
        Ok(())
    }

    // =========================================================================
    // Derived features
    // =========================================================================

    /// Generate an action plan from the item's transcript.
    ///
    /// Precondition: the item must already have a non-empty transcript.
    pub async fn generate_action_items(
        &self,
        owner_id: &str,
        id: &MediaItemId,
    ) -> PipelineResult<ActionPlan> {
        let text = self.transcript_text(owner_id, id).await?;
        Ok(self.ctx.llm.generate_action_items(&text).await)
    }

    /// Render an illustration from the item's transcript.
    ///
    /// Same precondition as [`Self::generate_action_items`]; rendering
    /// failures surface as an enrichment error rather than defaulting.
    pub async fn generate_illustration(
        &self,
        owner_id: &str,
        id: &MediaItemId,
    ) -> PipelineResult<Illustration> {
        let text = self.transcript_text(owner_id, id).await?;
        Ok(self.ctx.llm.generate_illustration(&text).await?)
    }

    /// Non-empty transcript text for an owned item, or a precondition
    /// error.
    async fn transcript_text(
        &self,
        owner_id: &str,
        id: &MediaItemId,
    ) -> PipelineResult<String> {
        let item = self
            .items(owner_id)
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::not_found(id.to_string()))?;

        if item.transcript_ref.is_none() {
            return Err(PipelineError::missing_transcript(id.to_string()));
        }

        let transcript = self
            .transcripts()
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::missing_transcript(id.to_string()))?;

        if transcript.text.trim().is_empty() {
            return Err(PipelineError::missing_transcript(id.to_string()));
        }

        Ok(transcript.text)
    }
}

/// Remove a leftover local temp file, logging failures.
async fn cleanup_local_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Could not delete local file {}: {}", path.display(), e);
    }
}
