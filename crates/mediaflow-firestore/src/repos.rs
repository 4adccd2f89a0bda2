//! Typed repositories for media items, tags, transcripts and summaries.

use std::collections::HashMap;

use chrono::{Duration, NaiveTime, Utc};
use tracing::{debug, info};

use mediaflow_models::{
    MediaItem, MediaItemId, MediaStatistics, MediaStatus, Mood, Summary, Tag, TagId, Transcript,
};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, DocumentMask, ToFirestoreValue, Value};

/// Repository for a user's media item documents.
pub struct MediaItemRepository {
    client: FirestoreClient,
    owner_id: String,
}

impl MediaItemRepository {
    /// Create a new media item repository scoped to one owner.
    pub fn new(client: FirestoreClient, owner_id: impl Into<String>) -> Self {
        Self {
            client,
            owner_id: owner_id.into(),
        }
    }

    /// Collection path for the owner's media items.
    fn collection(&self) -> String {
        format!("users/{}/media", self.owner_id)
    }

    /// Get a media item by ID.
    pub async fn get(&self, id: &MediaItemId) -> FirestoreResult<Option<MediaItem>> {
        let doc = self.client.get_document(&self.collection(), id.as_str()).await?;

        match doc {
            Some(d) => Ok(Some(document_to_media_item(&d, id, &self.owner_id)?)),
            None => Ok(None),
        }
    }

    /// Create a new media item record.
    pub async fn create(&self, item: &MediaItem) -> FirestoreResult<()> {
        let fields = media_item_to_fields(item);
        self.client
            .create_document(&self.collection(), item.id.as_str(), fields)
            .await?;
        info!("Created media item record: {}", item.id);
        Ok(())
    }

    /// List the owner's media items, newest first.
    pub async fn list(&self) -> FirestoreResult<Vec<MediaItem>> {
        let docs = self.client.list_documents(&self.collection()).await?;

        let mut items = Vec::with_capacity(docs.len());
        for doc in &docs {
            let id = doc
                .doc_id()
                .map(MediaItemId::from)
                .ok_or_else(|| FirestoreError::invalid_response("document without a name"))?;
            items.push(document_to_media_item(doc, &id, &self.owner_id)?);
        }

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    /// Update item status. Persisted immediately so concurrent readers
    /// observe the in-flight state.
    pub async fn update_status(
        &self,
        id: &MediaItemId,
        status: MediaStatus,
    ) -> FirestoreResult<()> {
        let mut fields = HashMap::new();
        fields.insert("status".to_string(), status.as_str().to_firestore_value());
        fields.insert("updated_at".to_string(), Utc::now().to_firestore_value());

        self.client
            .update_document(
                &self.collection(),
                id.as_str(),
                fields,
                Some(vec!["status".to_string(), "updated_at".to_string()]),
            )
            .await?;
        Ok(())
    }

    /// Mark an item failed, keeping the error detail.
    pub async fn mark_error(&self, id: &MediaItemId, message: &str) -> FirestoreResult<()> {
        let mut fields = HashMap::new();
        fields.insert(
            "status".to_string(),
            MediaStatus::Error.as_str().to_firestore_value(),
        );
        fields.insert("error_message".to_string(), message.to_firestore_value());
        fields.insert("updated_at".to_string(), Utc::now().to_firestore_value());

        self.client
            .update_document(
                &self.collection(),
                id.as_str(),
                fields,
                Some(vec![
                    "status".to_string(),
                    "error_message".to_string(),
                    "updated_at".to_string(),
                ]),
            )
            .await?;
        Ok(())
    }

    /// Final write of a successful pipeline run: title, mood, tags,
    /// transcript and summary references, and the `ready` status land in
    /// one document update so a reader never observes `ready` with any of
    /// them missing.
    pub async fn finalize_ready(
        &self,
        id: &MediaItemId,
        title: &str,
        mood: Mood,
        tag_ids: &[TagId],
    ) -> FirestoreResult<()> {
        let tag_id_strings: Vec<String> = tag_ids.iter().map(|t| t.to_string()).collect();

        let mut fields = HashMap::new();
        fields.insert("title".to_string(), title.to_firestore_value());
        fields.insert("mood".to_string(), mood.as_str().to_firestore_value());
        fields.insert(
            "status".to_string(),
            MediaStatus::Ready.as_str().to_firestore_value(),
        );
        fields.insert("tag_ids".to_string(), tag_id_strings.to_firestore_value());
        fields.insert(
            "transcript_ref".to_string(),
            id.as_str().to_firestore_value(),
        );
        fields.insert("summary_ref".to_string(), id.as_str().to_firestore_value());
        fields.insert("error_message".to_string(), Value::NullValue(()));
        fields.insert("updated_at".to_string(), Utc::now().to_firestore_value());

        self.client
            .update_document(
                &self.collection(),
                id.as_str(),
                fields,
                Some(vec![
                    "title".to_string(),
                    "mood".to_string(),
                    "status".to_string(),
                    "tag_ids".to_string(),
                    "transcript_ref".to_string(),
                    "summary_ref".to_string(),
                    "error_message".to_string(),
                    "updated_at".to_string(),
                ]),
            )
            .await?;

        info!("Media item {} is ready", id);
        Ok(())
    }

    /// Delete a media item record.
    ///
    /// Does not stop an in-flight pipeline; a processing run that is
    /// already past the `processing` write may still re-create fields on
    /// this path later.
    pub async fn delete(&self, id: &MediaItemId) -> FirestoreResult<()> {
        self.client
            .delete_document(&self.collection(), id.as_str())
            .await
    }

    /// Per-owner upload counters, computed over the item list.
    pub async fn statistics(&self) -> FirestoreResult<MediaStatistics> {
        let items = self.list().await?;

        let now = Utc::now();
        let today_start = now
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();
        let week_ago = now - Duration::days(7);

        let mut stats = MediaStatistics {
            items_total: items.len() as u64,
            ..Default::default()
        };

        for item in &items {
            if item.created_at >= today_start {
                stats.items_today += 1;
            }
            if item.created_at >= week_ago {
                stats.items_this_week += 1;
            }
            if item.status == MediaStatus::Pending {
                stats.items_pending += 1;
            }
        }

        Ok(stats)
    }
}

/// Repository for the shared tag collection.
pub struct TagRepository {
    client: FirestoreClient,
}

const TAGS_COLLECTION: &str = "tags";

impl TagRepository {
    /// Create a new tag repository.
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Find-or-create a tag by name as a single atomic upsert.
    ///
    /// The document ID is derived from the name, so two pipelines racing
    /// on the same new name both patch the same document and neither can
    /// produce a duplicate.
    pub async fn upsert(&self, name: &str) -> FirestoreResult<TagId> {
        let tag = Tag::new(name);

        let mut fields = HashMap::new();
        fields.insert("name".to_string(), tag.name.to_firestore_value());

        self.client
            .update_document(
                TAGS_COLLECTION,
                tag.id.as_str(),
                fields,
                Some(vec!["name".to_string()]),
            )
            .await?;

        debug!("Upserted tag '{}' as {}", name, tag.id);
        Ok(tag.id)
    }

    /// Get a tag by document ID.
    pub async fn get(&self, id: &TagId) -> FirestoreResult<Option<Tag>> {
        let doc = self.client.get_document(TAGS_COLLECTION, id.as_str()).await?;

        Ok(doc.and_then(|d| {
            let name: String = d.field("name")?;
            Some(Tag {
                id: id.clone(),
                name,
            })
        }))
    }

    /// Resolve tag names for a set of document IDs. Missing tags are
    /// silently skipped.
    pub async fn names_for(&self, ids: &[String]) -> FirestoreResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut names = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(100) {
            let full_names: Vec<String> = chunk
                .iter()
                .map(|id| self.client.full_document_name(TAGS_COLLECTION, id))
                .collect();

            let docs = self
                .client
                .batch_get_documents(
                    full_names,
                    Some(DocumentMask {
                        field_paths: vec!["name".to_string()],
                    }),
                )
                .await?;

            names.extend(docs.iter().filter_map(|d| d.field::<String>("name")));
        }

        Ok(names)
    }
}

/// Repository for transcript documents, one per media item.
pub struct TranscriptRepository {
    client: FirestoreClient,
}

const TRANSCRIPTS_COLLECTION: &str = "transcripts";

impl TranscriptRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Upsert the transcript for a media item. Reprocessing the same item
    /// overwrites rather than duplicates.
    pub async fn upsert(&self, transcript: &Transcript) -> FirestoreResult<()> {
        let mut fields = HashMap::new();
        fields.insert(
            "media_item_id".to_string(),
            transcript.media_item_id.as_str().to_firestore_value(),
        );
        fields.insert("text".to_string(), transcript.text.to_firestore_value());
        fields.insert(
            "updated_at".to_string(),
            transcript.updated_at.to_firestore_value(),
        );

        self.client
            .update_document(
                TRANSCRIPTS_COLLECTION,
                transcript.media_item_id.as_str(),
                fields,
                Some(vec![
                    "media_item_id".to_string(),
                    "text".to_string(),
                    "updated_at".to_string(),
                ]),
            )
            .await?;
        Ok(())
    }

    /// Get the transcript for a media item.
    pub async fn get(&self, id: &MediaItemId) -> FirestoreResult<Option<Transcript>> {
        let doc = self
            .client
            .get_document(TRANSCRIPTS_COLLECTION, id.as_str())
            .await?;

        Ok(doc.and_then(|d| {
            Some(Transcript {
                media_item_id: id.clone(),
                text: d.field("text")?,
                updated_at: d.field("updated_at").unwrap_or_else(Utc::now),
            })
        }))
    }
}

/// Repository for summary documents, one per media item.
pub struct SummaryRepository {
    client: FirestoreClient,
}

const SUMMARIES_COLLECTION: &str = "summaries";

impl SummaryRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Upsert the summary for a media item.
    pub async fn upsert(&self, summary: &Summary) -> FirestoreResult<()> {
        let mut fields = HashMap::new();
        fields.insert(
            "media_item_id".to_string(),
            summary.media_item_id.as_str().to_firestore_value(),
        );
        fields.insert(
            "summary_text".to_string(),
            summary.summary_text.to_firestore_value(),
        );
        fields.insert(
            "updated_at".to_string(),
            summary.updated_at.to_firestore_value(),
        );

        self.client
            .update_document(
                SUMMARIES_COLLECTION,
                summary.media_item_id.as_str(),
                fields,
                Some(vec![
                    "media_item_id".to_string(),
                    "summary_text".to_string(),
                    "updated_at".to_string(),
                ]),
            )
            .await?;
        Ok(())
    }

    /// Get the summary for a media item.
    pub async fn get(&self, id: &MediaItemId) -> FirestoreResult<Option<Summary>> {
        let doc = self
            .client
            .get_document(SUMMARIES_COLLECTION, id.as_str())
            .await?;

        Ok(doc.and_then(|d| {
            Some(Summary {
                media_item_id: id.clone(),
                summary_text: d.field("summary_text")?,
                updated_at: d.field("updated_at").unwrap_or_else(Utc::now),
            })
        }))
    }
}

// =============================================================================
// Document mapping
// =============================================================================

/// Convert a media item to Firestore fields.
fn media_item_to_fields(item: &MediaItem) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert(
        "owner_id".to_string(),
        item.owner_id.to_firestore_value(),
    );
    fields.insert(
        "remote_url".to_string(),
        item.remote_url.to_firestore_value(),
    );
    fields.insert("title".to_string(), item.title.to_firestore_value());
    fields.insert(
        "description".to_string(),
        item.description.to_firestore_value(),
    );
    fields.insert(
        "duration_seconds".to_string(),
        item.duration_seconds.to_firestore_value(),
    );
    fields.insert(
        "mood".to_string(),
        item.mood.map(|m| m.as_str().to_string()).to_firestore_value(),
    );
    fields.insert(
        "status".to_string(),
        item.status.as_str().to_firestore_value(),
    );
    fields.insert("tag_ids".to_string(), item.tag_ids.to_firestore_value());
    fields.insert(
        "transcript_ref".to_string(),
        item.transcript_ref.to_firestore_value(),
    );
    fields.insert(
        "summary_ref".to_string(),
        item.summary_ref.to_firestore_value(),
    );
    fields.insert(
        "error_message".to_string(),
        item.error_message.to_firestore_value(),
    );
    fields.insert(
        "created_at".to_string(),
        item.created_at.to_firestore_value(),
    );
    fields.insert(
        "updated_at".to_string(),
        item.updated_at.to_firestore_value(),
    );
    fields
}

/// Convert a Firestore document back into a media item.
fn document_to_media_item(
    doc: &Document,
    id: &MediaItemId,
    owner_id: &str,
) -> FirestoreResult<MediaItem> {
    let remote_url: String = doc.field("remote_url").ok_or_else(|| {
        FirestoreError::invalid_response(format!("media item {} missing remote_url", id))
    })?;

    let status = doc
        .field::<String>("status")
        .and_then(|s| MediaStatus::parse(&s))
        .unwrap_or_default();

    Ok(MediaItem {
        id: id.clone(),
        owner_id: doc
            .field("owner_id")
            .unwrap_or_else(|| owner_id.to_string()),
        remote_url,
        title: doc.field("title"),
        description: doc.field("description"),
        duration_seconds: doc.field("duration_seconds").unwrap_or(0),
        mood: doc
            .field::<String>("mood")
            .and_then(|m| Mood::parse(&m)),
        status,
        tag_ids: doc.field("tag_ids").unwrap_or_default(),
        transcript_ref: doc.field("transcript_ref"),
        summary_ref: doc.field("summary_ref"),
        error_message: doc.field("error_message"),
        created_at: doc.field("created_at").unwrap_or_else(Utc::now),
        updated_at: doc.field("updated_at").unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> MediaItem {
        MediaItem::new(
            MediaItemId::from("item-1"),
            "user-1",
            "https://cdn.example.com/media/audio/a.mp3",
            Some("meeting recording".to_string()),
            125,
        )
    }

    #[test]
    fn test_media_item_field_roundtrip() {
        let item = sample_item();
        let doc = Document::new(media_item_to_fields(&item));

        let parsed = document_to_media_item(&doc, &item.id, "user-1").unwrap();
        assert_eq!(parsed.remote_url, item.remote_url);
        assert_eq!(parsed.duration_seconds, 125);
        assert_eq!(parsed.status, MediaStatus::Pending);
        assert_eq!(parsed.description.as_deref(), Some("meeting recording"));
        assert!(parsed.title.is_none());
        assert!(parsed.mood.is_none());
        assert!(parsed.tag_ids.is_empty());
    }

    #[test]
    fn test_ready_item_roundtrip() {
        let mut item = sample_item();
        item.status = MediaStatus::Ready;
        item.title = Some("Weekly sync".to_string());
        item.mood = Some(Mood::Positive);
        item.tag_ids = vec![TagId::from_name("sync").to_string()];
        item.transcript_ref = Some(item.id.to_string());
        item.summary_ref = Some(item.id.to_string());

        let doc = Document::new(media_item_to_fields(&item));
        let parsed = document_to_media_item(&doc, &item.id, "user-1").unwrap();

        assert_eq!(parsed.status, MediaStatus::Ready);
        assert_eq!(parsed.mood, Some(Mood::Positive));
        assert!(parsed.ready_invariant_holds());
    }

    #[test]
    fn test_document_without_remote_url_is_invalid() {
        let doc = Document::new(HashMap::new());
        let result = document_to_media_item(&doc, &MediaItemId::from("x"), "user-1");
        assert!(result.is_err());
    }
}
