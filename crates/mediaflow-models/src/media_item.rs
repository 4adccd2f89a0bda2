//! Media item models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::enrichment::Mood;

/// Unique identifier for a media item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct MediaItemId(pub String);

impl MediaItemId {
    /// Generate a new random media item ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MediaItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MediaItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MediaItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MediaItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Media item processing status.
///
/// External callers poll on these wire values; they are stable,
/// lowercase, case-sensitive strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    /// Uploaded, waiting for processing
    #[default]
    Pending,
    /// Pipeline is running
    Processing,
    /// Transcript, summary and derived metadata persisted
    Ready,
    /// A pipeline step failed; safe to re-trigger processing
    Error,
}

impl MediaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaStatus::Pending => "pending",
            MediaStatus::Processing => "processing",
            MediaStatus::Ready => "ready",
            MediaStatus::Error => "error",
        }
    }

    /// Parse a wire value. Case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MediaStatus::Pending),
            "processing" => Some(MediaStatus::Processing),
            "ready" => Some(MediaStatus::Ready),
            "error" => Some(MediaStatus::Error),
            _ => None,
        }
    }

    /// Check if this is a terminal state (no more updates expected
    /// without an external re-trigger).
    pub fn is_terminal(&self) -> bool {
        matches!(self, MediaStatus::Ready | MediaStatus::Error)
    }
}

impl fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Media item record as stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MediaItem {
    /// Unique item ID
    pub id: MediaItemId,

    /// Owning user ID
    pub owner_id: String,

    /// Public URL of the uploaded object
    pub remote_url: String,

    /// Derived title (set when metadata persistence succeeds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Caller-supplied description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Playback duration in whole seconds
    pub duration_seconds: u64,

    /// Derived mood
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,

    /// Processing status
    #[serde(default)]
    pub status: MediaStatus,

    /// Referenced tag document IDs (order irrelevant)
    #[serde(default)]
    pub tag_ids: Vec<String>,

    /// Transcript document reference (the item's own ID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_ref: Option<String>,

    /// Summary document reference (the item's own ID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_ref: Option<String>,

    /// Error detail from the last failed processing attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl MediaItem {
    /// Create a new pending media item record.
    pub fn new(
        id: MediaItemId,
        owner_id: impl Into<String>,
        remote_url: impl Into<String>,
        description: Option<String>,
        duration_seconds: u64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            owner_id: owner_id.into(),
            remote_url: remote_url.into(),
            title: None,
            description,
            duration_seconds,
            mood: None,
            status: MediaStatus::Pending,
            tag_ids: Vec::new(),
            transcript_ref: None,
            summary_ref: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the ready-state invariant holds: `ready` implies title,
    /// mood, transcript_ref and summary_ref are all present.
    pub fn ready_invariant_holds(&self) -> bool {
        self.status != MediaStatus::Ready
            || (self.title.is_some()
                && self.mood.is_some()
                && self.transcript_ref.is_some()
                && self.summary_ref.is_some())
    }
}

/// Result of a successful creation call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreatedMediaItem {
    pub id: MediaItemId,
    pub remote_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration_seconds: u64,
    pub owner_id: String,
}

/// Summary of a media item in the owner's library (for list views).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MediaItemSummary {
    pub id: MediaItemId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: MediaStatus,
    #[serde(default)]
    pub tag_names: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Media item with its references resolved.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MediaItemDetail {
    pub item: MediaItem,
    #[serde(default)]
    pub tag_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_text: Option<String>,
}

/// Per-owner upload counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MediaStatistics {
    pub items_today: u64,
    pub items_total: u64,
    pub items_pending: u64,
    pub items_this_week: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_item_id_generation() {
        let id1 = MediaItemId::new();
        let id2 = MediaItemId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&MediaStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&MediaStatus::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(
            serde_json::to_string(&MediaStatus::Ready).unwrap(),
            "\"ready\""
        );
        assert_eq!(
            serde_json::to_string(&MediaStatus::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn test_status_parse_is_case_sensitive() {
        assert_eq!(MediaStatus::parse("ready"), Some(MediaStatus::Ready));
        assert_eq!(MediaStatus::parse("Ready"), None);
        assert_eq!(MediaStatus::parse("READY"), None);
    }

    #[test]
    fn test_new_item_is_pending() {
        let item = MediaItem::new(
            MediaItemId::new(),
            "user123",
            "https://cdn.example.com/media/audio/a.mp3",
            Some("standup notes".to_string()),
            125,
        );

        assert_eq!(item.status, MediaStatus::Pending);
        assert!(item.title.is_none());
        assert!(item.transcript_ref.is_none());
        assert!(item.ready_invariant_holds());
    }

    #[test]
    fn test_ready_invariant_detects_partial_state() {
        let mut item = MediaItem::new(
            MediaItemId::new(),
            "user123",
            "https://cdn.example.com/media/audio/a.mp3",
            None,
            60,
        );
        item.status = MediaStatus::Ready;
        assert!(!item.ready_invariant_holds());

        item.title = Some("Title".to_string());
        item.mood = Some(Mood::Neutral);
        item.transcript_ref = Some(item.id.to_string());
        item.summary_ref = Some(item.id.to_string());
        assert!(item.ready_invariant_holds());
    }
}
