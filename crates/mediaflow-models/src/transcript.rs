//! Transcript and summary models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::media_item::MediaItemId;

/// Full transcribed text for one media item.
///
/// One-to-one with the item and keyed by its ID, so reprocessing
/// overwrites rather than duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Transcript {
    pub media_item_id: MediaItemId,
    pub text: String,
    pub updated_at: DateTime<Utc>,
}

impl Transcript {
    pub fn new(media_item_id: MediaItemId, text: impl Into<String>) -> Self {
        Self {
            media_item_id,
            text: text.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Generated summary for one media item. Same keying and upsert
/// lifecycle as [`Transcript`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub media_item_id: MediaItemId,
    pub summary_text: String,
    pub updated_at: DateTime<Utc>,
}

impl Summary {
    pub fn new(media_item_id: MediaItemId, summary_text: impl Into<String>) -> Self {
        Self {
            media_item_id,
            summary_text: summary_text.into(),
            updated_at: Utc::now(),
        }
    }
}
