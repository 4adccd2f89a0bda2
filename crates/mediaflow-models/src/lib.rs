//! Shared data models for the MediaFlow backend.
//!
//! This crate provides Serde-serializable types for:
//! - Media items and their processing status
//! - Tags, transcripts and summaries
//! - Derived enrichment (title/tags/mood/summary, action plans, illustrations)
//! - Per-owner statistics

pub mod action_plan;
pub mod enrichment;
pub mod media_item;
pub mod tag;
pub mod transcript;

// Re-export common types
pub use action_plan::{ActionPlan, TodoCategory, TodoItem, TodoPriority};
pub use enrichment::{Illustration, MediaEnrichment, Mood};
pub use media_item::{
    CreatedMediaItem, MediaItem, MediaItemDetail, MediaItemId, MediaItemSummary, MediaStatistics,
    MediaStatus,
};
pub use tag::{Tag, TagId};
pub use transcript::{Summary, Transcript};
