//! Firestore REST API client for the MediaFlow document store.
//!
//! This crate provides:
//! - A tuned REST client (token caching, retry with backoff, metrics)
//! - Typed repositories for media items, tags, transcripts and summaries
//! - Atomic tag upsert keyed by a name-derived document ID
//! - Service account authentication via gcp_auth

pub mod client;
pub mod error;
pub mod metrics;
pub mod repos;
pub mod retry;
pub mod token_cache;
pub mod types;

pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use repos::{MediaItemRepository, SummaryRepository, TagRepository, TranscriptRepository};
pub use retry::RetryConfig;
