//! S3-compatible object storage client for uploaded media.
//!
//! This crate provides:
//! - Media upload under a fixed logical folder, returning a public URL
//! - Best-effort local temp-file cleanup after upload
//! - Object deletion (orphan cleanup) and existence checks

pub mod client;
pub mod error;

pub use client::{StorageClient, StorageConfig, UploadedMedia, MEDIA_FOLDER};
pub use error::{StorageError, StorageResult};
