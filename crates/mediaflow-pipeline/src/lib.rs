//! Media processing pipeline.
//!
//! This crate provides:
//! - Upload validation and media item creation (probe + upload + record)
//! - The processing orchestrator driving pending items to ready/error
//! - Derived-feature operations (action items, illustrations)
//! - Owner-scoped reads, listings, statistics and deletes

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod service;
pub mod validate;

pub use config::PipelineConfig;
pub use context::ProcessingContext;
pub use error::{PipelineError, PipelineResult};
pub use logging::ItemLogger;
pub use service::MediaService;
