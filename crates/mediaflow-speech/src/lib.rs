//! Speech-to-text HTTP client.
//!
//! This crate provides:
//! - Transcription job submission for a remote media URL
//! - Bounded status polling with a configurable interval and ceiling

pub mod client;
pub mod error;
pub mod types;

pub use client::{SpeechConfig, TranscriptionClient};
pub use error::{SpeechError, SpeechResult};
pub use types::{JobStatus, TranscriptJob};
