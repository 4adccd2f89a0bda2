//! Local media inspection.
//!
//! This crate provides:
//! - FFprobe-based duration probing
//! - Byte-size duration estimation when FFprobe is unavailable

pub mod error;
pub mod probe;

pub use error::{MediaError, MediaResult};
pub use probe::{probe_duration, DEFAULT_DURATION_SECS, MIN_ESTIMATED_DURATION_SECS};
