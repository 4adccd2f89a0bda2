//! LLM-derived enrichment for transcripts.
//!
//! This crate provides:
//! - A chat-completions client for an OpenAI-compatible endpoint
//! - Metadata extraction (title/tags/mood/summary) with a deterministic
//!   heuristic fallback
//! - Action-plan generation with a fixed fallback plan
//! - Illustration rendering via an external text-to-image endpoint

pub mod actions;
pub mod client;
pub mod error;
pub mod extract;
pub mod illustration;

pub use client::{EnrichConfig, LlmClient};
pub use error::{EnrichError, EnrichResult};
pub use extract::fallback_enrichment;
