//! Derived-metadata models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mood derived from a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Negative,
    #[default]
    Neutral,
    Excited,
    Sad,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Positive => "positive",
            Mood::Negative => "negative",
            Mood::Neutral => "neutral",
            Mood::Excited => "excited",
            Mood::Sad => "sad",
        }
    }

    /// Parse a wire value. Case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Mood::Positive),
            "negative" => Some(Mood::Negative),
            "neutral" => Some(Mood::Neutral),
            "excited" => Some(Mood::Excited),
            "sad" => Some(Mood::Sad),
            _ => None,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Title/tags/mood/summary bundle derived from a transcript.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MediaEnrichment {
    pub title: String,
    pub tags: Vec<String>,
    pub mood: Mood,
    pub summary: String,
}

/// Rendered illustration for a transcript.
#[derive(Debug, Clone)]
pub struct Illustration {
    /// The prompt the image was rendered from
    pub prompt: String,
    /// Raw image bytes
    pub image: Vec<u8>,
    /// Content type reported by the render endpoint
    pub content_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_wire_values() {
        assert_eq!(serde_json::to_string(&Mood::Neutral).unwrap(), "\"neutral\"");
        assert_eq!(serde_json::to_string(&Mood::Excited).unwrap(), "\"excited\"");
    }

    #[test]
    fn test_mood_parse_is_case_sensitive() {
        assert_eq!(Mood::parse("sad"), Some(Mood::Sad));
        assert_eq!(Mood::parse("Sad"), None);
        assert_eq!(Mood::parse("wistful"), None);
    }
}
