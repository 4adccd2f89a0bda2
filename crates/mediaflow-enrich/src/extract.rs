//! Metadata extraction with heuristic fallback.

use serde::Deserialize;
use tracing::{debug, warn};

use mediaflow_models::{MediaEnrichment, Mood};

use crate::client::LlmClient;

/// Title placeholder when the transcript is empty.
const FALLBACK_TITLE: &str = "Audio Recording";

/// Summary placeholder when the transcript is empty.
const FALLBACK_SUMMARY: &str = "Audio transcription processed";

/// Tag placeholders when no usable words are found.
const FALLBACK_TAGS: [&str; 2] = ["audio", "recording"];

/// Words too generic to be useful as tags.
const STOP_WORDS: [&str; 11] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
];

/// Candidate JSON parsed from the model response, before validation.
#[derive(Debug, Deserialize)]
struct RawEnrichment {
    title: Option<String>,
    tags: Option<Vec<String>>,
    mood: Option<String>,
    summary: Option<String>,
}

/// Outcome of parsing a model response.
enum ParseOutcome {
    Parsed(MediaEnrichment),
    Malformed(String),
}

impl LlmClient {
    /// Derive title, tags, mood and summary for a transcript.
    ///
    /// Never fails: any model, transport or parse problem falls back to
    /// [`fallback_enrichment`], because derived metadata is best-effort
    /// enrichment rather than a blocking requirement.
    pub async fn extract_metadata(&self, transcript: &str) -> MediaEnrichment {
        let prompt = build_metadata_prompt(transcript);

        match self.complete(&prompt).await {
            Ok(text) => match parse_enrichment(&text) {
                ParseOutcome::Parsed(enrichment) => {
                    debug!("Model enrichment accepted: '{}'", enrichment.title);
                    enrichment
                }
                ParseOutcome::Malformed(raw) => {
                    let prefix: String = raw.chars().take(120).collect();
                    warn!(
                        "Model enrichment malformed, using heuristic fallback \
                         (response prefix: {})",
                        prefix
                    );
                    fallback_enrichment(transcript)
                }
            },
            Err(e) => {
                warn!("Model call failed, using heuristic fallback: {}", e);
                fallback_enrichment(transcript)
            }
        }
    }
}

/// Prompt demanding the fixed JSON shape and nothing else.
fn build_metadata_prompt(transcript: &str) -> String {
    format!(
        r#"Analyze this audio transcription and respond ONLY with valid JSON (no markdown, no code blocks, no explanations):

Transcription: "{transcript}"

Respond with this exact JSON structure:
{{
  "title": "A short descriptive title (max 50 chars)",
  "tags": ["tag1", "tag2", "tag3"],
  "mood": "positive/negative/neutral/excited/sad",
  "summary": "Brief summary (max 200 chars)"
}}"#
    )
}

/// Parse a model response into an enrichment, validating every field.
///
/// Field presence is never trusted: the success variant is only built
/// once title, tags, mood and summary are all present and non-empty.
fn parse_enrichment(response: &str) -> ParseOutcome {
    let cleaned = strip_code_fences(response);

    let Some(candidate) = first_balanced_object(cleaned) else {
        return ParseOutcome::Malformed(response.to_string());
    };

    let raw: RawEnrichment = match serde_json::from_str(candidate) {
        Ok(raw) => raw,
        Err(_) => return ParseOutcome::Malformed(response.to_string()),
    };

    let (Some(title), Some(tags), Some(mood), Some(summary)) =
        (raw.title, raw.tags, raw.mood, raw.summary)
    else {
        return ParseOutcome::Malformed(response.to_string());
    };

    let tags: Vec<String> = tags.into_iter().filter(|t| !t.is_empty()).collect();

    if title.is_empty() || tags.is_empty() || summary.is_empty() {
        return ParseOutcome::Malformed(response.to_string());
    }

    let Some(mood) = Mood::parse(&mood) else {
        return ParseOutcome::Malformed(response.to_string());
    };

    ParseOutcome::Parsed(MediaEnrichment {
        title,
        tags,
        mood,
        summary,
    })
}

/// Remove markdown code fences the model may have wrapped around the JSON.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Extract the first balanced `{...}` substring, respecting JSON string
/// literals and escapes.
pub(crate) fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Deterministic enrichment derived from the transcript alone.
pub fn fallback_enrichment(transcript: &str) -> MediaEnrichment {
    let title: String = transcript.chars().take(50).collect();
    let summary: String = transcript.chars().take(200).collect();

    let mut tags: Vec<String> = Vec::new();
    for word in transcript.to_lowercase().split_whitespace() {
        if word.len() > 3 && !STOP_WORDS.contains(&word) && !tags.iter().any(|t| t == word) {
            tags.push(word.to_string());
            if tags.len() == 3 {
                break;
            }
        }
    }
    if tags.is_empty() {
        tags = FALLBACK_TAGS.iter().map(|t| t.to_string()).collect();
    }

    MediaEnrichment {
        title: if title.is_empty() {
            FALLBACK_TITLE.to_string()
        } else {
            title
        },
        tags,
        mood: Mood::Neutral,
        summary: if summary.is_empty() {
            FALLBACK_SUMMARY.to_string()
        } else {
            summary
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_first_balanced_object() {
        assert_eq!(
            first_balanced_object("Here you go: {\"a\": {\"b\": 2}} trailing"),
            Some("{\"a\": {\"b\": 2}}")
        );
        assert_eq!(first_balanced_object("no json here"), None);
        assert_eq!(first_balanced_object("{ truncated"), None);
    }

    #[test]
    fn test_first_balanced_object_ignores_braces_in_strings() {
        let text = r#"{"title": "curly } brace", "n": 1}"#;
        assert_eq!(first_balanced_object(text), Some(text));
    }

    #[test]
    fn test_parse_valid_response() {
        let response = r#"```json
{"title": "Morning standup", "tags": ["standup", "team"], "mood": "positive", "summary": "The team discussed blockers."}
```"#;
        match parse_enrichment(response) {
            ParseOutcome::Parsed(e) => {
                assert_eq!(e.title, "Morning standup");
                assert_eq!(e.tags, vec!["standup", "team"]);
                assert_eq!(e.mood, Mood::Positive);
            }
            ParseOutcome::Malformed(_) => panic!("expected parse"),
        }
    }

    #[test]
    fn test_parse_rejects_missing_mood() {
        let response = r#"{"title": "T", "tags": ["x"], "summary": "S"}"#;
        assert!(matches!(
            parse_enrichment(response),
            ParseOutcome::Malformed(_)
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_mood() {
        let response = r#"{"title": "T", "tags": ["x"], "mood": "grumpy", "summary": "S"}"#;
        assert!(matches!(
            parse_enrichment(response),
            ParseOutcome::Malformed(_)
        ));
    }

    #[test]
    fn test_parse_rejects_empty_fields() {
        let response = r#"{"title": "", "tags": ["x"], "mood": "neutral", "summary": "S"}"#;
        assert!(matches!(
            parse_enrichment(response),
            ParseOutcome::Malformed(_)
        ));
    }

    #[test]
    fn test_fallback_hello_world() {
        let e = fallback_enrichment("hello world");
        assert_eq!(e.title, "hello world");
        assert_eq!(e.tags, vec!["hello", "world"]);
        assert_eq!(e.mood, Mood::Neutral);
        assert_eq!(e.summary, "hello world");
    }

    #[test]
    fn test_fallback_empty_transcript_uses_placeholders() {
        let e = fallback_enrichment("");
        assert_eq!(e.title, FALLBACK_TITLE);
        assert_eq!(e.tags, vec!["audio", "recording"]);
        assert_eq!(e.summary, FALLBACK_SUMMARY);
    }

    #[test]
    fn test_fallback_filters_short_and_stop_words() {
        let e = fallback_enrichment("for the and but planning architecture review");
        assert_eq!(e.tags, vec!["planning", "architecture", "review"]);
    }

    #[test]
    fn test_fallback_truncates_title_and_summary() {
        let transcript = "x".repeat(500);
        let e = fallback_enrichment(&transcript);
        assert_eq!(e.title.chars().count(), 50);
        assert_eq!(e.summary.chars().count(), 200);
    }

    #[test]
    fn test_fallback_tags_are_distinct() {
        let e = fallback_enrichment("rust rust rust tokio tokio serde");
        assert_eq!(e.tags, vec!["rust", "tokio", "serde"]);
    }

    mod behavior {
        use super::super::*;
        use crate::client::EnrichConfig;
        use serde_json::json;
        use std::time::Duration;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn test_config(server_uri: &str) -> EnrichConfig {
            EnrichConfig {
                api_key: "test-key".to_string(),
                api_url: format!("{}/chat/completions", server_uri),
                model_name: "test-model".to_string(),
                image_api_url: format!("{}/prompt", server_uri),
                timeout: Duration::from_secs(5),
                image_timeout: Duration::from_secs(5),
            }
        }

        fn chat_response(content: &str) -> serde_json::Value {
            json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
        }

        #[tokio::test]
        async fn test_missing_mood_falls_back_to_heuristic() {
            let server = MockServer::start().await;

            // Syntactically valid JSON, but the mood field is absent; the
            // result must be the full heuristic fallback, not a partial parse.
            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(
                    r#"{"title": "Model title", "tags": ["model"], "summary": "Model summary"}"#,
                )))
                .mount(&server)
                .await;

            let client = LlmClient::new(test_config(&server.uri())).unwrap();
            let e = client.extract_metadata("hello world").await;

            assert_eq!(e.title, "hello world");
            assert_eq!(e.tags, vec!["hello", "world"]);
            assert_eq!(e.mood, Mood::Neutral);
            assert_eq!(e.summary, "hello world");
        }

        #[tokio::test]
        async fn test_fenced_response_is_accepted() {
            let server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(
                    "```json\n{\"title\": \"Standup\", \"tags\": [\"team\", \"sync\", \"planning\"], \
                     \"mood\": \"positive\", \"summary\": \"Team sync covering blockers.\"}\n```",
                )))
                .mount(&server)
                .await;

            let client = LlmClient::new(test_config(&server.uri())).unwrap();
            let e = client.extract_metadata("we talked about blockers").await;

            assert_eq!(e.title, "Standup");
            assert_eq!(e.mood, Mood::Positive);
            assert_eq!(e.tags.len(), 3);
        }

        #[tokio::test]
        async fn test_transport_failure_falls_back() {
            let server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
                .mount(&server)
                .await;

            let client = LlmClient::new(test_config(&server.uri())).unwrap();
            let e = client.extract_metadata("hello world").await;

            assert_eq!(e.title, "hello world");
            assert_eq!(e.mood, Mood::Neutral);
        }
    }
}
