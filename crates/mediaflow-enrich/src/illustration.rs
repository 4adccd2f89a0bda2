//! Illustration rendering from a transcript.

use tracing::info;

use mediaflow_models::Illustration;

use crate::client::LlmClient;
use crate::error::{EnrichError, EnrichResult};

/// Portion of the transcript fed into the prompt-derivation call.
const PROMPT_SOURCE_CHARS: usize = 500;

impl LlmClient {
    /// Derive a short image prompt from the transcript, then render it
    /// through the external text-to-image endpoint.
    ///
    /// Unlike metadata extraction there is no deterministic fallback
    /// image, so failures surface to the caller.
    pub async fn generate_illustration(&self, transcript: &str) -> EnrichResult<Illustration> {
        let excerpt: String = transcript.chars().take(PROMPT_SOURCE_CHARS).collect();
        let prompt_request = build_prompt_request(&excerpt);

        let image_prompt = self
            .complete(&prompt_request)
            .await
            .map_err(|e| EnrichError::illustration_failed(format!("prompt derivation: {}", e)))?;
        let image_prompt = image_prompt.trim().to_string();

        if image_prompt.is_empty() {
            return Err(EnrichError::illustration_failed(
                "model returned an empty image prompt",
            ));
        }

        let (image, content_type) = self.render_image(&image_prompt).await?;
        info!(
            "Rendered illustration ({} bytes, {})",
            image.len(),
            content_type
        );

        Ok(Illustration {
            prompt: image_prompt,
            image,
            content_type,
        })
    }
}

fn build_prompt_request(excerpt: &str) -> String {
    format!(
        r#"Based on this audio transcription, create a concise, descriptive image prompt (max 100 words) that captures the main theme or subject. The prompt should be suitable for text-to-image generation.

Transcription: "{excerpt}"

Respond with ONLY the image prompt text, no JSON, no explanations, just the prompt itself."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
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
    async fn test_illustration_happy_path() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_response("a calm mountain lake at sunrise")),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/prompt/a%20calm%20mountain%20lake%20at%20sunrise"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]),
            )
            .mount(&server)
            .await;

        let client = LlmClient::new(test_config(&server.uri())).unwrap();
        let illustration = client
            .generate_illustration("We hiked up to the lake before dawn")
            .await
            .unwrap();

        assert_eq!(illustration.prompt, "a calm mountain lake at sunrise");
        assert_eq!(illustration.image, vec![0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(illustration.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_illustration_surfaces_model_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = LlmClient::new(test_config(&server.uri())).unwrap();
        let err = client.generate_illustration("anything").await.unwrap_err();
        assert!(matches!(err, EnrichError::IllustrationFailed(_)));
    }

    #[tokio::test]
    async fn test_illustration_surfaces_render_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("sunset")))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/prompt/sunset"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = LlmClient::new(test_config(&server.uri())).unwrap();
        let err = client.generate_illustration("anything").await.unwrap_err();
        assert!(matches!(err, EnrichError::IllustrationFailed(_)));
    }
}
