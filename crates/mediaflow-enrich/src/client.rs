//! Chat-completions client for an OpenAI-compatible endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EnrichError, EnrichResult};

/// Configuration for the enrichment clients.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// API key for the chat-completions endpoint
    pub api_key: String,
    /// Chat-completions endpoint URL
    pub api_url: String,
    /// Model name
    pub model_name: String,
    /// Text-to-image endpoint base URL
    pub image_api_url: String,
    /// Per-request timeout for model calls
    pub timeout: Duration,
    /// Per-request timeout for image rendering
    pub image_timeout: Duration,
}

impl EnrichConfig {
    /// Create config from environment variables.
    pub fn from_env() -> EnrichResult<Self> {
        Ok(Self {
            api_key: std::env::var("LLM_API_KEY")
                .map_err(|_| EnrichError::config_error("LLM_API_KEY not set"))?,
            api_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1/chat/completions".to_string()),
            model_name: std::env::var("LLM_MODEL_NAME")
                .unwrap_or_else(|_| "meta-llama/llama-3.3-70b-instruct".to_string()),
            image_api_url: std::env::var("IMAGE_API_URL")
                .unwrap_or_else(|_| "https://image.pollinations.ai/prompt".to_string()),
            timeout: Duration::from_secs(
                std::env::var("LLM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            image_timeout: Duration::from_secs(
                std::env::var("IMAGE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        })
    }
}

/// Chat-completions request.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat-completions response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Hosted language model client.
pub struct LlmClient {
    http: Client,
    pub(crate) config: EnrichConfig,
}

impl LlmClient {
    /// Create a new client.
    pub fn new(config: EnrichConfig) -> EnrichResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(EnrichError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> EnrichResult<Self> {
        Self::new(EnrichConfig::from_env()?)
    }

    /// Send a single-message prompt and return the model's text.
    pub async fn complete(&self, prompt: &str) -> EnrichResult<String> {
        let request = ChatRequest {
            model: self.config.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.7,
            max_tokens: 2000,
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::llm_failed(format!(
                "model API returned {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await?;
        let text = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| EnrichError::llm_failed("no choices in model response"))?;

        debug!("Model returned {} chars", text.len());
        Ok(text)
    }

    /// Fetch rendered image bytes for a prompt from the text-to-image
    /// endpoint.
    pub(crate) async fn render_image(&self, prompt: &str) -> EnrichResult<(Vec<u8>, String)> {
        let url = format!(
            "{}/{}?width=1024&height=1024&nologo=true",
            self.config.image_api_url.trim_end_matches('/'),
            urlencoding::encode(prompt)
        );

        let response = self
            .http
            .get(&url)
            .timeout(self.config.image_timeout)
            .send()
            .await
            .map_err(|e| EnrichError::illustration_failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EnrichError::illustration_failed(format!(
                "image API returned {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EnrichError::illustration_failed(e.to_string()))?
            .to_vec();

        Ok((bytes, content_type))
    }
}
