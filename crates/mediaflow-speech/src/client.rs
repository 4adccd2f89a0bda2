//! Transcription service HTTP client.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::{SpeechError, SpeechResult};
use crate::types::{JobStatus, SubmitJobRequest, TranscriptJob};

/// Configuration for the transcription client.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// API key
    pub api_key: String,
    /// Base URL of the transcription API
    pub api_url: String,
    /// Transcription language
    pub language_code: String,
    /// Quality tier of the speech model
    pub speech_model: String,
    /// Delay between status polls
    pub poll_interval: Duration,
    /// Hard ceiling on poll attempts
    pub max_poll_attempts: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl SpeechConfig {
    /// Create config from environment variables.
    pub fn from_env() -> SpeechResult<Self> {
        Ok(Self {
            api_key: std::env::var("SPEECH_API_KEY")
                .map_err(|_| SpeechError::config_error("SPEECH_API_KEY not set"))?,
            api_url: std::env::var("SPEECH_API_URL")
                .unwrap_or_else(|_| "https://api.assemblyai.com".to_string()),
            language_code: std::env::var("SPEECH_LANGUAGE_CODE")
                .unwrap_or_else(|_| "en".to_string()),
            speech_model: std::env::var("SPEECH_MODEL").unwrap_or_else(|_| "best".to_string()),
            poll_interval: Duration::from_millis(
                std::env::var("SPEECH_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3000),
            ),
            max_poll_attempts: std::env::var("SPEECH_MAX_POLL_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            timeout: Duration::from_secs(
                std::env::var("SPEECH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        })
    }
}

/// Client for the remote transcription service.
///
/// `transcribe` is a blocking wait from the caller's perspective: the
/// polling loop can run for minutes, idle-waiting on the poll interval
/// between requests.
pub struct TranscriptionClient {
    http: Client,
    config: SpeechConfig,
}

impl TranscriptionClient {
    /// Create a new transcription client.
    pub fn new(config: SpeechConfig) -> SpeechResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SpeechError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> SpeechResult<Self> {
        Self::new(SpeechConfig::from_env()?)
    }

    /// Transcribe the media behind a remote URL.
    ///
    /// Submits a job, then polls until a terminal status or the attempt
    /// ceiling. Empty transcript text is returned as-is; the caller
    /// decides whether that counts as a failure.
    pub async fn transcribe(&self, remote_url: &str) -> SpeechResult<String> {
        let job = self.submit_job(remote_url).await?;
        info!("Transcription job {} submitted", job.id);

        let mut poll_count = 0u32;
        loop {
            if poll_count >= self.config.max_poll_attempts {
                warn!(
                    "Transcription job {} still not terminal after {} polls",
                    job.id, poll_count
                );
                return Err(SpeechError::Timeout(poll_count));
            }

            tokio::time::sleep(self.config.poll_interval).await;
            poll_count += 1;

            let current = self.get_job(&job.id).await?;
            debug!(
                "Poll {}: transcription job {} status {}",
                poll_count, job.id, current.status
            );

            match current.status {
                JobStatus::Completed => {
                    info!("Transcription job {} completed", job.id);
                    return Ok(current.text.unwrap_or_default());
                }
                JobStatus::Error => {
                    let detail = current.error.unwrap_or_else(|| "unknown error".to_string());
                    return Err(SpeechError::transcription_failed(detail));
                }
                JobStatus::Queued | JobStatus::Processing => continue,
            }
        }
    }

    /// Submit a transcription job for a remote URL.
    async fn submit_job(&self, remote_url: &str) -> SpeechResult<TranscriptJob> {
        let url = format!("{}/v2/transcript", self.config.api_url.trim_end_matches('/'));

        let request = SubmitJobRequest {
            audio_url: remote_url.to_string(),
            language_code: self.config.language_code.clone(),
            punctuate: true,
            format_text: true,
            speech_model: self.config.speech_model.clone(),
        };

        let response = self
            .http
            .post(&url)
            .header("authorization", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::submit_failed(format!(
                "transcription API returned {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetch the current state of a job.
    async fn get_job(&self, job_id: &str) -> SpeechResult<TranscriptJob> {
        let url = format!(
            "{}/v2/transcript/{}",
            self.config.api_url.trim_end_matches('/'),
            job_id
        );

        let response = self
            .http
            .get(&url)
            .header("authorization", &self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::request_failed(format!(
                "transcription API returned {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}
