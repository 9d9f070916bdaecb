//! Model client with timeout, retry, and output repair.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::api_types::{
    ApiErrorBody, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::repair;

/// Seam between the pipeline and the generative model.
///
/// The orchestrator asks for plain reply text; the trainer asks for
/// structured JSON. The credential is per tenant and passed per call.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a plain-text reply. Fence markers and surrounding quotes
    /// are stripped from the result.
    async fn generate_text(&self, prompt: &str, api_key: &str) -> Result<String, LlmError>;

    /// Generate structured output, repairing common JSON malformations.
    async fn generate_json(&self, prompt: &str, api_key: &str) -> Result<Value, LlmError>;
}

/// HTTP client for the generateContent API.
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .build()
            .map_err(|e| LlmError::Transport(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(LlmConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// One request attempt against the provider, without timeout or retry.
    async fn send_once(
        &self,
        url: &str,
        prompt: &str,
        generation: GenerationConfig,
    ) -> Result<String, LlmError> {
        let request = GenerateContentRequest::new(prompt, generation);

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            return Err(match status.as_u16() {
                429 => LlmError::RateLimited,
                400 | 401 | 403 => {
                    warn!("Provider rejected request ({}): {}", status, message);
                    LlmError::InvalidCredential
                }
                code => LlmError::Api {
                    status: code,
                    message,
                },
            });
        }

        let completion: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to read response: {}", e)))?;

        completion
            .first_text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LlmError::MalformedOutput("model returned no content".to_string()))
    }

    /// Call the model with timeout and retry.
    ///
    /// Each attempt runs under the hard request timeout; 429 and 5xx
    /// responses, timeouts, and transport failures are retried up to
    /// `max_retries` with increasing backoff. A 400-class rejection fails
    /// immediately.
    async fn call(
        &self,
        prompt: &str,
        api_key: &str,
        generation: GenerationConfig,
    ) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.api_url.trim_end_matches('/'),
            self.config.model,
            api_key
        );

        let mut attempt: u32 = 0;
        loop {
            let result = timeout(
                self.config.request_timeout,
                self.send_once(&url, prompt, generation),
            )
            .await;

            let error = match result {
                Ok(Ok(text)) => {
                    debug!("Model call succeeded on attempt {}", attempt + 1);
                    return Ok(text);
                }
                Ok(Err(e)) => e,
                Err(_elapsed) => LlmError::Timeout(self.config.request_timeout),
            };

            if !error.is_retryable() || attempt >= self.config.max_retries {
                return Err(error);
            }

            let backoff = self.config.backoff(attempt);
            warn!(
                "Model call attempt {} failed ({}), retrying in {:?}",
                attempt + 1,
                error,
                backoff
            );
            sleep(backoff).await;
            attempt += 1;
        }
    }

    fn text_generation(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.config.text_temperature,
            max_output_tokens: self.config.text_max_tokens,
            top_p: Some(0.95),
            top_k: Some(40),
        }
    }

    fn json_generation(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.config.json_temperature,
            max_output_tokens: self.config.json_max_tokens,
            top_p: None,
            top_k: None,
        }
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate_text(&self, prompt: &str, api_key: &str) -> Result<String, LlmError> {
        let raw = self.call(prompt, api_key, self.text_generation()).await?;
        let cleaned = repair::trim_outer_quotes(&repair::strip_code_fences(&raw));
        if cleaned.is_empty() {
            return Err(LlmError::MalformedOutput(
                "model returned empty text".to_string(),
            ));
        }
        Ok(cleaned)
    }

    async fn generate_json(&self, prompt: &str, api_key: &str) -> Result<Value, LlmError> {
        let raw = self.call(prompt, api_key, self.json_generation()).await?;
        parse_json_output(&raw)
    }
}

/// Parse model output as JSON: strip fences, repair trailing commas, and
/// if that fails, extract the first balanced object and reparse once.
pub(crate) fn parse_json_output(raw: &str) -> Result<Value, LlmError> {
    let stripped = repair::strip_code_fences(raw);
    let repaired = repair::repair_trailing_commas(&stripped);

    if let Ok(value) = serde_json::from_str(&repaired) {
        return Ok(value);
    }

    // One bounded extraction attempt before giving up.
    if let Some(candidate) = repair::extract_balanced_object(&stripped) {
        let repaired = repair::repair_trailing_commas(candidate);
        if let Ok(value) = serde_json::from_str(&repaired) {
            return Ok(value);
        }
    }

    Err(LlmError::MalformedOutput(format!(
        "unparseable JSON output: {}",
        truncate(raw, 200)
    )))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
