//! Configuration for the model client.

use std::env;
use std::time::Duration;

/// Default hard timeout for a single model request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Backoff schedule between retry attempts. The last entry repeats if
/// `max_retries` exceeds the schedule length.
const BACKOFF_SCHEDULE: [Duration; 2] = [Duration::from_secs(2), Duration::from_secs(5)];

/// Configuration for [`LlmClient`](crate::LlmClient).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider base URL.
    pub api_url: String,

    /// Model name.
    pub model: String,

    /// Hard timeout per request attempt, enforced by cancellation.
    pub request_timeout: Duration,

    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,

    /// Generation settings for short conversational replies.
    pub text_temperature: f32,
    pub text_max_tokens: u32,

    /// Generation settings for structured (JSON) analysis calls.
    pub json_temperature: f32,
    pub json_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.0-flash".to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_retries: 2,
            text_temperature: 0.9,
            text_max_tokens: 150,
            json_temperature: 0.3,
            json_max_tokens: 1200,
        }
    }
}

impl LlmConfig {
    /// Create configuration from environment variables.
    ///
    /// All variables are optional and fall back to defaults:
    /// - `LLM_API_URL` - provider base URL
    /// - `LLM_MODEL` - model name
    /// - `LLM_TIMEOUT_SECS` - per-request timeout
    /// - `LLM_MAX_RETRIES` - retries after the first attempt
    ///
    /// The API credential is per tenant and passed per call, so it is
    /// deliberately absent here.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = env::var("LLM_API_URL").unwrap_or(defaults.api_url);
        let model = env::var("LLM_MODEL").unwrap_or(defaults.model);
        let request_timeout = env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let max_retries = env::var("LLM_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_retries);

        Self {
            api_url,
            model,
            request_timeout,
            max_retries,
            ..defaults
        }
    }

    /// Backoff before retry attempt `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let idx = (attempt as usize).min(BACKOFF_SCHEDULE.len() - 1);
        BACKOFF_SCHEDULE[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_backoff_schedule_increases_then_caps() {
        let config = LlmConfig::default();
        assert_eq!(config.backoff(0), Duration::from_secs(2));
        assert_eq!(config.backoff(1), Duration::from_secs(5));
        assert_eq!(config.backoff(5), Duration::from_secs(5));
    }
}
