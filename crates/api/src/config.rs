//! Process configuration from environment variables.

use std::env;

/// Everything the binary needs to start. Missing variables fall back to
/// local-development defaults; the send gateway key defaults to empty and
/// simply fails dispatch until configured.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Base URL of the WhatsApp send gateway.
    pub gateway_url: String,
    pub gateway_api_key: String,
    /// Gateway instance name, part of the send URL path.
    pub gateway_instance: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:busybot.db?mode=rwc".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            gateway_url: env::var("GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            gateway_api_key: env::var("GATEWAY_API_KEY").unwrap_or_default(),
            gateway_instance: env::var("GATEWAY_INSTANCE").unwrap_or_else(|_| "main".to_string()),
        }
    }
}
