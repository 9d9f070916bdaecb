//! HTTP implementation of the reply gateway.

use async_trait::async_trait;
use orchestrator::{OrchestratorError, ReplyGateway};
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct SendTextRequest<'a> {
    number: &'a str,
    text: &'a str,
    delay: u64,
}

/// Dispatches replies through the WhatsApp send gateway's
/// `sendText` endpoint, authenticated with a static `apikey` header.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    instance: String,
}

impl HttpGateway {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
            api_key: config.gateway_api_key.clone(),
            instance: config.gateway_instance.clone(),
        }
    }

    fn send_url(&self) -> String {
        format!("{}/message/sendText/{}", self.base_url, self.instance)
    }
}

#[async_trait]
impl ReplyGateway for HttpGateway {
    async fn send(
        &self,
        tenant_id: &str,
        contact_id: &str,
        text: &str,
        delay_ms: u64,
    ) -> Result<(), OrchestratorError> {
        let body = SendTextRequest {
            number: contact_id,
            text,
            delay: delay_ms,
        };

        debug!("[{}] Dispatching reply to {}", tenant_id, contact_id);
        let response = self
            .client
            .post(self.send_url())
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OrchestratorError::Gateway(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(OrchestratorError::Gateway(format!(
                "gateway returned {}: {}",
                status, detail
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_url_shape() {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            gateway_url: "http://gw.example/".to_string(),
            gateway_api_key: "secret".to_string(),
            gateway_instance: "main".to_string(),
        };
        let gateway = HttpGateway::new(&config);
        assert_eq!(gateway.send_url(), "http://gw.example/message/sendText/main");
    }

    #[test]
    fn test_request_body_shape() {
        let body = SendTextRequest {
            number: "919876543210",
            text: "on my way",
            delay: 2000,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "number": "919876543210", "text": "on my way", "delay": 2000 })
        );
    }
}
