//! Outbound reply gateway trait and implementations.

use async_trait::async_trait;

use crate::error::OrchestratorError;

/// Trait for dispatching replies to the chat platform.
///
/// Abstracted to support different transports (HTTP gateway, tests, etc.)
#[async_trait]
pub trait ReplyGateway: Send + Sync {
    /// Send a reply to a contact.
    ///
    /// # Arguments
    /// * `tenant_id` - Tenant on whose behalf the reply is sent
    /// * `contact_id` - Phone number or platform handle of the recipient
    /// * `text` - Reply content
    /// * `delay_ms` - Artificial typing delay before delivery
    async fn send(
        &self,
        tenant_id: &str,
        contact_id: &str,
        text: &str,
        delay_ms: u64,
    ) -> Result<(), OrchestratorError>;
}

/// A no-op gateway for testing that discards all replies.
#[derive(Debug, Clone, Default)]
pub struct NoOpGateway;

#[async_trait]
impl ReplyGateway for NoOpGateway {
    async fn send(
        &self,
        _tenant_id: &str,
        _contact_id: &str,
        _text: &str,
        _delay_ms: u64,
    ) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

/// A logging gateway for debugging that logs all dispatches.
#[derive(Debug, Clone, Default)]
pub struct LoggingGateway;

#[async_trait]
impl ReplyGateway for LoggingGateway {
    async fn send(
        &self,
        tenant_id: &str,
        contact_id: &str,
        text: &str,
        delay_ms: u64,
    ) -> Result<(), OrchestratorError> {
        tracing::info!(
            "[{}] Sending reply to {} (delay {}ms): {}",
            tenant_id,
            contact_id,
            delay_ms,
            text
        );
        Ok(())
    }
}
