//! Per-tenant fan-out of parsed events.

use std::sync::Arc;
use std::time::Duration;

use llm_client::TextGenerator;
use orchestrator::{InboundMessage, MessageKind, ReplyGateway, ReplyOrchestrator, ReplyOutcome};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{error, info, warn};
use trainer::StyleTrainer;

use database::models::SENDER_TENANT;
use database::{conversation, message, new_id, now_rfc3339, profile, settings, Database, Message, Settings};

use crate::error::ListenerError;
use crate::payload::{parse_event, ParsedEvent, WebhookEvent};

/// Fan-out tunables.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Hard cap on processing time per tenant, covering the model call's
    /// own retries. One slow tenant must not stall the rest.
    pub tenant_deadline: Duration,
    /// New self-authored messages since the last training run that
    /// trigger a background retrain.
    pub retrain_threshold: i64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            tenant_deadline: Duration::from_secs(30),
            retrain_threshold: 50,
        }
    }
}

/// How one tenant's processing of an event ended.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum TenantResult {
    /// Ran the reply pipeline to a terminal outcome.
    Processed {
        #[serde(flatten)]
        outcome: ReplyOutcome,
    },
    /// Stored an own message as training material.
    Learned { retrain_started: bool },
    /// Processing failed; other tenants were unaffected.
    Failed { error: String },
    /// The per-tenant deadline expired.
    TimedOut,
}

#[derive(Debug, Serialize)]
pub struct TenantOutcome {
    pub tenant_id: String,
    #[serde(flatten)]
    pub result: TenantResult,
}

/// Response body for one webhook event.
#[derive(Debug, Serialize)]
pub struct EventSummary {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tenants: Vec<TenantOutcome>,
}

impl EventSummary {
    fn ignored(reason: &'static str) -> Self {
        Self {
            status: "ignored",
            reason: Some(reason),
            tenants: Vec::new(),
        }
    }

    fn handled(tenants: Vec<TenantOutcome>) -> Self {
        Self {
            status: "handled",
            reason: None,
            tenants,
        }
    }
}

/// Routes parsed webhook events to every registered tenant.
///
/// Tenant resolution is a broadcast over all settings rows; each tenant
/// is processed in isolation under its own deadline, so one tenant's
/// failure or slowness never leaks into another's outcome.
pub struct EventListener<G, L>
where
    G: ReplyGateway + 'static,
    L: TextGenerator + 'static,
{
    db: Database,
    orchestrator: Arc<ReplyOrchestrator<G, L>>,
    trainer: Arc<StyleTrainer<L>>,
    config: ListenerConfig,
}

impl<G, L> EventListener<G, L>
where
    G: ReplyGateway + 'static,
    L: TextGenerator + 'static,
{
    pub fn new(
        db: Database,
        orchestrator: Arc<ReplyOrchestrator<G, L>>,
        trainer: Arc<StyleTrainer<L>>,
        config: ListenerConfig,
    ) -> Self {
        Self {
            db,
            orchestrator,
            trainer,
            config,
        }
    }

    /// Handle one webhook event end to end.
    pub async fn handle_event(&self, event: &WebhookEvent) -> Result<EventSummary, ListenerError> {
        match parse_event(event) {
            ParsedEvent::Ignored(reason) => {
                info!("Ignoring event {}: {}", event.event, reason);
                Ok(EventSummary::ignored(reason))
            }
            ParsedEvent::FromTenant {
                contact_id,
                text,
                kind,
            } => self.learn(&contact_id, &text, kind).await,
            ParsedEvent::FromContact(inbound) => self.fan_out(&inbound).await,
        }
    }

    /// Contact message: run the reply pipeline for every tenant.
    async fn fan_out(&self, inbound: &InboundMessage) -> Result<EventSummary, ListenerError> {
        let tenants = settings::list_settings(self.db.pool()).await?;
        let mut outcomes = Vec::with_capacity(tenants.len());

        for tenant in &tenants {
            let result = match timeout(
                self.config.tenant_deadline,
                self.orchestrator.handle_inbound(tenant, inbound),
            )
            .await
            {
                Ok(Ok(outcome)) => TenantResult::Processed { outcome },
                Ok(Err(e)) => {
                    error!("[{}] Processing failed: {}", tenant.tenant_id, e);
                    TenantResult::Failed {
                        error: e.to_string(),
                    }
                }
                Err(_elapsed) => {
                    error!(
                        "[{}] Deadline ({:?}) exceeded",
                        tenant.tenant_id, self.config.tenant_deadline
                    );
                    TenantResult::TimedOut
                }
            };
            outcomes.push(TenantOutcome {
                tenant_id: tenant.tenant_id.clone(),
                result,
            });
        }

        Ok(EventSummary::handled(outcomes))
    }

    /// Own message: store it as training material for every tenant and
    /// kick off a background retrain once enough new material piled up.
    async fn learn(
        &self,
        contact_id: &str,
        text: &str,
        kind: MessageKind,
    ) -> Result<EventSummary, ListenerError> {
        let tenants = settings::list_settings(self.db.pool()).await?;
        let mut outcomes = Vec::with_capacity(tenants.len());

        for tenant in &tenants {
            let result = match self.store_own_message(tenant, contact_id, text, kind).await {
                Ok(()) => {
                    let retrain_started = match self.maybe_retrain(tenant).await {
                        Ok(started) => started,
                        Err(e) => {
                            warn!("[{}] Retrain check failed: {}", tenant.tenant_id, e);
                            false
                        }
                    };
                    TenantResult::Learned { retrain_started }
                }
                Err(e) => {
                    error!("[{}] Learning failed: {}", tenant.tenant_id, e);
                    TenantResult::Failed {
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(TenantOutcome {
                tenant_id: tenant.tenant_id.clone(),
                result,
            });
        }

        Ok(EventSummary::handled(outcomes))
    }

    async fn store_own_message(
        &self,
        tenant: &Settings,
        contact_id: &str,
        text: &str,
        kind: MessageKind,
    ) -> Result<(), ListenerError> {
        let convo = conversation::upsert_on_message(
            self.db.pool(),
            &tenant.tenant_id,
            contact_id,
            None,
            true,
        )
        .await?;

        let msg = Message {
            id: new_id(),
            conversation_id: convo.id,
            tenant_id: tenant.tenant_id.clone(),
            sender: SENDER_TENANT.to_string(),
            content: text.to_string(),
            kind: kind.as_str().to_string(),
            urgency: "normal".to_string(),
            is_auto_reply: false,
            created_at: now_rfc3339(),
        };
        message::insert_message(self.db.pool(), &msg).await?;
        Ok(())
    }

    /// Spawn a detached training run if the tenant accumulated enough new
    /// messages and has a credential. The spawned task's failure is
    /// logged, never surfaced.
    async fn maybe_retrain(&self, tenant: &Settings) -> Result<bool, ListenerError> {
        if tenant
            .llm_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .is_none()
        {
            return Ok(false);
        }

        let total = message::count_tenant_messages(self.db.pool(), &tenant.tenant_id).await?;
        let trained = profile::find_profile(self.db.pool(), &tenant.tenant_id)
            .await?
            .map(|p| p.training_message_count)
            .unwrap_or(0);
        if total - trained < self.config.retrain_threshold {
            return Ok(false);
        }

        info!(
            "[{}] Auto-retrain triggered: {} new messages since last run",
            tenant.tenant_id,
            total - trained
        );
        let trainer = self.trainer.clone();
        let tenant_id = tenant.tenant_id.clone();
        tokio::spawn(async move {
            if let Err(e) = trainer.train(&tenant_id).await {
                error!("Background retrain failed for {}: {}", tenant_id, e);
            }
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use database::settings::upsert_settings;
    use llm_client::LlmError;
    use orchestrator::{OrchestratorConfig, OrchestratorError};
    use serde_json::json;
    use trainer::TrainerConfig;

    #[derive(Clone)]
    struct FastGateway;

    #[async_trait]
    impl ReplyGateway for FastGateway {
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

    #[derive(Clone)]
    struct SlowGateway;

    #[async_trait]
    impl ReplyGateway for SlowGateway {
        async fn send(
            &self,
            _tenant_id: &str,
            _contact_id: &str,
            _text: &str,
            _delay_ms: u64,
        ) -> Result<(), OrchestratorError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        }
    }

    struct NoLlm;

    #[async_trait]
    impl TextGenerator for NoLlm {
        async fn generate_text(&self, _prompt: &str, _key: &str) -> Result<String, LlmError> {
            Err(LlmError::RateLimited)
        }

        async fn generate_json(
            &self,
            _prompt: &str,
            _key: &str,
        ) -> Result<serde_json::Value, LlmError> {
            Err(LlmError::RateLimited)
        }
    }

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn seed_tenant(db: &Database, tenant_id: &str, enabled: bool, api_key: Option<&str>) {
        let settings = Settings {
            tenant_id: tenant_id.to_string(),
            auto_reply_enabled: enabled,
            emergency_notify: true,
            fallback_text: "busy rn".to_string(),
            llm_api_key: api_key.map(|k| k.to_string()),
            updated_at: now_rfc3339(),
        };
        upsert_settings(db.pool(), &settings).await.unwrap();
    }

    fn listener<G: ReplyGateway + 'static>(
        db: Database,
        gateway: G,
    ) -> EventListener<G, NoLlm> {
        listener_with(db, gateway, ListenerConfig::default())
    }

    fn listener_with<G: ReplyGateway + 'static>(
        db: Database,
        gateway: G,
        config: ListenerConfig,
    ) -> EventListener<G, NoLlm> {
        let orchestrator = Arc::new(ReplyOrchestrator::new(
            db.clone(),
            gateway,
            NoLlm,
            OrchestratorConfig::default(),
        ));
        let trainer = Arc::new(StyleTrainer::new(db.clone(), NoLlm, TrainerConfig::default()));
        EventListener::new(db, orchestrator, trainer, config)
    }

    fn contact_event(text: &str) -> WebhookEvent {
        serde_json::from_value(json!({
            "event": "messages.upsert",
            "data": {
                "key": { "remoteJid": "919876543210@s.whatsapp.net", "fromMe": false },
                "pushName": "Sam",
                "message": { "conversation": text }
            }
        }))
        .unwrap()
    }

    fn own_event(text: &str) -> WebhookEvent {
        serde_json::from_value(json!({
            "event": "messages.upsert",
            "data": {
                "key": { "remoteJid": "919876543210@s.whatsapp.net", "fromMe": true },
                "message": { "conversation": text }
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_fan_out_isolates_tenants() {
        let db = test_db().await;
        seed_tenant(&db, "tenant-off", false, None).await;
        seed_tenant(&db, "tenant-on", true, None).await;
        let listener = listener(db, FastGateway);

        let summary = listener
            .handle_event(&contact_event("hello, anyone home?"))
            .await
            .unwrap();

        assert_eq!(summary.status, "handled");
        assert_eq!(summary.tenants.len(), 2);
        // list_settings orders by tenant id: "tenant-off" < "tenant-on".
        match &summary.tenants[0].result {
            TenantResult::Processed { outcome } => {
                assert!(matches!(outcome, ReplyOutcome::Skipped { .. }))
            }
            other => panic!("unexpected {:?}", other),
        }
        match &summary.tenants[1].result {
            TenantResult::Processed { outcome } => {
                assert!(matches!(outcome, ReplyOutcome::Sent { .. }))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_message_event_ignored() {
        let db = test_db().await;
        let listener = listener(db, FastGateway);
        let event: WebhookEvent =
            serde_json::from_value(json!({ "event": "connection.update" })).unwrap();

        let summary = listener.handle_event(&event).await.unwrap();
        assert_eq!(summary.status, "ignored");
        assert_eq!(summary.reason, Some("unsupported_event"));
    }

    #[tokio::test]
    async fn test_own_message_stored_for_learning() {
        let db = test_db().await;
        seed_tenant(&db, "tenant-1", true, None).await;
        let listener = listener(db.clone(), FastGateway);

        let summary = listener
            .handle_event(&own_event("omw, 10 mins"))
            .await
            .unwrap();

        match &summary.tenants[0].result {
            TenantResult::Learned { retrain_started } => assert!(!retrain_started),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            message::count_tenant_messages(db.pool(), "tenant-1")
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_retrain_triggers_at_threshold() {
        let db = test_db().await;
        seed_tenant(&db, "tenant-1", true, Some("key")).await;
        let convo =
            conversation::upsert_on_message(db.pool(), "tenant-1", "+15550001", None, true)
                .await
                .unwrap();
        for i in 0..49 {
            let msg = Message {
                id: new_id(),
                conversation_id: convo.id.clone(),
                tenant_id: "tenant-1".to_string(),
                sender: SENDER_TENANT.to_string(),
                content: format!("message number {}", i),
                kind: "text".to_string(),
                urgency: "normal".to_string(),
                is_auto_reply: false,
                created_at: format!("2024-05-01T00:{:02}:{:02}.000Z", i / 60, i % 60),
            };
            message::insert_message(db.pool(), &msg).await.unwrap();
        }
        let listener = listener(db, FastGateway);

        // The 50th message crosses the threshold.
        let summary = listener
            .handle_event(&own_event("and one more thing"))
            .await
            .unwrap();
        match &summary.tenants[0].result {
            TenantResult::Learned { retrain_started } => assert!(retrain_started),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_retrain_without_credential() {
        let db = test_db().await;
        seed_tenant(&db, "tenant-1", true, None).await;
        let convo =
            conversation::upsert_on_message(db.pool(), "tenant-1", "+15550001", None, true)
                .await
                .unwrap();
        for i in 0..60 {
            let msg = Message {
                id: new_id(),
                conversation_id: convo.id.clone(),
                tenant_id: "tenant-1".to_string(),
                sender: SENDER_TENANT.to_string(),
                content: format!("message number {}", i),
                kind: "text".to_string(),
                urgency: "normal".to_string(),
                is_auto_reply: false,
                created_at: format!("2024-05-01T00:{:02}:{:02}.000Z", i / 60, i % 60),
            };
            message::insert_message(db.pool(), &msg).await.unwrap();
        }
        let listener = listener(db, FastGateway);

        let summary = listener.handle_event(&own_event("more")).await.unwrap();
        match &summary.tenants[0].result {
            TenantResult::Learned { retrain_started } => assert!(!retrain_started),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_tenant_hits_deadline() {
        let db = test_db().await;
        seed_tenant(&db, "tenant-1", true, None).await;
        // Real time with a deadline far below the gateway's sleep, so the
        // test stays fast without a mocked clock.
        let config = ListenerConfig {
            tenant_deadline: Duration::from_millis(250),
            ..ListenerConfig::default()
        };
        let listener = listener_with(db, SlowGateway, config);

        let summary = listener
            .handle_event(&contact_event("hello?"))
            .await
            .unwrap();
        assert!(matches!(
            summary.tenants[0].result,
            TenantResult::TimedOut
        ));
    }
}
