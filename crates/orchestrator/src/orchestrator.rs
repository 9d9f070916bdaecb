//! The per-message reply pipeline.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use classifier::{
    classify, detect_urgency, infer_relationship, ClassificationResult, Urgency,
};
use database::{
    conversation, message, new_id, now_rfc3339, profile, Database, Message,
    PersonalityRow, Settings,
};
use llm_client::TextGenerator;
use persona::{HistoryTurn, LearnedStyle, PersonalityProfile};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::OrchestratorError;
use crate::fallback::fallback_reply;
use crate::gateway::ReplyGateway;
use crate::locks::ConversationLocks;
use crate::outcome::{ReplyOutcome, SkipReason};

/// What kind of content the inbound message carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Image,
    Voice,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Voice => "voice",
        }
    }
}

/// One inbound contact message, already extracted from the platform event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Phone number or platform handle of the contact.
    pub contact_id: String,
    /// Display name from platform metadata, if any.
    pub contact_name: Option<String>,
    /// Message text, or the caption for captioned media. Empty for
    /// media-only messages.
    pub text: String,
    pub kind: MessageKind,
    /// True when there is no usable text at all.
    pub media_only: bool,
}

/// Pipeline tunables.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Minimum gap between two automated replies in one conversation.
    pub cooldown: Duration,
    /// How many prior turns to load for relationship inference and the
    /// prompt context window.
    pub history_limit: i64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(180),
            history_limit: 20,
        }
    }
}

/// Drives one inbound message through store, skip rules, reply
/// generation, and dispatch.
///
/// Generic over the outbound gateway and the model client so tests can
/// substitute fakes for both.
pub struct ReplyOrchestrator<G: ReplyGateway, L: TextGenerator> {
    db: Database,
    gateway: G,
    llm: L,
    config: OrchestratorConfig,
    locks: ConversationLocks,
}

impl<G: ReplyGateway, L: TextGenerator> ReplyOrchestrator<G, L> {
    pub fn new(db: Database, gateway: G, llm: L, config: OrchestratorConfig) -> Self {
        Self {
            db,
            gateway,
            llm,
            config,
            locks: ConversationLocks::new(),
        }
    }

    /// Process one inbound message for one tenant.
    ///
    /// The message is stored unconditionally before anything else, so the
    /// history and the trainer see every message regardless of outcome.
    /// Skip rules run in a fixed order: media, disabled, no-reply-needed,
    /// emergency, cooldown. The whole pipeline holds the conversation
    /// lock, which makes the cooldown check and the reply that follows it
    /// atomic per conversation.
    pub async fn handle_inbound(
        &self,
        settings: &Settings,
        inbound: &InboundMessage,
    ) -> Result<ReplyOutcome, OrchestratorError> {
        let classification = if inbound.media_only {
            ClassificationResult::media()
        } else {
            classify(&inbound.text)
        };
        let urgency = if inbound.media_only {
            Urgency::Normal
        } else {
            detect_urgency(&inbound.text, classification.sentiment)
        };

        let lock_key = format!("{}:{}", settings.tenant_id, inbound.contact_id);
        let _guard = self.locks.acquire(&lock_key).await;

        let conversation = conversation::upsert_on_message(
            self.db.pool(),
            &settings.tenant_id,
            &inbound.contact_id,
            inbound.contact_name.as_deref(),
            false,
        )
        .await?;

        let stored = Message {
            id: new_id(),
            conversation_id: conversation.id.clone(),
            tenant_id: settings.tenant_id.clone(),
            sender: database::models::SENDER_CONTACT.to_string(),
            content: inbound.text.clone(),
            kind: inbound.kind.as_str().to_string(),
            urgency: urgency.as_str().to_string(),
            is_auto_reply: false,
            created_at: now_rfc3339(),
        };
        message::insert_message(self.db.pool(), &stored).await?;

        if inbound.media_only {
            debug!("[{}] Media-only message from {}, storing without reply",
                settings.tenant_id, inbound.contact_id);
            return Ok(ReplyOutcome::skipped(SkipReason::Media));
        }
        if !settings.auto_reply_enabled {
            return Ok(ReplyOutcome::skipped(SkipReason::Disabled));
        }
        if !classification.needs_reply {
            return Ok(ReplyOutcome::skipped(SkipReason::NoReplyNeeded));
        }
        if urgency == Urgency::Emergency && settings.emergency_notify {
            warn!(
                "[{}] Emergency message from {}, escalating instead of auto-replying",
                settings.tenant_id, inbound.contact_id
            );
            return Ok(ReplyOutcome::skipped(SkipReason::Emergency));
        }

        let cutoff = cooldown_cutoff(self.config.cooldown);
        if message::has_recent_auto_reply(self.db.pool(), &conversation.id, &cutoff).await? {
            debug!(
                "[{}] Cooldown active for {}, skipping",
                settings.tenant_id, inbound.contact_id
            );
            return Ok(ReplyOutcome::skipped(SkipReason::Cooldown));
        }

        let (profile, delay_ms) = self.load_profile(&settings.tenant_id).await?;

        let history_rows = message::recent_messages(
            self.db.pool(),
            &conversation.id,
            self.config.history_limit,
        )
        .await?;
        let tenant_texts: Vec<&str> = history_rows
            .iter()
            .filter(|m| m.sender == database::models::SENDER_TENANT)
            .map(|m| m.content.as_str())
            .collect();
        let relationship =
            infer_relationship(conversation.contact_name.as_deref(), &tenant_texts);
        let history: Vec<HistoryTurn> = history_rows
            .iter()
            .filter(|m| m.id != stored.id)
            .map(|m| HistoryTurn {
                from_contact: m.sender == database::models::SENDER_CONTACT,
                text: m.content.clone(),
            })
            .collect();

        let reply = match settings.llm_api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(api_key) => {
                let prompt = persona::build_reply_prompt(
                    &profile,
                    conversation.contact_name.as_deref(),
                    relationship,
                    &classification,
                    &history,
                    &inbound.text,
                );
                match self.llm.generate_text(&prompt, api_key).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(
                            "[{}] Model call failed ({}), using fallback",
                            settings.tenant_id, e
                        );
                        fallback_reply(&settings.fallback_text, &classification, urgency)
                    }
                }
            }
            None => fallback_reply(&settings.fallback_text, &classification, urgency),
        };

        match self
            .gateway
            .send(&settings.tenant_id, &inbound.contact_id, &reply, delay_ms)
            .await
        {
            Ok(()) => {
                conversation::upsert_on_message(
                    self.db.pool(),
                    &settings.tenant_id,
                    &inbound.contact_id,
                    None,
                    true,
                )
                .await?;
                let bot_message = Message {
                    id: new_id(),
                    conversation_id: conversation.id.clone(),
                    tenant_id: settings.tenant_id.clone(),
                    sender: database::models::SENDER_BOT.to_string(),
                    content: reply.clone(),
                    kind: MessageKind::Text.as_str().to_string(),
                    urgency: Urgency::Normal.as_str().to_string(),
                    is_auto_reply: true,
                    created_at: now_rfc3339(),
                };
                message::insert_message(self.db.pool(), &bot_message).await?;
                info!(
                    "[{}] Auto-replied to {}",
                    settings.tenant_id, inbound.contact_id
                );
                Ok(ReplyOutcome::Sent { reply })
            }
            Err(e) => {
                warn!(
                    "[{}] Dispatch to {} failed: {}",
                    settings.tenant_id, inbound.contact_id, e
                );
                Ok(ReplyOutcome::SendFailed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Load the tenant's personality, falling back to defaults when they
    /// never configured one. Returns the profile and the dispatch delay.
    async fn load_profile(
        &self,
        tenant_id: &str,
    ) -> Result<(PersonalityProfile, u64), OrchestratorError> {
        match profile::find_profile(self.db.pool(), tenant_id).await? {
            Some(row) => {
                let delay = row.response_delay_ms.max(0) as u64;
                Ok((profile_from_row(&row), delay))
            }
            None => Ok((PersonalityProfile::default(), 2000)),
        }
    }
}

/// Convert a stored profile row into the in-memory personality model.
/// Corrupt JSON in either field degrades to defaults rather than failing
/// the reply.
fn profile_from_row(row: &PersonalityRow) -> PersonalityProfile {
    let example_phrases: Vec<String> =
        serde_json::from_str(&row.example_phrases).unwrap_or_default();
    let learned = match row.learned_style.as_deref() {
        Some(json) => LearnedStyle::from_json(json).unwrap_or_else(|e| {
            warn!("Corrupt learned style for {}: {}", row.tenant_id, e);
            LearnedStyle::default()
        }),
        None => LearnedStyle::default(),
    };
    PersonalityProfile {
        tone: row.tone.clone(),
        avg_length: row.avg_length.max(1) as u32,
        use_emoji: row.use_emoji,
        formality: row.formality.clamp(0, 100) as u8,
        example_phrases,
        learned,
    }
}

/// Oldest timestamp still inside the cooldown window, in the same fixed
/// RFC 3339 format the message table uses.
fn cooldown_cutoff(cooldown: Duration) -> String {
    let cutoff = Utc::now() - chrono::Duration::milliseconds(cooldown.as_millis() as i64);
    cutoff.to_rfc3339_opts(SecondsFormat::Millis, true)
}
