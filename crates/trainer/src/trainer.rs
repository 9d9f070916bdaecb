//! Two-phase training run.

use futures::stream::{self, StreamExt};
use llm_client::TextGenerator;
use persona::{contact_key, ContactStyle, LearnedStyle};
use serde::Serialize;
use tracing::{info, warn};

use database::message::ConversationActivity;
use database::models::{SENDER_CONTACT, SENDER_TENANT};
use database::{message, now_rfc3339, profile, settings, Database, DatabaseError};

use crate::error::TrainerError;
use crate::prompts;
use crate::stats;

/// Training tunables.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// How many recent self-authored messages phase 1 reads.
    pub max_messages: i64,
    /// Per-message character cap before the text enters a prompt.
    pub per_message_cap: usize,
    /// Minimum usable messages below which training refuses to run.
    pub min_messages: usize,
    /// How many conversations phase 2 analyzes at most.
    pub top_contacts: i64,
    /// Minimum self-authored messages a conversation needs to qualify
    /// for phase 2.
    pub min_contact_messages: i64,
    /// Cap on they-said/you-replied pairs per contact prompt.
    pub max_pairs: usize,
    /// How many interleaved turns to read per conversation.
    pub history_window: i64,
    /// How many own messages to quote per contact prompt.
    pub max_own_messages: usize,
    /// Concurrent phase-2 model calls.
    pub phase2_concurrency: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_messages: 500,
            per_message_cap: 500,
            min_messages: 3,
            top_contacts: 10,
            min_contact_messages: 5,
            max_pairs: 20,
            history_window: 100,
            max_own_messages: 50,
            phase2_concurrency: 3,
        }
    }
}

/// What a completed training run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub tenant_id: String,
    pub messages_analyzed: i64,
    pub contacts_analyzed: u32,
    /// True when phase 1 fell back to local statistics.
    pub used_fallback: bool,
    /// The style the run learned, exactly as persisted.
    pub learned_style: LearnedStyle,
}

/// Learns a tenant's texting style from their own outgoing messages.
///
/// Phase 1 analyzes all recent messages together for global patterns;
/// phase 2 analyzes the busiest conversations individually. The result
/// replaces any previously learned style wholesale.
pub struct StyleTrainer<L: TextGenerator> {
    db: Database,
    llm: L,
    config: TrainerConfig,
}

impl<L: TextGenerator> StyleTrainer<L> {
    pub fn new(db: Database, llm: L, config: TrainerConfig) -> Self {
        Self { db, llm, config }
    }

    /// Run a full training pass for one tenant.
    pub async fn train(&self, tenant_id: &str) -> Result<TrainingReport, TrainerError> {
        let settings = match settings::get_settings(self.db.pool(), tenant_id).await {
            Ok(s) => s,
            Err(DatabaseError::NotFound { .. }) => return Err(TrainerError::MissingCredential),
            Err(e) => return Err(e.into()),
        };
        let api_key = settings
            .llm_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(TrainerError::MissingCredential)?;

        let rows =
            message::tenant_messages(self.db.pool(), tenant_id, self.config.max_messages).await?;
        let texts: Vec<String> = rows
            .iter()
            .filter(|m| !m.content.trim().is_empty())
            .map(|m| cap(&m.content, self.config.per_message_cap))
            .collect();
        if texts.len() < self.config.min_messages {
            return Err(TrainerError::InsufficientData {
                message_count: texts.len() as i64,
            });
        }

        info!("[{}] Training on {} messages", tenant_id, texts.len());
        let mut style = self.global_analysis(&texts, api_key).await;
        if style.avg_word_count.is_none() {
            style.avg_word_count = Some(stats::avg_word_count(&texts));
        }

        let candidates = message::busiest_conversations(
            self.db.pool(),
            tenant_id,
            self.config.min_contact_messages,
            self.config.top_contacts,
        )
        .await?;
        let analyzed: Vec<Option<(String, ContactStyle)>> = stream::iter(candidates)
            .map(|activity| self.analyze_contact(activity, api_key))
            .buffer_unordered(self.config.phase2_concurrency)
            .collect()
            .await;
        for (key, contact_style) in analyzed.into_iter().flatten() {
            style.per_contact.insert(key, contact_style);
        }
        style.contacts_analyzed = style.per_contact.len() as u32;

        // The staleness counter covers ALL self-authored messages, not
        // just the window phase 1 read, so the auto-retrain trigger
        // doesn't refire forever once history outgrows the window.
        let total_messages = message::count_tenant_messages(self.db.pool(), tenant_id).await?;
        let avg_length = style
            .avg_word_count
            .map(|w| w.round().max(1.0) as i64);
        profile::save_training_result(
            self.db.pool(),
            tenant_id,
            &style.to_json()?,
            &now_rfc3339(),
            total_messages,
            avg_length,
        )
        .await?;

        info!(
            "[{}] Training complete: {} contacts analyzed{}",
            tenant_id,
            style.contacts_analyzed,
            if style.fallback_reason.is_some() {
                " (local fallback)"
            } else {
                ""
            }
        );
        Ok(TrainingReport {
            tenant_id: tenant_id.to_string(),
            messages_analyzed: texts.len() as i64,
            contacts_analyzed: style.contacts_analyzed,
            used_fallback: style.fallback_reason.is_some(),
            learned_style: style,
        })
    }

    /// Phase 1. Never fails: a model or parse failure degrades to local
    /// statistics flagged with the failure reason.
    async fn global_analysis(&self, texts: &[String], api_key: &str) -> LearnedStyle {
        match self
            .llm
            .generate_json(&prompts::global_prompt(texts), api_key)
            .await
        {
            Ok(value) => match serde_json::from_value::<LearnedStyle>(value) {
                Ok(style) => style,
                Err(e) => {
                    warn!("Global analysis output unusable: {}", e);
                    self.local_fallback(texts, format!("unusable analysis output: {}", e))
                }
            },
            Err(e) => {
                warn!("Global analysis failed: {}", e);
                self.local_fallback(texts, e.to_string())
            }
        }
    }

    fn local_fallback(&self, texts: &[String], reason: String) -> LearnedStyle {
        LearnedStyle {
            emoji_favorites: stats::favorite_emojis(texts),
            avg_word_count: Some(stats::avg_word_count(texts)),
            fallback_reason: Some(reason),
            ..Default::default()
        }
    }

    /// Phase 2 for one conversation. Any failure skips the contact; the
    /// run carries on with the rest.
    async fn analyze_contact(
        &self,
        activity: ConversationActivity,
        api_key: &str,
    ) -> Option<(String, ContactStyle)> {
        let display_name = activity
            .contact_name
            .clone()
            .unwrap_or_else(|| activity.contact_id.clone());

        let history = match message::recent_messages(
            self.db.pool(),
            &activity.conversation_id,
            self.config.history_window,
        )
        .await
        {
            Ok(h) => h,
            Err(e) => {
                warn!("Skipping contact {}: history load failed: {}", display_name, e);
                return None;
            }
        };

        let own: Vec<&str> = history
            .iter()
            .filter(|m| m.sender == SENDER_TENANT)
            .map(|m| m.content.as_str())
            .take(self.config.max_own_messages)
            .collect();
        if own.is_empty() {
            return None;
        }

        let mut pairs: Vec<(String, String)> = history
            .windows(2)
            .filter(|w| w[0].sender == SENDER_CONTACT && w[1].sender == SENDER_TENANT)
            .map(|w| (w[0].content.clone(), w[1].content.clone()))
            .collect();
        if pairs.len() > self.config.max_pairs {
            pairs.drain(..pairs.len() - self.config.max_pairs);
        }

        let prompt = prompts::contact_prompt(&display_name, &own, &pairs);
        match self.llm.generate_json(&prompt, api_key).await {
            Ok(value) => match serde_json::from_value::<ContactStyle>(value) {
                Ok(mut contact_style) => {
                    contact_style.contact_name = display_name.clone();
                    contact_style.messages_analyzed = activity.message_count.max(0) as u32;
                    info!(
                        "Per-contact analysis done for {}: {} messages",
                        display_name, activity.message_count
                    );
                    Some((contact_key(&display_name), contact_style))
                }
                Err(e) => {
                    warn!("Per-contact output unusable for {}: {}", display_name, e);
                    None
                }
            },
            Err(e) => {
                warn!("Per-contact analysis failed for {}: {}", display_name, e);
                None
            }
        }
    }
}

/// Char-boundary-safe truncation.
fn cap(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use database::conversation::upsert_on_message;
    use database::message::insert_message;
    use database::models::{new_id, Message};
    use database::settings::upsert_settings;
    use database::Settings;
    use llm_client::LlmError;
    use serde_json::{json, Value};

    struct FakeLlm {
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for FakeLlm {
        async fn generate_text(&self, _prompt: &str, _key: &str) -> Result<String, LlmError> {
            Err(LlmError::MalformedOutput("not used".to_string()))
        }

        async fn generate_json(&self, prompt: &str, _key: &str) -> Result<Value, LlmError> {
            if self.fail {
                return Err(LlmError::RateLimited);
            }
            if prompt.starts_with("Analyze how this person talks to") {
                Ok(json!({
                    "tone": "playful",
                    "language": "Hinglish",
                    "sample_replies": ["haan bro", "chal milte hain"]
                }))
            } else {
                Ok(json!({
                    "greetings": ["oyee", "yo"],
                    "affirmatives": ["haan", "hmm"],
                    "avg_word_count": 6,
                    "tone_summary": "casual and quick"
                }))
            }
        }
    }

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn seed_settings(db: &Database, tenant_id: &str, api_key: Option<&str>) {
        let settings = Settings {
            tenant_id: tenant_id.to_string(),
            auto_reply_enabled: false,
            emergency_notify: true,
            fallback_text: "busy".to_string(),
            llm_api_key: api_key.map(|k| k.to_string()),
            updated_at: now_rfc3339(),
        };
        upsert_settings(db.pool(), &settings).await.unwrap();
    }

    async fn seed_conversation(
        db: &Database,
        tenant_id: &str,
        contact_id: &str,
        contact_name: Option<&str>,
        turns: &[(&str, &str)],
    ) -> String {
        let convo = upsert_on_message(db.pool(), tenant_id, contact_id, contact_name, false)
            .await
            .unwrap();
        for (i, (sender, content)) in turns.iter().enumerate() {
            let msg = Message {
                id: new_id(),
                conversation_id: convo.id.clone(),
                tenant_id: tenant_id.to_string(),
                sender: sender.to_string(),
                content: content.to_string(),
                kind: "text".to_string(),
                urgency: "normal".to_string(),
                is_auto_reply: false,
                created_at: format!("2024-03-01T10:{:02}:00.000Z", i),
            };
            insert_message(db.pool(), &msg).await.unwrap();
        }
        convo.id
    }

    fn trainer(db: Database, fail: bool) -> StyleTrainer<FakeLlm> {
        StyleTrainer::new(db, FakeLlm { fail }, TrainerConfig::default())
    }

    #[tokio::test]
    async fn test_insufficient_data() {
        let db = test_db().await;
        seed_settings(&db, "tenant-1", Some("key")).await;
        seed_conversation(
            &db,
            "tenant-1",
            "+15550001",
            None,
            &[(SENDER_TENANT, "hey"), (SENDER_TENANT, "ok cool")],
        )
        .await;

        let err = trainer(db, false).train("tenant-1").await.unwrap_err();
        match err {
            TrainerError::InsufficientData { message_count } => assert_eq!(message_count, 2),
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let db = test_db().await;
        seed_settings(&db, "tenant-1", None).await;

        let err = trainer(db, false).train("tenant-1").await.unwrap_err();
        assert!(matches!(err, TrainerError::MissingCredential));
    }

    #[tokio::test]
    async fn test_full_run_learns_global_and_contact_style() {
        let db = test_db().await;
        seed_settings(&db, "tenant-1", Some("key")).await;
        seed_conversation(
            &db,
            "tenant-1",
            "+15550001",
            Some("Rahul"),
            &[
                (SENDER_CONTACT, "lunch today?"),
                (SENDER_TENANT, "haan chal"),
                (SENDER_TENANT, "kab aa raha hai"),
                (SENDER_CONTACT, "at 1"),
                (SENDER_TENANT, "thik hai"),
                (SENDER_TENANT, "oyee don't be late"),
                (SENDER_TENANT, "chal bye"),
            ],
        )
        .await;

        let report = trainer(db.clone(), false).train("tenant-1").await.unwrap();
        assert_eq!(report.messages_analyzed, 5);
        assert_eq!(report.contacts_analyzed, 1);
        assert!(!report.used_fallback);

        let row = profile::get_profile(db.pool(), "tenant-1").await.unwrap();
        let learned = LearnedStyle::from_json(row.learned_style.as_deref().unwrap()).unwrap();
        // The report hands the caller the same style that was persisted.
        assert_eq!(report.learned_style, learned);
        assert_eq!(learned.greetings, vec!["oyee", "yo"]);
        assert_eq!(learned.contacts_analyzed, 1);
        let contact = learned.contact_style("Rahul").unwrap();
        assert_eq!(contact.tone.as_deref(), Some("playful"));
        assert_eq!(contact.messages_analyzed, 5);
        assert_eq!(row.training_message_count, 5);
        assert_eq!(row.avg_length, 6);
    }

    #[tokio::test]
    async fn test_model_failure_falls_back_to_local_stats() {
        let db = test_db().await;
        seed_settings(&db, "tenant-1", Some("key")).await;
        seed_conversation(
            &db,
            "tenant-1",
            "+15550001",
            None,
            &[
                (SENDER_TENANT, "on my way 🔥"),
                (SENDER_TENANT, "five minutes 🔥"),
                (SENDER_TENANT, "here"),
            ],
        )
        .await;

        let report = trainer(db.clone(), true).train("tenant-1").await.unwrap();
        assert!(report.used_fallback);
        assert_eq!(report.contacts_analyzed, 0);
        assert!(report.learned_style.fallback_reason.is_some());

        let row = profile::get_profile(db.pool(), "tenant-1").await.unwrap();
        let learned = LearnedStyle::from_json(row.learned_style.as_deref().unwrap()).unwrap();
        assert!(learned.fallback_reason.is_some());
        assert_eq!(learned.emoji_favorites, vec!["🔥"]);
        assert!(learned.avg_word_count.unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_quiet_conversations_skip_phase_two() {
        let db = test_db().await;
        seed_settings(&db, "tenant-1", Some("key")).await;
        // Four self-authored messages: enough for phase 1, below the
        // five-message bar for phase 2.
        seed_conversation(
            &db,
            "tenant-1",
            "+15550001",
            Some("Sam"),
            &[
                (SENDER_TENANT, "hey"),
                (SENDER_TENANT, "sure"),
                (SENDER_TENANT, "sounds good"),
                (SENDER_TENANT, "see you"),
            ],
        )
        .await;

        let report = trainer(db, false).train("tenant-1").await.unwrap();
        assert_eq!(report.contacts_analyzed, 0);
    }

    #[test]
    fn test_cap_respects_char_boundaries() {
        assert_eq!(cap("héllo", 2), "hé");
        assert_eq!(cap("hi", 10), "hi");
    }
}
