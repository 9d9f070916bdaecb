//! Database models.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Sender role value for messages from the external contact.
pub const SENDER_CONTACT: &str = "contact";
/// Sender role value for messages the tenant typed on their own device.
pub const SENDER_TENANT: &str = "tenant";
/// Sender role value for automated replies.
pub const SENDER_BOT: &str = "bot";

/// Generate a fresh row ID.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
///
/// The fixed format keeps timestamps lexicographically ordered, which the
/// cooldown cutoff query relies on.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One chat turn. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub tenant_id: String,
    /// One of [`SENDER_CONTACT`], [`SENDER_TENANT`], [`SENDER_BOT`].
    pub sender: String,
    pub content: String,
    /// "text", "image", or "voice".
    pub kind: String,
    /// "normal", "important", or "emergency". Set once at creation.
    pub urgency: String,
    pub is_auto_reply: bool,
    pub created_at: String,
}

/// One (tenant, external contact) thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: String,
    pub tenant_id: String,
    /// Phone number or platform handle of the contact.
    pub contact_id: String,
    /// Display name from platform metadata, last write wins.
    pub contact_name: Option<String>,
    pub unread_count: i64,
    pub last_message_at: String,
}

/// Per-tenant feature toggles. The core only reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Settings {
    pub tenant_id: String,
    pub auto_reply_enabled: bool,
    /// When true, emergency messages get a notification instead of an
    /// automated reply.
    pub emergency_notify: bool,
    pub fallback_text: String,
    pub llm_api_key: Option<String>,
    pub updated_at: String,
}

/// Stored personality profile row. `learned_style` is opaque JSON owned
/// by the persona crate; `training_message_count` and `last_trained_at`
/// track staleness for the auto-retrain trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PersonalityRow {
    pub tenant_id: String,
    pub tone: String,
    pub avg_length: i64,
    pub use_emoji: bool,
    /// 0-100.
    pub formality: i64,
    /// JSON array of manually configured phrases.
    pub example_phrases: String,
    /// Artificial delay before dispatching a reply, in milliseconds.
    pub response_delay_ms: i64,
    pub learned_style: Option<String>,
    pub last_trained_at: Option<String>,
    pub training_message_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_unique() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn test_now_rfc3339_sorts_lexicographically() {
        let a = now_rfc3339();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = now_rfc3339();
        assert!(a < b);
    }
}
