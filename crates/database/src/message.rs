//! Message persistence and history queries.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{Message, SENDER_TENANT};

/// Insert a message. Messages are immutable; there is no update path.
pub async fn insert_message(pool: &SqlitePool, message: &Message) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO messages
            (id, conversation_id, tenant_id, sender, content, kind, urgency, is_auto_reply, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&message.id)
    .bind(&message.conversation_id)
    .bind(&message.tenant_id)
    .bind(&message.sender)
    .bind(&message.content)
    .bind(&message.kind)
    .bind(&message.urgency)
    .bind(message.is_auto_reply)
    .bind(&message.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Last `limit` messages in a conversation, oldest first.
pub async fn recent_messages(
    pool: &SqlitePool,
    conversation_id: &str,
    limit: i64,
) -> Result<Vec<Message>> {
    let mut messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, conversation_id, tenant_id, sender, content, kind, urgency, is_auto_reply, created_at
        FROM messages
        WHERE conversation_id = ?
        ORDER BY created_at DESC
        LIMIT ?
        "#,
    )
    .bind(conversation_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    messages.reverse();
    Ok(messages)
}

/// A conversation ranked by how many messages the tenant wrote in it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ConversationActivity {
    pub conversation_id: String,
    pub contact_id: String,
    pub contact_name: Option<String>,
    pub message_count: i64,
}

/// Conversations where the tenant wrote at least `min_messages` messages,
/// busiest first. The trainer analyzes the top slice of these.
pub async fn busiest_conversations(
    pool: &SqlitePool,
    tenant_id: &str,
    min_messages: i64,
    limit: i64,
) -> Result<Vec<ConversationActivity>> {
    let rows = sqlx::query_as::<_, ConversationActivity>(
        r#"
        SELECT m.conversation_id, c.contact_id, c.contact_name, COUNT(*) AS message_count
        FROM messages m
        JOIN conversations c ON c.id = m.conversation_id
        WHERE m.tenant_id = ? AND m.sender = ?
        GROUP BY m.conversation_id
        HAVING COUNT(*) >= ?
        ORDER BY COUNT(*) DESC
        LIMIT ?
        "#,
    )
    .bind(tenant_id)
    .bind(SENDER_TENANT)
    .bind(min_messages)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// True if a bot auto-reply exists in this conversation at or after the
/// cutoff timestamp. Timestamps share a fixed RFC 3339 format, so string
/// comparison is chronological.
pub async fn has_recent_auto_reply(
    pool: &SqlitePool,
    conversation_id: &str,
    cutoff: &str,
) -> Result<bool> {
    let found = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM messages
        WHERE conversation_id = ?
          AND is_auto_reply = 1
          AND created_at >= ?
        "#,
    )
    .bind(conversation_id)
    .bind(cutoff)
    .fetch_one(pool)
    .await?;

    Ok(found > 0)
}

/// Total count of tenant-authored messages for a tenant.
pub async fn count_tenant_messages(pool: &SqlitePool, tenant_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM messages
        WHERE tenant_id = ? AND sender = ?
        "#,
    )
    .bind(tenant_id)
    .bind(SENDER_TENANT)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Most recent tenant-authored messages across all conversations, newest
/// first. This is the trainer's raw material.
pub async fn tenant_messages(
    pool: &SqlitePool,
    tenant_id: &str,
    limit: i64,
) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, conversation_id, tenant_id, sender, content, kind, urgency, is_auto_reply, created_at
        FROM messages
        WHERE tenant_id = ? AND sender = ?
        ORDER BY created_at DESC
        LIMIT ?
        "#,
    )
    .bind(tenant_id)
    .bind(SENDER_TENANT)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}
