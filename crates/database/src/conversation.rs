//! Conversation upsert and lookup.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{new_id, now_rfc3339, Conversation};

/// Create or refresh the conversation for a (tenant, contact) pair.
///
/// Created lazily on first message. On later messages the display name is
/// refreshed (last write wins, never cleared), the unread counter is
/// incremented unless `suppress_unread` is set (tenant-authored messages
/// and bot replies don't count as unread), and the activity timestamp
/// is bumped. The increment happens inside the upsert so two concurrent
/// events cannot lose a count.
pub async fn upsert_on_message(
    pool: &SqlitePool,
    tenant_id: &str,
    contact_id: &str,
    contact_name: Option<&str>,
    suppress_unread: bool,
) -> Result<Conversation> {
    let unread_increment: i64 = if suppress_unread { 0 } else { 1 };

    let conversation = sqlx::query_as::<_, Conversation>(
        r#"
        INSERT INTO conversations (id, tenant_id, contact_id, contact_name, unread_count, last_message_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (tenant_id, contact_id) DO UPDATE SET
            contact_name = COALESCE(excluded.contact_name, conversations.contact_name),
            unread_count = conversations.unread_count + excluded.unread_count,
            last_message_at = excluded.last_message_at
        RETURNING id, tenant_id, contact_id, contact_name, unread_count, last_message_at
        "#,
    )
    .bind(new_id())
    .bind(tenant_id)
    .bind(contact_id)
    .bind(contact_name)
    .bind(unread_increment)
    .bind(now_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(conversation)
}

/// Get a conversation by ID.
pub async fn get_conversation(pool: &SqlitePool, id: &str) -> Result<Conversation> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, tenant_id, contact_id, contact_name, unread_count, last_message_at
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Conversation",
        id: id.to_string(),
    })
}
