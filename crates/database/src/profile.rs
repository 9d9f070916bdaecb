//! Personality profile storage.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::PersonalityRow;

const PROFILE_COLUMNS: &str = "tenant_id, tone, avg_length, use_emoji, formality, \
     example_phrases, response_delay_ms, learned_style, last_trained_at, training_message_count";

/// Get a tenant's personality profile.
pub async fn get_profile(pool: &SqlitePool, tenant_id: &str) -> Result<PersonalityRow> {
    sqlx::query_as::<_, PersonalityRow>(&format!(
        "SELECT {} FROM personality_profiles WHERE tenant_id = ?",
        PROFILE_COLUMNS
    ))
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "PersonalityProfile",
        id: tenant_id.to_string(),
    })
}

/// Get a tenant's profile, or `None` if they have not configured one yet.
pub async fn find_profile(pool: &SqlitePool, tenant_id: &str) -> Result<Option<PersonalityRow>> {
    let row = sqlx::query_as::<_, PersonalityRow>(&format!(
        "SELECT {} FROM personality_profiles WHERE tenant_id = ?",
        PROFILE_COLUMNS
    ))
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Persist a training run: replaces the learned style wholesale and
/// refreshes the staleness counters. Creates the profile row with default
/// manual traits if the tenant never configured one.
pub async fn save_training_result(
    pool: &SqlitePool,
    tenant_id: &str,
    learned_style_json: &str,
    trained_at: &str,
    training_message_count: i64,
    avg_length: Option<i64>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO personality_profiles (tenant_id, learned_style, last_trained_at, training_message_count)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (tenant_id) DO UPDATE SET
            learned_style = excluded.learned_style,
            last_trained_at = excluded.last_trained_at,
            training_message_count = excluded.training_message_count
        "#,
    )
    .bind(tenant_id)
    .bind(learned_style_json)
    .bind(trained_at)
    .bind(training_message_count)
    .execute(pool)
    .await?;

    if let Some(avg) = avg_length {
        sqlx::query("UPDATE personality_profiles SET avg_length = ? WHERE tenant_id = ?")
            .bind(avg)
            .bind(tenant_id)
            .execute(pool)
            .await?;
    }

    tracing::info!(
        "Saved training result for {} ({} messages analyzed)",
        tenant_id,
        training_message_count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;

    #[tokio::test]
    async fn test_save_creates_profile_with_defaults() {
        let db = test_db().await;

        save_training_result(
            db.pool(),
            "tenant-1",
            r#"{"greetings":["yo"]}"#,
            "2024-06-01T00:00:00.000Z",
            120,
            Some(9),
        )
        .await
        .unwrap();

        let row = get_profile(db.pool(), "tenant-1").await.unwrap();
        assert_eq!(row.tone, "casual");
        assert_eq!(row.avg_length, 9);
        assert_eq!(row.training_message_count, 120);
        assert_eq!(row.learned_style.as_deref(), Some(r#"{"greetings":["yo"]}"#));
    }

    #[tokio::test]
    async fn test_retrain_replaces_learned_style() {
        let db = test_db().await;

        save_training_result(
            db.pool(),
            "tenant-1",
            r#"{"greetings":["yo"]}"#,
            "2024-06-01T00:00:00.000Z",
            120,
            None,
        )
        .await
        .unwrap();
        save_training_result(
            db.pool(),
            "tenant-1",
            r#"{"greetings":["oyee"]}"#,
            "2024-07-01T00:00:00.000Z",
            180,
            None,
        )
        .await
        .unwrap();

        let row = get_profile(db.pool(), "tenant-1").await.unwrap();
        // Full replace, no merge with the earlier run.
        assert_eq!(row.learned_style.as_deref(), Some(r#"{"greetings":["oyee"]}"#));
        assert_eq!(row.training_message_count, 180);
        assert_eq!(row.last_trained_at.as_deref(), Some("2024-07-01T00:00:00.000Z"));
    }

    #[tokio::test]
    async fn test_find_profile_missing_is_none() {
        let db = test_db().await;
        assert!(find_profile(db.pool(), "tenant-x").await.unwrap().is_none());
    }
}
