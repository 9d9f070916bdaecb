//! Per-tenant settings access. The core reads these; the dashboard owns
//! writes, so the upsert here exists for wiring and tests.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{now_rfc3339, Settings};

/// Get settings for one tenant.
pub async fn get_settings(pool: &SqlitePool, tenant_id: &str) -> Result<Settings> {
    sqlx::query_as::<_, Settings>(
        r#"
        SELECT tenant_id, auto_reply_enabled, emergency_notify, fallback_text, llm_api_key, updated_at
        FROM settings
        WHERE tenant_id = ?
        "#,
    )
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Settings",
        id: tenant_id.to_string(),
    })
}

/// All tenants with a settings row. The fan-out controller iterates this
/// set per inbound event.
pub async fn list_settings(pool: &SqlitePool) -> Result<Vec<Settings>> {
    let rows = sqlx::query_as::<_, Settings>(
        r#"
        SELECT tenant_id, auto_reply_enabled, emergency_notify, fallback_text, llm_api_key, updated_at
        FROM settings
        ORDER BY tenant_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Create or replace a tenant's settings row.
pub async fn upsert_settings(pool: &SqlitePool, settings: &Settings) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (tenant_id, auto_reply_enabled, emergency_notify, fallback_text, llm_api_key, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (tenant_id) DO UPDATE SET
            auto_reply_enabled = excluded.auto_reply_enabled,
            emergency_notify = excluded.emergency_notify,
            fallback_text = excluded.fallback_text,
            llm_api_key = excluded.llm_api_key,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&settings.tenant_id)
    .bind(settings.auto_reply_enabled)
    .bind(settings.emergency_notify)
    .bind(&settings.fallback_text)
    .bind(&settings.llm_api_key)
    .bind(now_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;

    fn settings(tenant_id: &str) -> Settings {
        Settings {
            tenant_id: tenant_id.to_string(),
            auto_reply_enabled: true,
            emergency_notify: true,
            fallback_text: "Busy, will reply soon".to_string(),
            llm_api_key: None,
            updated_at: now_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_settings_roundtrip() {
        let db = test_db().await;
        upsert_settings(db.pool(), &settings("tenant-1")).await.unwrap();

        let fetched = get_settings(db.pool(), "tenant-1").await.unwrap();
        assert!(fetched.auto_reply_enabled);
        assert_eq!(fetched.fallback_text, "Busy, will reply soon");
    }

    #[tokio::test]
    async fn test_list_settings_orders_by_tenant() {
        let db = test_db().await;
        upsert_settings(db.pool(), &settings("tenant-b")).await.unwrap();
        upsert_settings(db.pool(), &settings("tenant-a")).await.unwrap();

        let all = list_settings(db.pool()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].tenant_id, "tenant-a");
    }

    #[tokio::test]
    async fn test_missing_settings() {
        let db = test_db().await;
        let result = get_settings(db.pool(), "tenant-x").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
