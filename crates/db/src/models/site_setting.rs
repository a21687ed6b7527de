use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// Key/value row of the `site_settings` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct SiteSetting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl SiteSetting {
    pub const SUPPORTED_LOCALES: &'static str = "supported_locales";
    pub const DEFAULT_LOCALE: &'static str = "default_locale";

    pub async fn find_by_key(pool: &SqlitePool, key: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, SiteSetting>(
            r#"SELECT key, value, updated_at
               FROM site_settings
               WHERE key = $1"#,
        )
        .bind(key)
        .fetch_optional(pool)
        .await
    }

    /// Values for `keys`, skipping keys that have no row.
    pub async fn find_values(
        pool: &SqlitePool,
        keys: &[&str],
    ) -> Result<Vec<(String, String)>, sqlx::Error> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(setting) = Self::find_by_key(pool, key).await? {
                values.push((setting.key, setting.value));
            }
        }
        Ok(values)
    }

    pub async fn upsert(pool: &SqlitePool, key: &str, value: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SiteSetting>(
            r#"INSERT INTO site_settings (key, value)
               VALUES ($1, $2)
               ON CONFLICT(key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = datetime('now', 'subsec')
               RETURNING key, value, updated_at"#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(pool)
        .await
    }
}
