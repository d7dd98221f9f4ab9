use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::models::sync_log_model::SyncType;

/// Correlación source_id -> target_id de registros ya sincronizados.
#[derive(Clone, Debug)]
pub struct SyncMappingService {
    db_pool: Pool<Sqlite>,
}

impl SyncMappingService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        SyncMappingService { db_pool }
    }

    pub async fn find_target(
        &self,
        user_id: &str,
        sync_type: SyncType,
        source_id: &str,
    ) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT target_id FROM sync_mappings
            WHERE user_id = ?1 AND sync_type = ?2 AND source_id = ?3
            "#,
        )
        .bind(user_id)
        .bind(sync_type.as_str())
        .bind(source_id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al buscar sync_mapping")?;

        Ok(row.map(|(target_id,)| target_id))
    }

    pub async fn record(
        &self,
        user_id: &str,
        sync_type: SyncType,
        source_id: &str,
        target_id: &str,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO sync_mappings (user_id, sync_type, source_id, target_id, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (user_id, sync_type, source_id) DO UPDATE SET
                target_id = excluded.target_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(sync_type.as_str())
        .bind(source_id)
        .bind(target_id)
        .bind(now)
        .execute(&self.db_pool)
        .await
        .context("Fallo al guardar sync_mapping")?;

        Ok(())
    }
}
