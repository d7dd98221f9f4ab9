use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use sqlx::{Pool, Sqlite};

use crate::models::sync_log_model::{NewSyncLog, SyncLogEntry, SyncLogRow, SyncLogStats};

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 1000;

/// Store append-only de eventos de sincronización. No existe UPDATE.
#[derive(Clone, Debug)]
pub struct SyncLogService {
    db_pool: Pool<Sqlite>,
}

impl SyncLogService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        SyncLogService { db_pool }
    }

    pub async fn insert(&self, user_id: &str, entry: &NewSyncLog) -> Result<i64> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let result = sqlx::query(
            r#"
            INSERT INTO sync_logs (
                user_id, sync_type, operation, status, message, details,
                source_id, target_id, processing_time_ms, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(user_id)
        .bind(entry.sync_type.as_str())
        .bind(entry.operation.as_str())
        .bind(entry.status.as_str())
        .bind(entry.message.as_str())
        .bind(entry.details.as_deref())
        .bind(entry.source_id.as_deref())
        .bind(entry.target_id.as_deref())
        .bind(entry.processing_time_ms)
        .bind(now)
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar sync_log")?;

        Ok(result.last_insert_rowid())
    }

    /// Versión best-effort de `insert`: un fallo solo se reporta por el logger.
    pub async fn record(&self, user_id: &str, entry: NewSyncLog) {
        log::info!(
            "[{}] {} {}: {}",
            entry.status.as_str(),
            entry.sync_type.as_str().to_uppercase(),
            entry.operation.as_str(),
            entry.message
        );

        if let Err(e) = self.insert(user_id, &entry).await {
            log::error!(
                "(record) No se pudo guardar el log '{}' para user_id={}: {:?}",
                entry.message,
                user_id,
                e
            );
        }
    }

    /// Más recientes primero.
    pub async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<SyncLogEntry>> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);

        let rows = sqlx::query_as::<_, SyncLogRow>(
            r#"
            SELECT id, user_id, sync_type, operation, status, message, details,
                   source_id, target_id, processing_time_ms, created_at
            FROM sync_logs
            WHERE user_id = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al listar sync_logs")?;

        rows.into_iter().map(SyncLogEntry::try_from).collect()
    }

    /// Borra todas las entradas del usuario. Devuelve cuántas se borraron.
    pub async fn clear(&self, user_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sync_logs WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.db_pool)
            .await
            .context("Fallo al limpiar sync_logs")?;

        log::info!(
            "(clear) {} logs borrados para user_id={}",
            result.rows_affected(),
            user_id
        );
        Ok(result.rows_affected())
    }

    pub async fn stats(&self, user_id: &str) -> Result<SyncLogStats> {
        let by_status: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM sync_logs WHERE user_id = ?1 GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al contar logs por status")?;

        // Solo entradas por registro (create/update), no las de inicio/resumen
        let per_record: Vec<(String, String, i64)> = sqlx::query_as(
            r#"
            SELECT sync_type, status, COUNT(*)
            FROM sync_logs
            WHERE user_id = ?1 AND operation IN ('create', 'update')
            GROUP BY sync_type, status
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al contar logs por tipo")?;

        let mut stats = SyncLogStats::default();
        for (status, count) in by_status {
            stats.total += count;
            match status.as_str() {
                "success" => stats.success = count,
                "error" => stats.error = count,
                "warning" => stats.warning = count,
                _ => {}
            }
        }

        let (mut ok, mut failed) = (0i64, 0i64);
        for (sync_type, status, count) in per_record {
            match status.as_str() {
                "success" => {
                    ok += count;
                    match sync_type.as_str() {
                        "customer" => stats.synced_customers += count,
                        "contact" => stats.synced_contacts += count,
                        "ticket" => stats.synced_tickets += count,
                        "asset" => stats.synced_assets += count,
                        _ => {}
                    }
                }
                "error" => failed += count,
                _ => {}
            }
        }
        if ok + failed > 0 {
            stats.success_rate = Some(ok as f64 * 100.0 / (ok + failed) as f64);
        }

        Ok(stats)
    }
}
