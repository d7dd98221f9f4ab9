use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Url;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::config::app_config::DefaultEndpoints;
use crate::errors::SyncError;
use crate::models::configuration_model::{
    ConfigurationRow, SaveConfigurationRequest, ServiceConfiguration, ServiceName,
};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, service_name, base_url, auth_token, app_token, user_token,
           enabled, last_test_status, last_test_message, last_test_at,
           created_at, updated_at
    FROM api_configurations
"#;

#[derive(Clone, Debug)]
pub struct ConfigurationService {
    db_pool: Pool<Sqlite>,
    defaults: DefaultEndpoints,
}

/// Solo se aceptan URLs absolutas http/https con host.
pub fn validate_base_url(raw: &str) -> Result<(), SyncError> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        SyncError::Validation(format!("base_url '{}' is not a valid URL: {}", raw, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SyncError::Validation(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(SyncError::Validation(format!("base_url '{}' has no host", raw)));
    }
    Ok(())
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl ConfigurationService {
    pub fn new(db_pool: Pool<Sqlite>, defaults: DefaultEndpoints) -> Self {
        ConfigurationService { db_pool, defaults }
    }

    pub async fn get(
        &self,
        user_id: &str,
        service: ServiceName,
    ) -> Result<Option<ServiceConfiguration>> {
        let sql = format!("{} WHERE user_id = ?1 AND service_name = ?2", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, ConfigurationRow>(&sql)
            .bind(user_id)
            .bind(service.as_str())
            .fetch_optional(&self.db_pool)
            .await
            .context("Fallo al buscar configuración")?;

        row.map(ServiceConfiguration::try_from).transpose()
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<ServiceConfiguration>> {
        let sql = format!("{} WHERE user_id = ?1 ORDER BY service_name", SELECT_COLUMNS);
        let rows = sqlx::query_as::<_, ConfigurationRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.db_pool)
            .await
            .context("Fallo al listar configuraciones")?;

        rows.into_iter().map(ServiceConfiguration::try_from).collect()
    }

    /// Upsert sobre (user_id, service_name). Los campos del test no se tocan.
    pub async fn save(
        &self,
        user_id: &str,
        service: ServiceName,
        req: SaveConfigurationRequest,
    ) -> Result<ServiceConfiguration, SyncError> {
        validate_base_url(&req.base_url)?;

        let now = Utc::now().to_rfc3339();
        let id = Uuid::new_v4().to_string();
        let enabled = req.enabled as i64;

        sqlx::query(
            r#"
            INSERT INTO api_configurations (
                id, user_id, service_name, base_url, auth_token, app_token, user_token,
                enabled, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            ON CONFLICT (user_id, service_name) DO UPDATE SET
                base_url = excluded.base_url,
                auth_token = excluded.auth_token,
                app_token = excluded.app_token,
                user_token = excluded.user_token,
                enabled = excluded.enabled,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(service.as_str())
        .bind(req.base_url.trim())
        .bind(non_blank(req.auth_token))
        .bind(non_blank(req.app_token))
        .bind(non_blank(req.user_token))
        .bind(enabled)
        .bind(now)
        .execute(&self.db_pool)
        .await
        .context("Fallo al guardar configuración")?;

        log::info!(
            "(save) Configuración '{}' guardada para user_id={} (enabled={})",
            service,
            user_id,
            req.enabled
        );

        self.get(user_id, service).await?.ok_or_else(|| {
            SyncError::Storage(anyhow::anyhow!("Configuración recién guardada no encontrada"))
        })
    }

    /// Inserta placeholders deshabilitados para los servicios que el usuario aún no tiene.
    pub async fn initialize_defaults(&self, user_id: &str) -> Result<Vec<ServiceConfiguration>> {
        let now = Utc::now().to_rfc3339();

        for service in ServiceName::ALL {
            let base_url = match service {
                ServiceName::Crm => &self.defaults.crm_base_url,
                ServiceName::Ticketing => &self.defaults.ticketing_base_url,
            };

            let result = sqlx::query(
                r#"
                INSERT INTO api_configurations (
                    id, user_id, service_name, base_url, enabled, created_at, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)
                ON CONFLICT (user_id, service_name) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(user_id)
            .bind(service.as_str())
            .bind(base_url.as_str())
            .bind(now.as_str())
            .execute(&self.db_pool)
            .await
            .context("Fallo al insertar configuración por defecto")?;

            if result.rows_affected() > 0 {
                log::info!(
                    "(initialize_defaults) Placeholder '{}' creado para user_id={}",
                    service,
                    user_id
                );
            }
        }

        self.list(user_id).await
    }

    pub async fn record_test_result(
        &self,
        user_id: &str,
        service: ServiceName,
        success: bool,
        message: &str,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let status = if success { "success" } else { "error" };

        sqlx::query(
            r#"
            UPDATE api_configurations
            SET last_test_status = ?3,
                last_test_message = ?4,
                last_test_at = ?5
            WHERE user_id = ?1 AND service_name = ?2
            "#,
        )
        .bind(user_id)
        .bind(service.as_str())
        .bind(status)
        .bind(message)
        .bind(now)
        .execute(&self.db_pool)
        .await
        .context("Fallo al guardar resultado del test")?;

        Ok(())
    }

    /// Configuración existente, habilitada y con sus credenciales.
    pub async fn require_ready(
        &self,
        user_id: &str,
        service: ServiceName,
    ) -> Result<ServiceConfiguration, SyncError> {
        let config = self.get(user_id, service).await?.ok_or_else(|| {
            SyncError::Configuration(format!("no configuration found for '{}'", service))
        })?;

        if !config.enabled {
            return Err(SyncError::Configuration(format!(
                "configuration for '{}' is disabled",
                service
            )));
        }

        let missing = config.missing_credentials();
        if !missing.is_empty() {
            return Err(SyncError::Configuration(format!(
                "configuration for '{}' is missing: {}",
                service,
                missing.join(", ")
            )));
        }

        Ok(config)
    }
}
