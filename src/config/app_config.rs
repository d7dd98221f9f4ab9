//! config/app_config.rs
//! Configuración global del servicio, leída del entorno (.env incluido).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub sync: SyncSettings,
    pub defaults: DefaultEndpoints,
}

/// Parámetros del motor de sincronización y del cliente HTTP saliente.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Intentos por llamada remota (1 = sin reintentos)
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    /// Tamaño de página al listar computadores del sistema de tickets
    pub page_size: usize,
    /// Si es true, un registro ya sincronizado se actualiza en vez de recrearse
    pub update_existing: bool,
    /// None = timeout por defecto del cliente HTTP
    pub http_timeout_secs: Option<u64>,
    pub field_map_path: Option<PathBuf>,
}

/// URLs para las configuraciones placeholder de un usuario nuevo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultEndpoints {
    pub crm_base_url: String,
    pub ticketing_base_url: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            max_attempts: 1,
            backoff_base_ms: 500,
            backoff_max_ms: 10_000,
            page_size: 50,
            update_existing: false,
            http_timeout_secs: None,
            field_map_path: None,
        }
    }
}

impl Default for DefaultEndpoints {
    fn default() -> Self {
        DefaultEndpoints {
            crm_base_url: "https://crm.example.com/api".to_string(),
            ticketing_base_url: "https://ticketing.example.com/apirest.php".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: "sqlite:data/sync.db".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5022,
            workers: 1,
            sync: SyncSettings::default(),
            defaults: DefaultEndpoints::default(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("Valor inválido para {}='{}', usando el default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

impl AppConfig {
    /// Lee la configuración desde variables de entorno; lo que falte toma el default.
    pub fn from_env() -> Self {
        let base = AppConfig::default();
        let sync = SyncSettings {
            max_attempts: env_or("SYNC_MAX_ATTEMPTS", base.sync.max_attempts).max(1),
            backoff_base_ms: env_or("SYNC_BACKOFF_MS", base.sync.backoff_base_ms),
            backoff_max_ms: env_or("SYNC_MAX_BACKOFF_MS", base.sync.backoff_max_ms),
            page_size: env_or("SYNC_PAGE_SIZE", base.sync.page_size).max(1),
            update_existing: env_or("SYNC_UPDATE_EXISTING", base.sync.update_existing),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            field_map_path: env::var("SYNC_FIELD_MAP_FILE").ok().map(PathBuf::from),
        };

        AppConfig {
            database_url: env::var("DATABASE_URL").unwrap_or(base.database_url),
            host: env::var("HOST").unwrap_or(base.host),
            port: env_or("PORT", base.port),
            workers: env_or("WORKERS", base.workers).max(1),
            sync,
            defaults: DefaultEndpoints {
                crm_base_url: env::var("DEFAULT_CRM_URL").unwrap_or(base.defaults.crm_base_url),
                ticketing_base_url: env::var("DEFAULT_TICKETING_URL")
                    .unwrap_or(base.defaults.ticketing_base_url),
            },
        }
    }
}

impl SyncSettings {
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}
