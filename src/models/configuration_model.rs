//! models/configuration_model.rs
//! Configuración de conexión por usuario y por sistema externo.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sistemas externos soportados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceName {
    /// CRM (clientes y activos), autenticado con `authtoken`
    Crm,
    /// Plataforma de tickets/inventario, autenticada con App-Token + user_token
    Ticketing,
}

impl ServiceName {
    pub const ALL: [ServiceName; 2] = [ServiceName::Crm, ServiceName::Ticketing];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Crm => "crm",
            ServiceName::Ticketing => "ticketing",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crm" => Ok(ServiceName::Crm),
            "ticketing" => Ok(ServiceName::Ticketing),
            other => Err(anyhow!("Unknown service: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfiguration {
    pub id: String,
    pub user_id: String,
    pub service_name: ServiceName,
    pub base_url: String,
    pub auth_token: Option<String>,
    pub app_token: Option<String>,
    pub user_token: Option<String>,
    pub enabled: bool,
    pub last_test_status: Option<String>, // "success" | "error"
    pub last_test_message: Option<String>,
    pub last_test_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceConfiguration {
    /// URL base sin la barra final, lista para concatenar rutas.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Lista de credenciales obligatorias que faltan para este servicio.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").is_empty();
        let mut missing = Vec::new();
        match self.service_name {
            ServiceName::Crm => {
                if blank(&self.auth_token) {
                    missing.push("auth_token");
                }
            }
            ServiceName::Ticketing => {
                if blank(&self.app_token) {
                    missing.push("app_token");
                }
                if blank(&self.user_token) {
                    missing.push("user_token");
                }
            }
        }
        missing
    }
}

/// Body de PUT /api/configurations/{service}
#[derive(Debug, Clone, Deserialize)]
pub struct SaveConfigurationRequest {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub app_token: Option<String>,
    pub user_token: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

/// Fila tal como vive en SQLite (timestamps en RFC 3339).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConfigurationRow {
    pub id: String,
    pub user_id: String,
    pub service_name: String,
    pub base_url: String,
    pub auth_token: Option<String>,
    pub app_token: Option<String>,
    pub user_token: Option<String>,
    pub enabled: i64,
    pub last_test_status: Option<String>,
    pub last_test_message: Option<String>,
    pub last_test_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ConfigurationRow> for ServiceConfiguration {
    type Error = anyhow::Error;

    fn try_from(row: ConfigurationRow) -> Result<Self, Self::Error> {
        let last_test_at = match row.last_test_at {
            Some(ts) => Some(ts.parse()?),
            None => None,
        };
        Ok(ServiceConfiguration {
            id: row.id,
            user_id: row.user_id,
            service_name: row.service_name.parse()?,
            base_url: row.base_url,
            auth_token: row.auth_token,
            app_token: row.app_token,
            user_token: row.user_token,
            enabled: row.enabled != 0,
            last_test_status: row.last_test_status,
            last_test_message: row.last_test_message,
            last_test_at,
            created_at: row.created_at.parse()?,
            updated_at: row.updated_at.parse()?,
        })
    }
}
