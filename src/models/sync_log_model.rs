//! models/sync_log_model.rs
//! Entradas del log de sincronización (append-only).

use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncType {
    Customer,
    Contact,
    Ticket,
    Asset,
}

impl SyncType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncType::Customer => "customer",
            SyncType::Contact => "contact",
            SyncType::Ticket => "ticket",
            SyncType::Asset => "asset",
        }
    }
}

impl FromStr for SyncType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(SyncType::Customer),
            "contact" => Ok(SyncType::Contact),
            "ticket" => Ok(SyncType::Ticket),
            "asset" => Ok(SyncType::Asset),
            other => Err(anyhow!("Unknown sync_type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOperation {
    Create,
    Update,
    Sync,
}

impl SyncOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOperation::Create => "create",
            SyncOperation::Update => "update",
            SyncOperation::Sync => "sync",
        }
    }
}

impl FromStr for SyncOperation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(SyncOperation::Create),
            "update" => Ok(SyncOperation::Update),
            "sync" => Ok(SyncOperation::Sync),
            other => Err(anyhow!("Unknown operation: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Error,
    Warning,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Success => "success",
            SyncStatus::Error => "error",
            SyncStatus::Warning => "warning",
        }
    }
}

impl FromStr for SyncStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(SyncStatus::Success),
            "error" => Ok(SyncStatus::Error),
            "warning" => Ok(SyncStatus::Warning),
            other => Err(anyhow!("Unknown status: {}", other)),
        }
    }
}

/// Entrada a insertar. `created_at` lo pone el store.
#[derive(Debug, Clone)]
pub struct NewSyncLog {
    pub sync_type: SyncType,
    pub operation: SyncOperation,
    pub status: SyncStatus,
    pub message: String,
    pub details: Option<String>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub processing_time_ms: Option<i64>,
}

impl NewSyncLog {
    pub fn new(
        sync_type: SyncType,
        operation: SyncOperation,
        status: SyncStatus,
        message: impl Into<String>,
    ) -> Self {
        NewSyncLog {
            sync_type,
            operation,
            status,
            message: message.into(),
            details: None,
            source_id: None,
            target_id: None,
            processing_time_ms: None,
        }
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn source_id(mut self, id: Option<String>) -> Self {
        self.source_id = id;
        self
    }

    pub fn target_id(mut self, id: Option<String>) -> Self {
        self.target_id = id;
        self
    }

    pub fn processing_time_ms(mut self, ms: i64) -> Self {
        self.processing_time_ms = Some(ms);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncLogEntry {
    pub id: i64,
    pub user_id: String,
    pub sync_type: SyncType,
    pub operation: SyncOperation,
    pub status: SyncStatus,
    pub message: String,
    pub details: Option<String>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub processing_time_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SyncLogRow {
    pub id: i64,
    pub user_id: String,
    pub sync_type: String,
    pub operation: String,
    pub status: String,
    pub message: String,
    pub details: Option<String>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub processing_time_ms: Option<i64>,
    pub created_at: String,
}

impl TryFrom<SyncLogRow> for SyncLogEntry {
    type Error = anyhow::Error;

    fn try_from(r: SyncLogRow) -> Result<Self, Self::Error> {
        Ok(SyncLogEntry {
            id: r.id,
            user_id: r.user_id,
            sync_type: r.sync_type.parse()?,
            operation: r.operation.parse()?,
            status: r.status.parse()?,
            message: r.message,
            details: r.details,
            source_id: r.source_id,
            target_id: r.target_id,
            processing_time_ms: r.processing_time_ms,
            created_at: r.created_at.parse()?,
        })
    }
}

/// Contadores para las tarjetas del dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncLogStats {
    pub total: i64,
    pub success: i64,
    pub error: i64,
    pub warning: i64,
    /// Registros creados/actualizados con éxito, por tipo
    pub synced_customers: i64,
    pub synced_contacts: i64,
    pub synced_tickets: i64,
    pub synced_assets: i64,
    /// success / (success + error) de las entradas por registro, en %
    pub success_rate: Option<f64>,
}
