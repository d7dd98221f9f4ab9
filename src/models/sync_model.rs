//! models/sync_model.rs
//! Direcciones de sincronización, resultado de una corrida y del probe.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Serialize, Serializer};

use crate::models::sync_log_model::SyncType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncDirection {
    /// Clientes del CRM -> entidades del sistema de tickets
    CrmToTicketing,
    /// Computadores del sistema de tickets -> activos del CRM
    TicketingToCrm,
}

impl SyncDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncDirection::CrmToTicketing => "crm-to-ticketing",
            SyncDirection::TicketingToCrm => "ticketing-to-crm",
        }
    }

    pub fn sync_type(&self) -> SyncType {
        match self {
            SyncDirection::CrmToTicketing => SyncType::Customer,
            SyncDirection::TicketingToCrm => SyncType::Asset,
        }
    }

    /// Nombre legible usado en los mensajes del log
    pub fn label(&self) -> &'static str {
        match self {
            SyncDirection::CrmToTicketing => "Customer",
            SyncDirection::TicketingToCrm => "Asset",
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            SyncDirection::CrmToTicketing => "CRM -> ticketing",
            SyncDirection::TicketingToCrm => "ticketing -> CRM",
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lo que se puede pedir por HTTP: una dirección o ambas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncRequestKind {
    One(SyncDirection),
    Bidirectional,
}

impl SyncRequestKind {
    pub fn directions(&self) -> Vec<SyncDirection> {
        match self {
            SyncRequestKind::One(d) => vec![*d],
            SyncRequestKind::Bidirectional => {
                vec![SyncDirection::CrmToTicketing, SyncDirection::TicketingToCrm]
            }
        }
    }
}

impl FromStr for SyncRequestKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crm-to-ticketing" => Ok(SyncRequestKind::One(SyncDirection::CrmToTicketing)),
            "ticketing-to-crm" => Ok(SyncRequestKind::One(SyncDirection::TicketingToCrm)),
            "bidirectional" => Ok(SyncRequestKind::Bidirectional),
            other => Err(anyhow!("Unknown sync direction: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub direction: SyncDirection,
    pub sync_type: SyncType,
    pub total: usize,
    pub successes: usize,
    pub errors: usize,
}

/// Código HTTP numérico, o el marcador literal "error" si no hubo respuesta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Http(u16),
    Error,
}

impl Serialize for ProbeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProbeStatus::Http(code) => serializer.serialize_u16(*code),
            ProbeStatus::Error => serializer.serialize_str("error"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub success: bool,
    pub status: ProbeStatus,
    pub response_time_ms: u64,
    pub message: String,
}
