//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod configuration_service;
pub mod crm_client;
pub mod field_mapping;
pub mod probe_service;
pub mod remote;
pub mod retry;
pub mod run_guard;
pub mod sync_log_service;
pub mod sync_mapping_service;
pub mod sync_service;
pub mod ticketing_client;
