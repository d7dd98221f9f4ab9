//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod configuration_model;
pub mod mapping_model;
pub mod sync_log_model;
pub mod sync_model;
