//! models/mapping_model.rs
//! Correspondencia declarativa de campos origen -> destino.

use serde::{Deserialize, Serialize};

/// Valor a usar cuando ningún campo de origen tiene un valor "verdadero".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Fallback {
    #[default]
    Empty,
    Null,
    Text(String),
    Number(i64),
    /// Prefijo + id del registro origen, p.ej. "Asset-" -> "Asset-42"
    PrefixedId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    #[default]
    None,
    Trim,
    Lowercase,
    /// Fuerza el valor a string (números incluidos)
    Stringify,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRule {
    pub target: String,
    /// Campos de origen, se toma el primero con valor
    pub sources: Vec<String>,
    #[serde(default)]
    pub fallback: Fallback,
    #[serde(default)]
    pub transform: Transform,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMap {
    /// Campos que identifican al registro en el sistema origen
    pub id_fields: Vec<String>,
    /// Campos usados para nombrar el registro en los mensajes
    pub label_fields: Vec<String>,
    pub rules: Vec<FieldRule>,
}

/// Un mapa por dirección; es lo que se lee de SYNC_FIELD_MAP_FILE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapSet {
    pub customer: FieldMap,
    pub asset: FieldMap,
}
