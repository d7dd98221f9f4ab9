//! services/field_mapping.rs
//! Aplica un `FieldMap` a un registro JSON del sistema origen.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::models::mapping_model::{Fallback, FieldMap, FieldMapSet, FieldRule, Transform};

fn rule(target: &str, sources: &[&str], fallback: Fallback) -> FieldRule {
    FieldRule {
        target: target.to_string(),
        sources: sources.iter().map(|s| s.to_string()).collect(),
        fallback,
        transform: Transform::None,
    }
}

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Clientes del CRM -> Entity del sistema de tickets
pub fn default_customer_map() -> FieldMap {
    FieldMap {
        id_fields: fields(&["userid", "id"]),
        label_fields: fields(&["company", "name"]),
        rules: vec![
            rule(
                "name",
                &["company", "name"],
                Fallback::Text("Unnamed customer".to_string()),
            ),
            rule("comment", &["address", "billing_street"], Fallback::Empty),
            rule("phonenumber", &["phonenumber"], Fallback::Empty),
            rule("email", &["email"], Fallback::Empty),
        ],
    }
}

/// Computer del sistema de tickets -> activo del CRM
pub fn default_asset_map() -> FieldMap {
    FieldMap {
        id_fields: fields(&["id"]),
        label_fields: fields(&["name"]),
        rules: vec![
            rule("name", &["name"], Fallback::PrefixedId("Asset-".to_string())),
            rule("serial", &["serial"], Fallback::Empty),
            rule("model", &["computermodels_id"], Fallback::Empty),
            rule("manufacturer", &["manufacturers_id"], Fallback::Empty),
            rule("status", &["states_id"], Fallback::Number(1)),
            rule("location", &["locations_id"], Fallback::Empty),
            rule("user", &["users_id"], Fallback::Empty),
            rule("entity", &["entities_id"], Fallback::Empty),
            rule("comment", &["comment"], Fallback::Empty),
            rule("ticketing_id", &["id"], Fallback::Null),
        ],
    }
}

pub fn default_field_maps() -> FieldMapSet {
    FieldMapSet {
        customer: default_customer_map(),
        asset: default_asset_map(),
    }
}

/// Lee los mapas de un JSON si hay ruta; si no, los mapas por defecto.
pub fn load_field_maps(path: Option<&Path>) -> Result<FieldMapSet> {
    let Some(path) = path else {
        return Ok(default_field_maps());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("No se pudo leer el mapa de campos {:?}", path))?;
    let maps: FieldMapSet = serde_json::from_str(&raw)
        .with_context(|| format!("Mapa de campos inválido en {:?}", path))?;

    log::info!(
        "Mapa de campos cargado de {:?} ({} reglas customer, {} reglas asset)",
        path,
        maps.customer.rules.len(),
        maps.asset.rules.len()
    );
    Ok(maps)
}

/// `null`, `""`, `0` y `false` no cuentan como valor.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn first_truthy<'a>(record: &'a Value, names: &[String]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| record.get(name))
        .find(|v| is_truthy(v))
}

/// Representación textual de un id: strings tal cual, números con to_string.
pub fn value_to_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_to_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn source_id(map: &FieldMap, record: &Value) -> Option<String> {
    first_truthy(record, &map.id_fields).and_then(value_to_id)
}

pub fn label(map: &FieldMap, record: &Value) -> Option<String> {
    first_truthy(record, &map.label_fields).map(value_to_text)
}

fn apply_transform(value: Value, transform: Transform) -> Value {
    match (transform, value) {
        (Transform::None, v) => v,
        (Transform::Trim, Value::String(s)) => Value::String(s.trim().to_string()),
        (Transform::Lowercase, Value::String(s)) => Value::String(s.to_lowercase()),
        (Transform::Stringify, Value::Null) => Value::Null,
        (Transform::Stringify, v) => Value::String(value_to_text(&v)),
        (_, v) => v,
    }
}

fn fallback_value(fallback: &Fallback, source_id: Option<&str>) -> Value {
    match fallback {
        Fallback::Empty => Value::String(String::new()),
        Fallback::Null => Value::Null,
        Fallback::Text(s) => Value::String(s.clone()),
        Fallback::Number(n) => Value::from(*n),
        Fallback::PrefixedId(prefix) => {
            Value::String(format!("{}{}", prefix, source_id.unwrap_or_default()))
        }
    }
}

/// Construye el payload destino. Los fallbacks no pasan por el transform.
pub fn apply(map: &FieldMap, record: &Value) -> Value {
    let id = source_id(map, record);
    let mut out = Map::with_capacity(map.rules.len());

    for rule in &map.rules {
        let value = match first_truthy(record, &rule.sources) {
            Some(v) => apply_transform(v.clone(), rule.transform),
            None => fallback_value(&rule.fallback, id.as_deref()),
        };
        out.insert(rule.target.clone(), value);
    }

    Value::Object(out)
}
