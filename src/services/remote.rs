//! services/remote.rs
//! Helpers comunes para interpretar respuestas de las APIs externas.

use reqwest::header::{HeaderMap, CONTENT_RANGE};
use reqwest::Response;
use serde_json::Value;

use crate::errors::{error_chain, SyncError};
use crate::services::field_mapping::value_to_id;

/// Status no 2xx -> `SyncError::Remote` con el cuerpo como detalle.
pub async fn ensure_success(resp: Response) -> Result<Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SyncError::Remote {
        status: status.as_u16(),
        body,
    })
}

pub async fn read_json(resp: Response) -> Result<Value, SyncError> {
    resp.json::<Value>()
        .await
        .map_err(|e| SyncError::InvalidResponse(error_chain(&e)))
}

/// Acepta un arreglo desnudo o un sobre `{ "data": [...] }`.
pub fn records_from(body: Value) -> Result<Vec<Value>, SyncError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(SyncError::InvalidResponse(
                "expected a JSON array or a { \"data\": [...] } envelope".to_string(),
            )),
        },
        other => Err(SyncError::InvalidResponse(format!(
            "expected a JSON array, got {}",
            other
        ))),
    }
}

/// `id` de la respuesta de creación (también dentro de `data`).
pub fn target_id(body: &Value) -> Option<String> {
    body.get("id")
        .or_else(|| body.get("data").and_then(|d| d.get("id")))
        .and_then(value_to_id)
}

/// Respuesta 2xx con identificador -> el identificador.
pub async fn created_id(resp: Response) -> Result<String, SyncError> {
    let status = resp.status();
    let resp = ensure_success(resp).await?;
    let body = read_json(resp).await?;
    target_id(&body).ok_or_else(|| {
        SyncError::InvalidResponse(format!(
            "HTTP {} without a target identifier: {}",
            status.as_u16(),
            body
        ))
    })
}

/// Total de un header `Content-Range: 0-49/120`.
pub fn content_range_total(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_RANGE)?
        .to_str()
        .ok()?
        .rsplit('/')
        .next()?
        .trim()
        .parse()
        .ok()
}
