//! handlers/mod.rs
//! Handlers HTTP y helpers compartidos (identidad del usuario, errores).

pub mod configuration_handler;
pub mod log_handler;
pub mod sync_handler;

use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;

use crate::errors::SyncError;

/// Header que pone el proveedor de autenticación delante de este servicio.
pub const USER_ID_HEADER: &str = "X-User-Id";

pub fn user_id(req: &HttpRequest) -> Result<String, HttpResponse> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            HttpResponse::Unauthorized().json(json!({
                "success": false,
                "error": format!("Missing {} header", USER_ID_HEADER)
            }))
        })
}

pub fn bad_request(message: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "success": false,
        "error": message.to_string()
    }))
}

pub fn internal_error(e: &anyhow::Error) -> HttpResponse {
    log::error!("Internal error: {:?}", e);
    HttpResponse::InternalServerError().json(json!({
        "success": false,
        "error": "Internal server error",
        "details": format!("{:#}", e)
    }))
}

pub fn error_response(e: &SyncError) -> HttpResponse {
    let body = json!({
        "success": false,
        "error": e.to_string()
    });
    match e {
        SyncError::Configuration(_) | SyncError::Validation(_) => {
            HttpResponse::BadRequest().json(body)
        }
        SyncError::RunInProgress(_) => HttpResponse::Conflict().json(body),
        SyncError::Storage(inner) => internal_error(inner),
        SyncError::Transport(_)
        | SyncError::Remote { .. }
        | SyncError::InvalidResponse(_)
        | SyncError::Session(_)
        | SyncError::SourceFetch(_) => HttpResponse::BadGateway().json(body),
    }
}
