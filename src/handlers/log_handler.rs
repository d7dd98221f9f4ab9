//! handlers/log_handler.rs
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::handlers::{internal_error, user_id};
use crate::services::sync_log_service::{SyncLogService, DEFAULT_LIST_LIMIT};

#[derive(Deserialize)]
pub struct LogsQuery {
    limit: Option<i64>,
}

/// GET /api/logs?limit=N
pub async fn list_logs_endpoint(
    req: HttpRequest,
    query: web::Query<LogsQuery>,
    log_service: web::Data<SyncLogService>,
) -> HttpResponse {
    let user_id = match user_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);

    match log_service.list(&user_id, limit).await {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => internal_error(&e),
    }
}

/// DELETE /api/logs
pub async fn clear_logs_endpoint(
    req: HttpRequest,
    log_service: web::Data<SyncLogService>,
) -> HttpResponse {
    let user_id = match user_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match log_service.clear(&user_id).await {
        Ok(deleted) => HttpResponse::Ok().json(json!({
            "success": true,
            "deleted": deleted
        })),
        Err(e) => internal_error(&e),
    }
}

/// GET /api/logs/stats
pub async fn log_stats_endpoint(
    req: HttpRequest,
    log_service: web::Data<SyncLogService>,
) -> HttpResponse {
    let user_id = match user_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match log_service.stats(&user_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => internal_error(&e),
    }
}
