//! handlers/sync_handler.rs
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::handlers::{bad_request, error_response, user_id};
use crate::models::sync_model::SyncRequestKind;
use crate::services::sync_service::SyncService;

/// POST /api/sync/{direction}
///
/// `direction`: crm-to-ticketing | ticketing-to-crm | bidirectional.
/// Responde cuando la corrida termina; el detalle por registro queda en /api/logs.
pub async fn run_sync_endpoint(
    req: HttpRequest,
    path: web::Path<String>,
    sync_service: web::Data<SyncService>,
) -> HttpResponse {
    let user_id = match user_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let kind = match path.into_inner().parse::<SyncRequestKind>() {
        Ok(k) => k,
        Err(e) => return bad_request(e),
    };

    match sync_service.run(&user_id, kind).await {
        Ok(summaries) => HttpResponse::Ok().json(json!({
            "success": true,
            "runs": summaries
        })),
        Err(e) => {
            log::error!("Sync error para user_id={}: {}", user_id, e);
            error_response(&e)
        }
    }
}
