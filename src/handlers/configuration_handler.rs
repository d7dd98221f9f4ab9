//! handlers/configuration_handler.rs
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::handlers::{bad_request, error_response, internal_error, user_id};
use crate::models::configuration_model::{SaveConfigurationRequest, ServiceName};
use crate::services::configuration_service::ConfigurationService;
use crate::services::probe_service::ProbeService;

fn parse_service(raw: &str) -> Result<ServiceName, HttpResponse> {
    raw.parse::<ServiceName>().map_err(bad_request)
}

/// GET /api/configurations
pub async fn list_configurations_endpoint(
    req: HttpRequest,
    config_service: web::Data<ConfigurationService>,
) -> HttpResponse {
    let user_id = match user_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match config_service.list(&user_id).await {
        Ok(configs) => HttpResponse::Ok().json(configs),
        Err(e) => internal_error(&e),
    }
}

/// GET /api/configurations/{service}
pub async fn get_configuration_endpoint(
    req: HttpRequest,
    path: web::Path<String>,
    config_service: web::Data<ConfigurationService>,
) -> HttpResponse {
    let user_id = match user_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let service = match parse_service(&path.into_inner()) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    match config_service.get(&user_id, service).await {
        Ok(Some(config)) => HttpResponse::Ok().json(config),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": format!("Configuration for '{}' not found", service)
        })),
        Err(e) => internal_error(&e),
    }
}

/// PUT /api/configurations/{service}
pub async fn save_configuration_endpoint(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<SaveConfigurationRequest>,
    config_service: web::Data<ConfigurationService>,
) -> HttpResponse {
    let user_id = match user_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let service = match parse_service(&path.into_inner()) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    match config_service
        .save(&user_id, service, body.into_inner())
        .await
    {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(e) => error_response(&e),
    }
}

/// POST /api/configurations/defaults
pub async fn initialize_defaults_endpoint(
    req: HttpRequest,
    config_service: web::Data<ConfigurationService>,
) -> HttpResponse {
    let user_id = match user_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match config_service.initialize_defaults(&user_id).await {
        Ok(configs) => HttpResponse::Ok().json(configs),
        Err(e) => internal_error(&e),
    }
}

/// POST /api/configurations/{service}/test
pub async fn test_connection_endpoint(
    req: HttpRequest,
    path: web::Path<String>,
    probe_service: web::Data<ProbeService>,
) -> HttpResponse {
    let user_id = match user_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let service = match parse_service(&path.into_inner()) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    // Un probe fallido igual es 200: el resultado viaja en el cuerpo
    match probe_service.probe(&user_id, service).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => error_response(&e),
    }
}
