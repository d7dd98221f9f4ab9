use std::io;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

use crate::config::app_config::{AppConfig, SyncSettings};
use crate::logger::init_logger;
use crate::services::configuration_service::ConfigurationService;
use crate::services::field_mapping::load_field_maps;
use crate::services::probe_service::ProbeService;
use crate::services::sync_log_service::SyncLogService;
use crate::services::sync_mapping_service::SyncMappingService;
use crate::services::sync_service::SyncService;

mod app;
mod config;
mod db;
mod errors;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

fn startup_error(context: &str, e: anyhow::Error) -> io::Error {
    log::error!("{}: {:?}", context, e);
    io::Error::new(io::ErrorKind::Other, format!("{}: {:#}", context, e))
}

/// Cliente HTTP compartido para las APIs externas.
pub fn build_http_client(settings: &SyncSettings) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = settings.http_timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let app_config = AppConfig::from_env();

    // Conectarnos a la DB y migrar
    let db_pool = db::setup_database(&app_config.database_url)
        .await
        .map_err(|e| startup_error("No se pudo conectar a la base de datos", e))?;
    db::run_migrations(&db_pool)
        .await
        .map_err(|e| startup_error("Fallo en migraciones", e))?;

    let field_maps = load_field_maps(app_config.sync.field_map_path.as_deref())
        .map_err(|e| startup_error("No se pudo cargar el mapa de campos", e))?;
    let http_client = build_http_client(&app_config.sync)
        .map_err(|e| startup_error("No se pudo crear el cliente HTTP", e.into()))?;

    let config_service = ConfigurationService::new(db_pool.clone(), app_config.defaults.clone());
    let log_service = SyncLogService::new(db_pool.clone());
    let mapping_service = SyncMappingService::new(db_pool.clone());

    let probe_service = ProbeService::new(
        config_service.clone(),
        http_client.clone(),
        app_config.sync.clone(),
    );

    let sync_service = SyncService::new(
        config_service.clone(),
        log_service.clone(),
        mapping_service,
        field_maps,
        app_config.sync.clone(),
        http_client,
    );

    // Levantar servidor
    log::info!(
        "Levantando servidor en {}:{} (workers={})",
        app_config.host,
        app_config.port,
        app_config.workers
    );
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config_service.clone()))
            .app_data(web::Data::new(log_service.clone()))
            .app_data(web::Data::new(probe_service.clone()))
            .app_data(web::Data::new(sync_service.clone()))
            .configure(app::init_app)
    })
    .workers(app_config.workers)
    .bind((app_config.host.as_str(), app_config.port))?
    .run()
    .await
}
