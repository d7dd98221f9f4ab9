//! tests/mod.rs
//! Helpers compartidos: base en memoria, servicios armados y configuraciones.

mod configuration_tests;
mod mapping_tests;
mod probe_tests;

use sqlx::{Pool, Sqlite};

use crate::build_http_client;
use crate::config::app_config::{DefaultEndpoints, SyncSettings};
use crate::db::{run_migrations, setup_database};
use crate::logger::init_test_logger;
use crate::models::configuration_model::{SaveConfigurationRequest, ServiceName};
use crate::services::configuration_service::ConfigurationService;
use crate::services::field_mapping::default_field_maps;
use crate::services::probe_service::ProbeService;
use crate::services::sync_log_service::SyncLogService;
use crate::services::sync_mapping_service::SyncMappingService;
use crate::services::sync_service::SyncService;

pub const USER: &str = "user-1";

pub struct TestEnv {
    pub config_service: ConfigurationService,
    pub log_service: SyncLogService,
    pub mapping_service: SyncMappingService,
    pub probe_service: ProbeService,
    pub sync_service: SyncService,
}

pub async fn test_pool() -> Pool<Sqlite> {
    init_test_logger();
    let pool = setup_database("sqlite::memory:")
        .await
        .expect("Failed to open in-memory DB");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

pub async fn test_env_with(settings: SyncSettings) -> TestEnv {
    let pool = test_pool().await;
    let http_client = build_http_client(&settings).expect("Failed to build HTTP client");

    let config_service = ConfigurationService::new(pool.clone(), DefaultEndpoints::default());
    let log_service = SyncLogService::new(pool.clone());
    let mapping_service = SyncMappingService::new(pool.clone());
    let probe_service = ProbeService::new(
        config_service.clone(),
        http_client.clone(),
        settings.clone(),
    );
    let sync_service = SyncService::new(
        config_service.clone(),
        log_service.clone(),
        mapping_service.clone(),
        default_field_maps(),
        settings,
        http_client,
    );

    TestEnv {
        config_service,
        log_service,
        mapping_service,
        probe_service,
        sync_service,
    }
}

pub async fn test_env() -> TestEnv {
    test_env_with(SyncSettings::default()).await
}

pub async fn configure_crm(env: &TestEnv, user: &str, base_url: &str, enabled: bool) {
    env.config_service
        .save(
            user,
            ServiceName::Crm,
            SaveConfigurationRequest {
                base_url: base_url.to_string(),
                auth_token: Some("crm-token".to_string()),
                app_token: None,
                user_token: None,
                enabled,
            },
        )
        .await
        .expect("Failed to save CRM configuration");
}

pub async fn configure_ticketing(env: &TestEnv, user: &str, base_url: &str, enabled: bool) {
    env.config_service
        .save(
            user,
            ServiceName::Ticketing,
            SaveConfigurationRequest {
                base_url: base_url.to_string(),
                auth_token: None,
                app_token: Some("app-token".to_string()),
                user_token: Some("user-token".to_string()),
                enabled,
            },
        )
        .await
        .expect("Failed to save ticketing configuration");
}
