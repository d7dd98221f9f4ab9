//! tests/configuration_tests.rs
use super::{configure_crm, configure_ticketing, test_env, USER};
use crate::errors::SyncError;
use crate::models::configuration_model::{SaveConfigurationRequest, ServiceName};
use crate::services::configuration_service::validate_base_url;

fn crm_request(base_url: &str) -> SaveConfigurationRequest {
    SaveConfigurationRequest {
        base_url: base_url.to_string(),
        auth_token: Some("tok".to_string()),
        app_token: None,
        user_token: None,
        enabled: true,
    }
}

#[actix_rt::test]
async fn test_save_is_an_upsert() {
    let env = test_env().await;
    let first = env
        .config_service
        .save(USER, ServiceName::Crm, crm_request("https://crm.one/api"))
        .await
        .unwrap();
    let second = env
        .config_service
        .save(USER, ServiceName::Crm, crm_request("https://crm.two/api"))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.base_url, "https://crm.two/api");
    assert_eq!(env.config_service.list(USER).await.unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_save_rejects_invalid_urls() {
    let env = test_env().await;
    for raw in ["not a url", "ftp://crm.example.com", "/relative/path"] {
        let err = env
            .config_service
            .save(USER, ServiceName::Crm, crm_request(raw))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)), "{}: {:?}", raw, err);
    }
    assert!(env.config_service.list(USER).await.unwrap().is_empty());
}

#[test]
fn test_validate_base_url() {
    assert!(validate_base_url("http://localhost:8080/apirest.php").is_ok());
    assert!(validate_base_url("https://crm.example.com").is_ok());
    assert!(validate_base_url("mailto:someone@example.com").is_err());
}

#[actix_rt::test]
async fn test_configurations_are_per_user() {
    let env = test_env().await;
    configure_crm(&env, USER, "https://crm.example.com", true).await;
    configure_crm(&env, "user-2", "https://other.example.com", false).await;

    let mine = env
        .config_service
        .get(USER, ServiceName::Crm)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mine.base_url, "https://crm.example.com");
    assert!(mine.enabled);
    assert!(env
        .config_service
        .get("user-2", ServiceName::Ticketing)
        .await
        .unwrap()
        .is_none());
}

#[actix_rt::test]
async fn test_initialize_defaults_does_not_overwrite() {
    let env = test_env().await;
    configure_crm(&env, USER, "https://mine.example.com", true).await;

    let configs = env.config_service.initialize_defaults(USER).await.unwrap();
    assert_eq!(configs.len(), 2);

    let crm = configs
        .iter()
        .find(|c| c.service_name == ServiceName::Crm)
        .unwrap();
    assert_eq!(crm.base_url, "https://mine.example.com");
    assert!(crm.enabled);

    let ticketing = configs
        .iter()
        .find(|c| c.service_name == ServiceName::Ticketing)
        .unwrap();
    assert!(!ticketing.enabled);

    // Idempotente
    let again = env.config_service.initialize_defaults(USER).await.unwrap();
    assert_eq!(again.len(), 2);
}

#[actix_rt::test]
async fn test_require_ready_checks_credentials() {
    let env = test_env().await;
    env.config_service
        .save(
            USER,
            ServiceName::Ticketing,
            SaveConfigurationRequest {
                base_url: "https://tickets.example.com/apirest.php".to_string(),
                auth_token: None,
                app_token: Some("app".to_string()),
                user_token: Some("   ".to_string()),
                enabled: true,
            },
        )
        .await
        .unwrap();

    let err = env
        .config_service
        .require_ready(USER, ServiceName::Ticketing)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("user_token"), "{}", err);

    configure_ticketing(&env, USER, "https://tickets.example.com/apirest.php", true).await;
    let ready = env
        .config_service
        .require_ready(USER, ServiceName::Ticketing)
        .await
        .unwrap();
    assert_eq!(ready.api_root(), "https://tickets.example.com/apirest.php");
}
