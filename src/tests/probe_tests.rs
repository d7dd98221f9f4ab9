//! tests/probe_tests.rs
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{configure_crm, configure_ticketing, test_env, USER};
use crate::errors::SyncError;
use crate::models::configuration_model::ServiceName;
use crate::models::sync_model::ProbeStatus;

#[actix_rt::test]
async fn test_probe_crm_success_is_persisted() {
    let env = test_env().await;
    let crm = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(header("authtoken", "crm-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&crm)
        .await;
    configure_crm(&env, USER, &format!("{}/", crm.uri()), true).await;

    let result = env.probe_service.probe(USER, ServiceName::Crm).await.unwrap();
    assert!(result.success);
    assert_eq!(result.status, ProbeStatus::Http(200));
    assert_eq!(result.message, "Connection established");

    let stored = env
        .config_service
        .get(USER, ServiceName::Crm)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.last_test_status.as_deref(), Some("success"));
    assert!(stored.last_test_at.is_some());
}

#[actix_rt::test]
async fn test_probe_ticketing_reports_http_failure() {
    let env = test_env().await;
    let ticketing = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/initSession"))
        .and(header("App-Token", "app-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!(["ERROR_WRONG_APP_TOKEN"])))
        .expect(1)
        .mount(&ticketing)
        .await;
    configure_ticketing(&env, USER, &ticketing.uri(), true).await;

    let result = env
        .probe_service
        .probe(USER, ServiceName::Ticketing)
        .await
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.status, ProbeStatus::Http(401));
    assert_eq!(result.message, "HTTP 401: Unauthorized");

    let stored = env
        .config_service
        .get(USER, ServiceName::Ticketing)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.last_test_status.as_deref(), Some("error"));
    assert_eq!(stored.last_test_message.as_deref(), Some("HTTP 401: Unauthorized"));
}

#[actix_rt::test]
async fn test_probe_unreachable_host() {
    let env = test_env().await;
    configure_crm(&env, USER, "http://127.0.0.1:1", true).await;

    let result = env.probe_service.probe(USER, ServiceName::Crm).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.status, ProbeStatus::Error);
    assert!(
        result.message.contains("error sending request"),
        "message: {}",
        result.message
    );

    let body = serde_json::to_value(&result).unwrap();
    assert_eq!(body["status"], json!("error"));
    assert!(body.get("responseTimeMs").is_some());
}

#[actix_rt::test]
async fn test_probe_disabled_configuration_sends_nothing() {
    let env = test_env().await;
    let crm = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&crm)
        .await;
    configure_crm(&env, USER, &crm.uri(), false).await;

    let err = env
        .probe_service
        .probe(USER, ServiceName::Crm)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Configuration(_)));

    let stored = env
        .config_service
        .get(USER, ServiceName::Crm)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_test_status.is_none());
}

#[actix_rt::test]
async fn test_probe_missing_configuration() {
    let env = test_env().await;
    let err = env
        .probe_service
        .probe(USER, ServiceName::Ticketing)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no configuration found"));
}
