//! tests/mapping_tests.rs
//! Mapas de campos, helpers de respuesta y backoff.

use std::fs;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_RANGE};
use serde_json::json;
use uuid::Uuid;

use crate::config::app_config::SyncSettings;
use crate::models::mapping_model::{Fallback, FieldMap, FieldRule, Transform};
use crate::models::sync_model::{SyncDirection, SyncRequestKind};
use crate::services::field_mapping::{
    apply, default_asset_map, default_customer_map, is_truthy, label, load_field_maps, source_id,
};
use crate::services::remote::{content_range_total, records_from, target_id};
use crate::services::retry::backoff_delay;

#[test]
fn test_customer_map_prefers_first_truthy_source() {
    let map = default_customer_map();
    let record = json!({
        "userid": "42",
        "id": 7,
        "company": "",
        "name": "Acme Ltd",
        "address": null,
        "billing_street": "Main St 1",
        "phonenumber": "555-0100"
    });

    let payload = apply(&map, &record);
    assert_eq!(payload["name"], json!("Acme Ltd"));
    assert_eq!(payload["comment"], json!("Main St 1"));
    assert_eq!(payload["phonenumber"], json!("555-0100"));
    assert_eq!(payload["email"], json!(""));
    assert_eq!(source_id(&map, &record).as_deref(), Some("42"));
    assert_eq!(label(&map, &record).as_deref(), Some("Acme Ltd"));
}

#[test]
fn test_customer_map_fallback_name() {
    let payload = apply(&default_customer_map(), &json!({ "id": 3 }));
    assert_eq!(payload["name"], json!("Unnamed customer"));
}

#[test]
fn test_asset_map_fallbacks() {
    let map = default_asset_map();
    let payload = apply(&map, &json!({ "id": 12, "states_id": 0, "serial": "SN-1" }));

    assert_eq!(payload["name"], json!("Asset-12"));
    assert_eq!(payload["status"], json!(1));
    assert_eq!(payload["serial"], json!("SN-1"));
    assert_eq!(payload["ticketing_id"], json!(12));
    assert_eq!(payload["model"], json!(""));

    // Sin id, el campo de correlación queda null
    let orphan = apply(&map, &json!({ "name": "PC" }));
    assert_eq!(orphan["ticketing_id"], json!(null));
}

#[test]
fn test_truthiness() {
    for falsy in [json!(null), json!(""), json!(0), json!(0.0), json!(false)] {
        assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
    }
    for truthy in [json!("0"), json!(1), json!(true), json!([]), json!({})] {
        assert!(is_truthy(&truthy), "{} should be truthy", truthy);
    }
}

#[test]
fn test_transforms_skip_fallbacks() {
    let map = FieldMap {
        id_fields: vec!["id".to_string()],
        label_fields: vec![],
        rules: vec![
            FieldRule {
                target: "email".to_string(),
                sources: vec!["email".to_string()],
                fallback: Fallback::Text("NONE".to_string()),
                transform: Transform::Lowercase,
            },
            FieldRule {
                target: "code".to_string(),
                sources: vec!["code".to_string()],
                fallback: Fallback::Null,
                transform: Transform::Stringify,
            },
        ],
    };

    let payload = apply(&map, &json!({ "email": "A@B.COM", "code": 15 }));
    assert_eq!(payload, json!({ "email": "a@b.com", "code": "15" }));

    let payload = apply(&map, &json!({}));
    assert_eq!(payload, json!({ "email": "NONE", "code": null }));
}

#[test]
fn test_load_field_maps_from_file() {
    let path = std::env::temp_dir().join(format!("field-map-{}.json", Uuid::new_v4()));
    let body = json!({
        "customer": {
            "id_fields": ["id"],
            "label_fields": ["name"],
            "rules": [
                { "target": "name", "sources": ["name"], "transform": "trim" }
            ]
        },
        "asset": {
            "id_fields": ["id"],
            "label_fields": ["name"],
            "rules": [
                {
                    "target": "label",
                    "sources": ["name"],
                    "fallback": { "kind": "prefixed_id", "value": "PC-" }
                }
            ]
        }
    });
    fs::write(&path, body.to_string()).unwrap();

    let maps = load_field_maps(Some(path.as_path())).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(maps.customer.rules[0].fallback, Fallback::Empty);
    assert_eq!(maps.customer.rules[0].transform, Transform::Trim);
    assert_eq!(
        apply(&maps.customer, &json!({ "name": "  Acme  " })),
        json!({ "name": "Acme" })
    );
    assert_eq!(
        apply(&maps.asset, &json!({ "id": 5 })),
        json!({ "label": "PC-5" })
    );
}

#[test]
fn test_load_field_maps_missing_file_fails() {
    let path = std::env::temp_dir().join(format!("missing-{}.json", Uuid::new_v4()));
    assert!(load_field_maps(Some(path.as_path())).is_err());
    assert_eq!(load_field_maps(None).unwrap().asset.rules.len(), 10);
}

#[test]
fn test_records_from_shapes() {
    assert_eq!(records_from(json!([1, 2])).unwrap().len(), 2);
    assert_eq!(records_from(json!({ "data": [1] })).unwrap().len(), 1);
    assert!(records_from(json!({ "items": [] })).is_err());
    assert!(records_from(json!("nope")).is_err());
}

#[test]
fn test_target_id_extraction() {
    assert_eq!(target_id(&json!({ "id": 501 })).as_deref(), Some("501"));
    assert_eq!(target_id(&json!({ "data": { "id": "A-1" } })).as_deref(), Some("A-1"));
    assert_eq!(target_id(&json!({ "id": "" })), None);
    assert_eq!(target_id(&json!({ "message": "ok" })), None);
}

#[test]
fn test_content_range_total() {
    let mut headers = HeaderMap::new();
    assert_eq!(content_range_total(&headers), None);
    headers.insert(CONTENT_RANGE, HeaderValue::from_static("0-49/120"));
    assert_eq!(content_range_total(&headers), Some(120));
}

#[test]
fn test_backoff_is_bounded() {
    let settings = SyncSettings {
        backoff_base_ms: 100,
        backoff_max_ms: 1000,
        ..SyncSettings::default()
    };
    for attempt in 1..10 {
        let delay = backoff_delay(&settings, attempt).as_millis() as u64;
        let cap = (100u64 << (attempt - 1)).min(1000);
        assert!(delay >= cap / 2 && delay <= cap, "attempt {}: {}", attempt, delay);
    }
}

#[test]
fn test_sync_request_kind_parsing() {
    assert_eq!(
        "crm-to-ticketing".parse::<SyncRequestKind>().unwrap(),
        SyncRequestKind::One(SyncDirection::CrmToTicketing)
    );
    assert_eq!(
        "bidirectional".parse::<SyncRequestKind>().unwrap().directions(),
        vec![SyncDirection::CrmToTicketing, SyncDirection::TicketingToCrm]
    );
    assert!("sideways".parse::<SyncRequestKind>().is_err());
}
