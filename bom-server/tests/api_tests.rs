//! Integration tests for bom-server API endpoints
//!
//! Tests cover:
//! - Plain, translated and combined BOM expansion
//! - Distinct code listing
//! - Single-code catalog lookup
//! - Verification sweep and its summary
//! - Health endpoint
//! - Item code validation and error envelopes

mod helpers;

use axum::http::StatusCode;
use bom_server::translation::Translator;
use bom_common::config::TranslationPaths;
use helpers::{app_with_translator, get_json, test_app, KnownCodesCatalog, ROOT};
use std::path::PathBuf;
use std::sync::Arc;

fn all_known() -> Arc<KnownCodesCatalog> {
    Arc::new(KnownCodesCatalog::new(&["360004", "360010", "360011", "100020"]))
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app(all_known()).await;
    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "bom-server");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
    assert_eq!(body["translations_loaded"], true);
}

// =============================================================================
// Expansion
// =============================================================================

#[tokio::test]
async fn test_bom_expansion_order_and_names() {
    let app = test_app(all_known()).await;
    let (status, body) = get_json(app, &format!("/api/bom/{}", ROOT)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
    assert_eq!(body["message"], "BOM data retrieved successfully");

    let rows = body["data"].as_array().unwrap();
    let edges: Vec<(&str, &str, u64)> = rows
        .iter()
        .map(|r| {
            (
                r["parent-number"].as_str().unwrap(),
                r["child-number"].as_str().unwrap(),
                r["depth"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        edges,
        vec![
            ("360004", "360010", 1),
            ("360004", "100020", 1),
            ("360010", "360011", 2),
            ("360010", "100020", 2),
        ]
    );

    assert_eq!(rows[0]["parent-name"], "Gövde");
    assert_eq!(rows[0]["child-name"], "Kapak");
    assert_eq!(rows[0]["sub_pro_spec"], "40x40");
    assert_eq!(rows[0]["child-quantity"], 2.0);
    assert!(rows[0].get("parent-name-cn").is_none());
}

#[tokio::test]
async fn test_non_hierarchy_links_excluded() {
    let app = test_app(all_known()).await;
    let (_, body) = get_json(app, &format!("/api/bom/{}", ROOT)).await;

    let rows = body["data"].as_array().unwrap();
    assert!(rows.iter().all(|r| r["child-number"] != "999999"));
}

#[tokio::test]
async fn test_unknown_root_is_empty_not_error() {
    let app = test_app(all_known()).await;
    let (status, body) = get_json(app, "/api/bom/000000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_blank_item_code_rejected() {
    let app = test_app(all_known()).await;
    let (status, body) = get_json(app, "/api/bom/%20%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// =============================================================================
// Translation
// =============================================================================

#[tokio::test]
async fn test_translated_expansion_replaces_names() {
    let app = test_app(all_known()).await;
    let (status, body) = get_json(app, &format!("/api/bomcn/{}", ROOT)).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows[0]["parent-name"], "身体");
    assert_eq!(rows[0]["child-name"], "盖");
    assert_eq!(rows[1]["child-name"], "螺丝");
    // No translation: original name kept
    assert_eq!(rows[2]["child-name"], "Menteşe");
    assert!(rows[0].get("parent-name-cn").is_none());

    assert_eq!(body["untranslated-codes"], serde_json::json!(["360011"]));
}

#[tokio::test]
async fn test_combined_expansion_has_both_names() {
    let app = test_app(all_known()).await;
    let (status, body) = get_json(app, &format!("/api/bomcombined/{}", ROOT)).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows[0]["parent-name"], "Gövde");
    assert_eq!(rows[0]["parent-name-cn"], "身体");
    assert_eq!(rows[0]["child-name"], "Kapak");
    assert_eq!(rows[0]["child-name-cn"], "盖");
    assert_eq!(rows[2]["child-name-cn"], "Menteşe");
    assert!(rows
        .iter()
        .all(|r| r.get("parent-name-cn").is_some() && r.get("child-name-cn").is_some()));
    assert_eq!(body["untranslated-codes"], serde_json::json!(["360011"]));
}

#[tokio::test]
async fn test_missing_translation_data_fails_translated_requests_only() {
    let translator = Arc::new(Translator::new(TranslationPaths {
        direct_table: PathBuf::from("/nonexistent/direct.json"),
        fallback_table: PathBuf::from("/nonexistent/fallback.json"),
    }));

    let app = app_with_translator(all_known(), translator).await;

    let (status, body) = get_json(app.clone(), &format!("/api/bomcn/{}", ROOT)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "TRANSLATION_LOAD_ERROR");

    let (status, _) = get_json(app, &format!("/api/bom/{}", ROOT)).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Distinct codes
// =============================================================================

#[tokio::test]
async fn test_bom_total_first_occurrence_numbering() {
    let app = test_app(all_known()).await;
    let (status, body) = get_json(app, &format!("/api/bomtotal/{}", ROOT)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);

    let codes: Vec<(u64, &str)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["sequence-number"].as_u64().unwrap(),
                c["code"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        codes,
        vec![(1, "360004"), (2, "360010"), (3, "100020"), (4, "360011")]
    );
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_single_lookup_found() {
    let app = test_app(all_known()).await;
    let (status, body) = get_json(app, "/api/queryhe/360010").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["productCode"], "360010");
    assert_eq!(body["msg"], "success");
}

#[tokio::test]
async fn test_single_lookup_not_found_is_distinct_error() {
    let app = test_app(all_known()).await;
    let (status, body) = get_json(app, "/api/queryhe/123456").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_check_products_summary() {
    let catalog = Arc::new(KnownCodesCatalog::new(&["360004", "360010", "100020"]));
    let app = test_app(Arc::clone(&catalog)).await;

    let (status, body) = get_json(app, &format!("/api/checkproduct/{}", ROOT)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
    assert_eq!(body["count-ok"], 3);
    assert_eq!(body["count-not"], 1);
    assert_eq!(body["not-codes"], "The products that are not app 360011");
    assert_eq!(body["message"], "Product check completed successfully");
    assert!(body["sweep-id"].is_string());

    let statuses: Vec<(&str, &str)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| (r["code"].as_str().unwrap(), r["status"].as_str().unwrap()))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("360004", "OK"),
            ("360010", "OK"),
            ("100020", "OK"),
            ("360011", "NOT"),
        ]
    );

    // One lookup per distinct code, in order
    assert_eq!(
        *catalog.lookups.lock().unwrap(),
        vec!["360004", "360010", "100020", "360011"]
    );
}

#[tokio::test]
async fn test_check_products_all_present_has_empty_message() {
    let app = test_app(all_known()).await;
    let (_, body) = get_json(app, &format!("/api/checkproduct/{}", ROOT)).await;

    assert_eq!(body["count-not"], 0);
    assert_eq!(body["not-codes"], "");
}
