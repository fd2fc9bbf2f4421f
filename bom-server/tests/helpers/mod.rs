//! Shared fixtures for bom-server integration tests
//!
//! Provides an in-memory hierarchy store seeded with a small BOM, preloaded
//! translation tables and a catalog that knows a fixed set of codes.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bom_server::catalog::{CatalogError, CatalogLookup, CatalogMatch};
use bom_server::db::{SqliteHierarchyStore, STORE_SCHEMA};
use bom_server::translation::{TranslationTables, Translator};
use bom_server::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// Root of the seeded BOM
///
/// ```text
/// 360004 Gövde
/// ├── 360010 Kapak   (D1/1)
/// │   ├── 360011 Menteşe (D2/1)
/// │   └── 100020 Vida    (D2/2)
/// └── 100020 Vida    (D1/2)
/// ```
/// Plus one non-hierarchy link 360004 → 999999 that must never appear.
pub const ROOT: &str = "360004";

/// In-memory store with the seeded BOM
pub async fn seeded_pool() -> SqlitePool {
    // Single connection: every `:memory:` connection is a separate database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");

    sqlx::raw_sql(STORE_SCHEMA)
        .execute(&pool)
        .await
        .expect("Should create schema");

    sqlx::raw_sql(
        r#"
        INSERT INTO bom_links (document_no, line_no, parent_code, child_code, quantity, link_type) VALUES
            ('D1', 1, '360004', '360010', 2.0, 'H'),
            ('D1', 2, '360004', '100020', 4.0, 'H'),
            ('D2', 2, '360010', '100020', 1.0, 'H'),
            ('D2', 1, '360010', '360011 ', 1.0, 'H'),
            ('D3', 1, '360004', '999999', 1.0, 'R');

        INSERT INTO items (code, name, spec) VALUES
            ('360004', 'Gövde', NULL),
            ('360010', 'Kapak ', '40x40'),
            ('360011', 'Menteşe', NULL),
            ('100020', 'Vida', 'M4');
        "#,
    )
    .execute(&pool)
    .await
    .expect("Should seed BOM");

    pool
}

/// Direct: Gövde, Vida. Prefix 3600: Kapak. Menteşe has no translation.
pub fn translation_tables() -> TranslationTables {
    let direct = HashMap::from([
        ("Gövde".to_string(), "身体".to_string()),
        ("Vida".to_string(), "螺丝".to_string()),
    ]);
    let fallback = HashMap::from([(
        "3600".to_string(),
        HashMap::from([("Kapak".to_string(), "盖".to_string())]),
    )]);
    TranslationTables::new(direct, fallback)
}

/// Catalog that knows a fixed set of codes and records every lookup
pub struct KnownCodesCatalog {
    known: HashSet<String>,
    pub lookups: Mutex<Vec<String>>,
}

impl KnownCodesCatalog {
    pub fn new(known: &[&str]) -> Self {
        Self {
            known: known.iter().map(|code| code.to_string()).collect(),
            lookups: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CatalogLookup for KnownCodesCatalog {
    async fn lookup(&self, code: &str) -> Result<CatalogMatch, CatalogError> {
        self.lookups.lock().unwrap().push(code.to_string());
        if self.known.contains(code) {
            Ok(CatalogMatch {
                code: json!(200),
                data: json!({ "productCode": code }),
                msg: json!("success"),
            })
        } else {
            Err(CatalogError::NotFound(code.to_string()))
        }
    }
}

/// Router over the seeded store with preloaded translations
pub async fn test_app(catalog: Arc<KnownCodesCatalog>) -> Router {
    let translator = Arc::new(Translator::preloaded(translation_tables()));
    app_with_translator(catalog, translator).await
}

pub async fn app_with_translator(
    catalog: Arc<KnownCodesCatalog>,
    translator: Arc<Translator>,
) -> Router {
    let store = Arc::new(SqliteHierarchyStore::new(seeded_pool().await));
    let state = AppState::new(store, translator, catalog, Duration::ZERO);
    build_router(state)
}

/// Issue a GET and decode the JSON body
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, body)
}
