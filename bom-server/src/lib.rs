//! bom-server library - BOM explosion service
//!
//! Expands a part's bill of materials from the ERP store, translates part
//! names, lists distinct codes and verifies them against the product catalog.

pub mod api;
pub mod catalog;
pub mod db;
pub mod dedup;
pub mod error;
pub mod hierarchy;
pub mod translation;
pub mod verification;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::catalog::CatalogLookup;
use crate::hierarchy::{HierarchyResolver, HierarchyStore};
use crate::translation::Translator;
use crate::verification::Verifier;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub hierarchy: HierarchyResolver,
    /// Process-wide translation tables, loaded on first use
    pub translator: Arc<Translator>,
    pub catalog: Arc<dyn CatalogLookup>,
    pub verifier: Verifier,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn HierarchyStore>,
        translator: Arc<Translator>,
        catalog: Arc<dyn CatalogLookup>,
        verification_delay: Duration,
    ) -> Self {
        Self {
            hierarchy: HierarchyResolver::new(store),
            translator,
            verifier: Verifier::new(Arc::clone(&catalog), verification_delay),
            catalog,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::bom_routes())
        .merge(api::catalog_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
