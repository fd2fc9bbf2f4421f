//! Product catalog endpoints
//!
//! GET /api/queryhe/:item_code - single-code lookup passthrough
//! GET /api/checkproduct/:item_code - verification sweep over a whole BOM

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bom_common::models::{VerificationResult, VerificationSummary};
use serde::Serialize;

use super::require_item_code;
use crate::{
    catalog::CatalogMatch, dedup::dedupe, error::ApiResult, verification::VerificationSweep,
    AppState,
};

/// Verification sweep response
#[derive(Debug, Serialize)]
pub struct CheckProductResponse {
    pub data: Vec<VerificationResult>,
    pub count: usize,
    #[serde(flatten)]
    pub summary: VerificationSummary,
    pub message: String,
    #[serde(flatten)]
    pub sweep: VerificationSweep,
}

/// GET /api/queryhe/:item_code
///
/// Lookup failures are returned as errors, unlike in a sweep.
pub async fn query_catalog(
    State(state): State<AppState>,
    Path(item_code): Path<String>,
) -> ApiResult<Json<CatalogMatch>> {
    let code = require_item_code(&item_code)?;
    let found = state.catalog.lookup(code).await?;
    Ok(Json(found))
}

/// GET /api/checkproduct/:item_code
///
/// Expands the BOM, deduplicates its codes and verifies each one. Takes
/// roughly 100 ms per distinct code.
pub async fn check_products(
    State(state): State<AppState>,
    Path(item_code): Path<String>,
) -> ApiResult<Json<CheckProductResponse>> {
    let code = require_item_code(&item_code)?;
    let rows = state.hierarchy.expand(code).await?;
    let codes = dedupe(&rows);

    let mut sweep = state.verifier.sweep(&codes).await;
    let data = std::mem::take(&mut sweep.results);
    let summary = VerificationSummary::from_results(&data);

    Ok(Json(CheckProductResponse {
        count: data.len(),
        data,
        summary,
        message: "Product check completed successfully".to_string(),
        sweep,
    }))
}

/// Build catalog routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/queryhe/:item_code", get(query_catalog))
        .route("/api/checkproduct/:item_code", get(check_products))
}
