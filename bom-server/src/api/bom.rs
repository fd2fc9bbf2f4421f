//! BOM expansion endpoints
//!
//! GET /api/bom/:item_code, /api/bomcn/:item_code,
//! /api/bomcombined/:item_code, /api/bomtotal/:item_code

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bom_common::models::{CombinedRow, DedupedCode, HierarchyRow};
use serde::Serialize;
use tracing::info;

use super::{require_item_code, Envelope};
use crate::{dedup::dedupe, error::ApiResult, translation, AppState};

/// Expansion with translated names and the codes that had no translation
#[derive(Debug, Serialize)]
pub struct TranslatedEnvelope<T> {
    pub data: Vec<T>,
    pub count: usize,
    pub message: String,
    #[serde(rename = "untranslated-codes")]
    pub untranslated_codes: Vec<String>,
}

/// GET /api/bom/:item_code
pub async fn get_bom(
    State(state): State<AppState>,
    Path(item_code): Path<String>,
) -> ApiResult<Json<Envelope<Vec<HierarchyRow>>>> {
    let code = require_item_code(&item_code)?;
    let rows = state.hierarchy.expand(code).await?;

    info!(item_code = %code, rows = rows.len(), "BOM expanded");
    Ok(Json(Envelope::list(rows, "BOM data retrieved successfully")))
}

/// GET /api/bomcn/:item_code
///
/// Names are replaced by their translations; untranslated names are shown
/// as they are and their codes listed.
pub async fn get_bom_translated(
    State(state): State<AppState>,
    Path(item_code): Path<String>,
) -> ApiResult<Json<TranslatedEnvelope<HierarchyRow>>> {
    let code = require_item_code(&item_code)?;
    let rows = state.hierarchy.expand(code).await?;

    let (translated, untranslated_codes) = {
        let tables = state.translator.tables().await?;
        translation::apply_with_tracking(&rows, &tables)
    };
    let data: Vec<HierarchyRow> = translated.iter().map(HierarchyRow::localized).collect();

    info!(
        item_code = %code,
        rows = data.len(),
        untranslated = untranslated_codes.len(),
        "Translated BOM expanded"
    );
    Ok(Json(TranslatedEnvelope {
        count: data.len(),
        data,
        message: "BOM data with Chinese translations retrieved successfully".to_string(),
        untranslated_codes,
    }))
}

/// GET /api/bomcombined/:item_code
///
/// Original and translated names side by side.
pub async fn get_bom_combined(
    State(state): State<AppState>,
    Path(item_code): Path<String>,
) -> ApiResult<Json<TranslatedEnvelope<CombinedRow>>> {
    let code = require_item_code(&item_code)?;
    let rows = state.hierarchy.expand(code).await?;

    let (translated, untranslated_codes) = {
        let tables = state.translator.tables().await?;
        translation::apply_with_tracking(&rows, &tables)
    };
    let data: Vec<CombinedRow> = translated.into_iter().map(CombinedRow::from).collect();

    info!(
        item_code = %code,
        rows = data.len(),
        untranslated = untranslated_codes.len(),
        "Combined BOM expanded"
    );
    Ok(Json(TranslatedEnvelope {
        count: data.len(),
        data,
        message: "BOM data with Turkish and Chinese retrieved successfully".to_string(),
        untranslated_codes,
    }))
}

/// GET /api/bomtotal/:item_code
pub async fn get_bom_total(
    State(state): State<AppState>,
    Path(item_code): Path<String>,
) -> ApiResult<Json<Envelope<Vec<DedupedCode>>>> {
    let code = require_item_code(&item_code)?;
    let rows = state.hierarchy.expand(code).await?;
    let codes = dedupe(&rows);

    info!(item_code = %code, codes = codes.len(), "Distinct BOM codes listed");
    Ok(Json(Envelope::list(codes, "Unique BOM codes retrieved successfully")))
}

/// Build BOM expansion routes
pub fn bom_routes() -> Router<AppState> {
    Router::new()
        .route("/api/bom/:item_code", get(get_bom))
        .route("/api/bomcn/:item_code", get(get_bom_translated))
        .route("/api/bomcombined/:item_code", get(get_bom_combined))
        .route("/api/bomtotal/:item_code", get(get_bom_total))
}
