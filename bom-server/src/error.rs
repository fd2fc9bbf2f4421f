//! Error types for bom-server
//!
//! Maps core failures onto HTTP responses. Query and translation-load
//! failures abort the request; catalog failures only reach this type from the
//! single-code lookup endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::catalog::CatalogError;
use crate::translation::LoadError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Hierarchy store failure (500)
    #[error(transparent)]
    Query(#[from] bom_common::Error),

    /// Translation data could not be loaded (500)
    #[error("Translation data unavailable: {0}")]
    Translation(#[from] LoadError),

    /// Single-code catalog lookup failure (404/502/503)
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Query(_) => (StatusCode::INTERNAL_SERVER_ERROR, "QUERY_ERROR"),
            ApiError::Translation(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "TRANSLATION_LOAD_ERROR")
            }
            ApiError::Catalog(CatalogError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Catalog(CatalogError::NotConfigured) => {
                (StatusCode::SERVICE_UNAVAILABLE, "CATALOG_NOT_CONFIGURED")
            }
            ApiError::Catalog(_) => (StatusCode::BAD_GATEWAY, "CATALOG_ERROR"),
        };

        let message = self.to_string();
        if status.is_server_error() {
            error!(code = error_code, "{}", message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
