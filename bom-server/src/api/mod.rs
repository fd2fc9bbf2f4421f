//! HTTP API handlers for bom-server

pub mod bom;
pub mod catalog;
pub mod health;

pub use bom::bom_routes;
pub use catalog::catalog_routes;
pub use health::health_routes;

use serde::Serialize;

use crate::error::{ApiError, ApiResult};

/// Standard success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    pub count: usize,
    pub message: String,
}

impl<T> Envelope<Vec<T>> {
    pub fn list(data: Vec<T>, message: &str) -> Self {
        Self {
            count: data.len(),
            data,
            message: message.to_string(),
        }
    }
}

/// Trimmed, non-empty item code from the request path
pub(crate) fn require_item_code(raw: &str) -> ApiResult<&str> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(ApiError::BadRequest("Item code is required".to_string()));
    }
    Ok(code)
}
