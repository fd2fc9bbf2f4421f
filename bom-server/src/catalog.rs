//! External product catalog client
//!
//! The catalog is queried with one part code per request
//! (`POST {base_url}{path}`, JSON body `{"productCode": ...}`, `X-Auth`
//! header). Its search is fuzzy, so a response can carry several candidate
//! products; only the candidate whose `productCode` equals the queried code
//! counts as a match.
//!
//! Upstream quota: 20 requests/second across the whole process. The client
//! holds a rate limiter at that ceiling so concurrent verification sweeps
//! cannot exceed it together.

use async_trait::async_trait;
use bom_common::config::CatalogSettings;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU32;
use thiserror::Error;
use tracing::debug;

/// Catalog lookup failures
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog lookup is not configured (base URL, path and auth token are required)")]
    NotConfigured,

    #[error("Catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog returned non-OK status: {status}, body: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse catalog response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No product found with exact code: {0}")]
    NotFound(String),
}

/// Exact-match lookup result, shaped like the catalog's own envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogMatch {
    pub code: Value,
    /// The matching product object
    pub data: Value,
    pub msg: Value,
}

/// Single-code lookup against the product catalog
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn lookup(&self, code: &str) -> Result<CatalogMatch, CatalogError>;
}

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    #[serde(rename = "productCode")]
    product_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    code: Value,
    #[serde(default)]
    msg: Value,
    #[serde(default)]
    data: Option<CandidatePage>,
}

/// `data` may be absent or `null` when nothing matched
#[derive(Debug, Deserialize)]
struct CandidatePage {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

/// Pick the candidate whose `productCode` equals `code`
pub fn select_exact_match(code: &str, candidates: Vec<Value>) -> Option<Value> {
    candidates
        .into_iter()
        .find(|candidate| candidate.get("productCode").and_then(Value::as_str) == Some(code))
}

/// Parse a successful catalog response body for `code`
///
/// A body without a candidate list, or with a `null` one, is treated as zero
/// candidates.
pub fn parse_lookup_response(code: &str, body: &[u8]) -> Result<CatalogMatch, CatalogError> {
    let response: LookupResponse = serde_json::from_slice(body)?;
    let candidates = response
        .data
        .and_then(|page| page.data)
        .unwrap_or_default();
    let candidate_count = candidates.len();

    match select_exact_match(code, candidates) {
        Some(product) => Ok(CatalogMatch {
            code: response.code,
            data: product,
            msg: response.msg,
        }),
        None => {
            debug!(code = %code, candidates = candidate_count, "No exact catalog match");
            Err(CatalogError::NotFound(code.to_string()))
        }
    }
}

/// HTTP catalog client
pub struct HttpCatalogClient {
    http_client: Client,
    endpoint: Option<String>,
    auth_token: Option<String>,
    rate_limiter: DefaultDirectRateLimiter,
}

impl HttpCatalogClient {
    /// Build a client from settings
    ///
    /// Incomplete settings are not an error here: every lookup then fails
    /// with [`CatalogError::NotConfigured`].
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let per_second =
            NonZeroU32::new(settings.max_requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client: Client::builder().timeout(settings.timeout).build()?,
            endpoint: settings.endpoint(),
            auth_token: settings.auth_token.clone(),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.auth_token.is_some()
    }
}

#[async_trait]
impl CatalogLookup for HttpCatalogClient {
    async fn lookup(&self, code: &str) -> Result<CatalogMatch, CatalogError> {
        let (Some(endpoint), Some(auth_token)) = (&self.endpoint, &self.auth_token) else {
            return Err(CatalogError::NotConfigured);
        };

        self.rate_limiter.until_ready().await;

        debug!(code = %code, "Querying product catalog");

        let response = self
            .http_client
            .post(endpoint)
            .header("X-Auth", auth_token)
            .json(&LookupRequest { product_code: code })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        parse_lookup_response(code, &body)
    }
}
