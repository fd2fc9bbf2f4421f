//! Catalog verification sweep
//!
//! Checks each deduplicated code against the product catalog, strictly one
//! request at a time, pausing a fixed delay after every request but the last.
//! At the default 100 ms that is at most 10 requests/second, half the
//! upstream quota.
//!
//! Every failed lookup is classified as absent, whatever the cause. The
//! cause is logged, not returned.

use bom_common::models::{DedupedCode, VerificationResult, VerificationStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::{CatalogError, CatalogLookup};

/// One completed verification sweep
#[derive(Debug, Clone, Serialize)]
pub struct VerificationSweep {
    #[serde(rename = "sweep-id")]
    pub sweep_id: Uuid,
    #[serde(rename = "started-at")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "finished-at")]
    pub finished_at: DateTime<Utc>,
    #[serde(skip)]
    pub results: Vec<VerificationResult>,
}

/// Sequential, paced catalog verification
#[derive(Clone)]
pub struct Verifier {
    catalog: Arc<dyn CatalogLookup>,
    delay: Duration,
}

impl Verifier {
    pub fn new(catalog: Arc<dyn CatalogLookup>, delay: Duration) -> Self {
        Self { catalog, delay }
    }

    /// Verify `codes` in order, one result per code
    pub async fn verify(&self, codes: &[DedupedCode]) -> Vec<VerificationResult> {
        let mut results = Vec::with_capacity(codes.len());

        for (index, item) in codes.iter().enumerate() {
            let status = match self.catalog.lookup(&item.code).await {
                Ok(_) => VerificationStatus::Present,
                Err(CatalogError::NotFound(_)) => {
                    debug!(code = %item.code, "Code not in catalog");
                    VerificationStatus::Absent
                }
                Err(e) => {
                    warn!(code = %item.code, error = %e, "Catalog lookup failed, marking absent");
                    VerificationStatus::Absent
                }
            };

            results.push(VerificationResult {
                sequence_number: item.sequence_number,
                code: item.code.clone(),
                status,
            });

            if index + 1 < codes.len() {
                tokio::time::sleep(self.delay).await;
            }
        }

        results
    }

    /// [`Verifier::verify`] with sweep identification and timing
    pub async fn sweep(&self, codes: &[DedupedCode]) -> VerificationSweep {
        let sweep_id = Uuid::new_v4();
        let started_at = Utc::now();

        info!(
            sweep_id = %sweep_id,
            codes = codes.len(),
            delay_ms = self.delay.as_millis() as u64,
            "Verification sweep started"
        );

        let results = self.verify(codes).await;
        let finished_at = Utc::now();

        let absent = results
            .iter()
            .filter(|r| r.status == VerificationStatus::Absent)
            .count();
        info!(
            sweep_id = %sweep_id,
            present = results.len() - absent,
            absent,
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "Verification sweep finished"
        );

        VerificationSweep {
            sweep_id,
            started_at,
            finished_at,
            results,
        }
    }
}
