// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Batch Generation
//!
//! Runs the generate operation over many input rows, one at a time.
//!
//! Rows are processed strictly sequentially to stay inside backend rate and
//! token limits. A failed row is recorded and the driver moves on; rows that
//! already succeeded are kept. Progress is reported after every row.

use crate::application::listing_service::ListingService;
use crate::domain::listing::{GenerationRequest, GenerationResult, TargetPlatform};
use crate::domain::llm::ErrorKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Position reached after a row completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    /// 1-based count of rows finished so far
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchRowOutcome {
    Generated { result: GenerationResult },
    Failed { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRowReport {
    pub index: usize,
    #[serde(flatten)]
    pub outcome: BatchRowOutcome,
}

impl BatchRowReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchRowOutcome::Generated { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    /// One record per input row, in input order
    pub rows: Vec<BatchRowReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.rows.iter().filter(|row| row.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.rows.len() - self.succeeded()
    }
}

/// One input row as read from a batch file.
///
/// Field names follow the HTTP generate body so the same row data can be
/// replayed against either surface.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRow {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub img_link: Option<String>,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub target_platform: Option<String>,
    #[serde(default)]
    pub model_provider: Option<String>,
}

impl BatchRow {
    /// Build the generate request; `default_provider` applies when the row
    /// names none.
    pub fn into_request(self, default_provider: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            product_title: self.title,
            image_url: self.img_link,
            image_inline: self.image_base64,
            target_platform: self
                .target_platform
                .as_deref()
                .map(TargetPlatform::from_label)
                .unwrap_or_default(),
            provider_override: self
                .model_provider
                .or_else(|| default_provider.map(str::to_string)),
        }
    }
}

pub struct BatchGenerationDriver {
    service: Arc<dyn ListingService>,
}

impl BatchGenerationDriver {
    pub fn new(service: Arc<dyn ListingService>) -> Self {
        Self { service }
    }

    /// Generate every row in order, one in-flight call at a time.
    pub async fn run<F>(&self, rows: Vec<GenerationRequest>, mut on_progress: F) -> BatchReport
    where
        F: FnMut(BatchProgress) + Send,
    {
        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = rows.len();
        let mut reports = Vec::with_capacity(total);

        info!(%batch_id, total, "Starting batch generation");

        for (index, request) in rows.into_iter().enumerate() {
            let outcome = match self.service.generate(request).await {
                Ok(result) => {
                    info!(%batch_id, row = index, provider = %result.provider, "Batch row generated");
                    metrics::counter!("listing_batch_rows_total", "outcome" => "generated").increment(1);
                    BatchRowOutcome::Generated { result }
                }
                Err(e) => {
                    warn!(%batch_id, row = index, kind = %e.kind(), "Batch row failed: {}", e);
                    metrics::counter!("listing_batch_rows_total", "outcome" => "failed").increment(1);
                    BatchRowOutcome::Failed {
                        kind: e.kind(),
                        message: e.to_string(),
                    }
                }
            };

            reports.push(BatchRowReport { index, outcome });
            on_progress(BatchProgress {
                current: index + 1,
                total,
            });
        }

        let report = BatchReport {
            batch_id,
            started_at,
            finished_at: Utc::now(),
            total,
            rows: reports,
        };

        info!(
            %batch_id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch generation finished"
        );
        report
    }
}
