//! Fan-out of one product over a selection of models.
//!
//! Pairs are processed one at a time in selection order. A failed pair is
//! logged and recorded in the report, then the batch moves on; results that
//! already succeeded are never rolled back.

use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use vline_core::types::DbId;
use vline_db::models::model::Model;

use crate::invoker::{TryOnInvoker, TryOnRequest};
use crate::progress::ProgressTracker;

/// Result of one (product, model) attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairOutcome {
    Succeeded {
        model_id: DbId,
        processed_image_id: DbId,
        processed_image_url: Option<String>,
    },
    Failed {
        model_id: DbId,
        error: String,
    },
}

impl PairOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PairOutcome::Succeeded { .. })
    }
}

/// Summary of a finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct FanOutReport {
    pub product_id: DbId,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<PairOutcome>,
}

/// Run a batch to completion on the current task.
pub async fn run_fan_out(
    invoker: &TryOnInvoker,
    pool: &PgPool,
    tracker: &ProgressTracker,
    product_id: DbId,
    product_image_url: &str,
    models: &[Model],
) -> FanOutReport {
    let total = models.len();
    tracker.start(product_id, total).await;
    tracing::info!(product_id, total, "Starting try-on fan-out");

    let mut outcomes = Vec::with_capacity(total);
    for (index, model) in models.iter().enumerate() {
        let request = TryOnRequest {
            product_id,
            product_image_url: product_image_url.to_string(),
            model_id: model.id,
            model_image_url: model.image_url.clone(),
        };

        let outcome = match invoker.invoke(pool, &request).await {
            Ok(row) => PairOutcome::Succeeded {
                model_id: model.id,
                processed_image_id: row.id,
                processed_image_url: row.processed_image_url,
            },
            Err(e) => {
                tracing::warn!(
                    product_id,
                    model_id = model.id,
                    attempt = index + 1,
                    total,
                    error = %e,
                    "Try-on failed for model, continuing with the rest"
                );
                PairOutcome::Failed {
                    model_id: model.id,
                    error: e.to_string(),
                }
            }
        };
        outcomes.push(outcome);
        tracker.advance(product_id).await;
    }
    tracker.finish(product_id).await;

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let report = FanOutReport {
        product_id,
        total,
        succeeded,
        failed: total - succeeded,
        outcomes,
    };
    tracing::info!(
        product_id,
        succeeded = report.succeeded,
        failed = report.failed,
        "Try-on fan-out finished"
    );
    report
}

/// Run a batch on its own task. The batch keeps going even if the caller
/// stops waiting on the handle.
pub fn spawn_fan_out(
    invoker: Arc<TryOnInvoker>,
    pool: PgPool,
    tracker: ProgressTracker,
    product_id: DbId,
    product_image_url: String,
    models: Vec<Model>,
) -> JoinHandle<FanOutReport> {
    tokio::spawn(async move {
        run_fan_out(
            &invoker,
            &pool,
            &tracker,
            product_id,
            &product_image_url,
            &models,
        )
        .await
    })
}
