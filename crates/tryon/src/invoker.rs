//! Try-on of a single (product, model) pair.
//!
//! Fetches both source images, runs a prediction on the next account in the
//! rotation, copies the generated image into the `processed` bucket, and
//! upserts the result row. The row is written last, so a failure at any
//! earlier step leaves the database untouched.

use std::sync::Arc;

use sqlx::PgPool;
use vline_core::tryon::GenerationParams;
use vline_core::types::DbId;
use vline_db::models::processed_image::{ProcessedImage, UpsertTryOnResult};
use vline_db::repositories::ProcessedImageRepo;
use vline_storage::{Bucket, MediaStore, StorageError};

use crate::accounts::AccountPool;
use crate::client::{ImageInput, ProviderError, TryOnProvider};

/// Content type assumed when a source image response does not declare one.
const FALLBACK_CONTENT_TYPE: &str = "image/png";

/// Errors from one try-on attempt. Each variant names the step that failed.
#[derive(Debug, thiserror::Error)]
pub enum TryOnError {
    #[error("Failed to fetch {what} image from {url}: {reason}")]
    Fetch {
        what: &'static str,
        url: String,
        reason: String,
    },

    #[error("Try-on inference failed: {0}")]
    Inference(String),

    #[error("Try-on returned an invalid output: {0}")]
    InvalidOutput(String),

    #[error("Failed to download the generated image from {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Failed to store the generated image: {0}")]
    Upload(#[from] StorageError),

    #[error("Failed to record the try-on result: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ProviderError> for TryOnError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidOutput(msg) => TryOnError::InvalidOutput(msg),
            other => TryOnError::Inference(other.to_string()),
        }
    }
}

/// One pair to process.
#[derive(Debug, Clone)]
pub struct TryOnRequest {
    pub product_id: DbId,
    pub product_image_url: String,
    pub model_id: DbId,
    pub model_image_url: String,
}

/// Runs try-ons against a provider, storing results in the media store.
pub struct TryOnInvoker {
    http: reqwest::Client,
    provider: Arc<dyn TryOnProvider>,
    accounts: AccountPool,
    store: Arc<dyn MediaStore>,
    params: GenerationParams,
}

impl TryOnInvoker {
    pub fn new(
        http: reqwest::Client,
        provider: Arc<dyn TryOnProvider>,
        accounts: AccountPool,
        store: Arc<dyn MediaStore>,
    ) -> Self {
        if accounts.is_empty() {
            tracing::warn!("No try-on account tokens configured, predictions will use the free tier");
        }
        Self {
            http,
            provider,
            accounts,
            store,
            params: GenerationParams::default(),
        }
    }

    /// Process one pair end to end and return the stored result row.
    pub async fn invoke(
        &self,
        pool: &PgPool,
        request: &TryOnRequest,
    ) -> Result<ProcessedImage, TryOnError> {
        let garment = self
            .fetch_image("product", &request.product_image_url)
            .await?;
        let person = self.fetch_image("model", &request.model_image_url).await?;

        let token = self.accounts.next_token();
        if token.is_none() {
            tracing::warn!(
                product_id = request.product_id,
                model_id = request.model_id,
                "Calling try-on without an account token"
            );
        }

        let result_url = self
            .provider
            .generate(garment, person, &self.params, token)
            .await?;

        let bytes = self.download(&result_url).await?;
        let stored = self
            .store
            .upload(Bucket::Processed, "tryon.png", "image/png", bytes)
            .await?;

        let row = ProcessedImageRepo::upsert_for_pair(
            pool,
            &UpsertTryOnResult {
                product_id: request.product_id,
                model_id: request.model_id,
                processed_image_url: stored.url,
            },
        )
        .await?;

        tracing::info!(
            product_id = request.product_id,
            model_id = request.model_id,
            processed_image_id = row.id,
            "Try-on completed"
        );
        Ok(row)
    }

    async fn fetch_image(&self, what: &'static str, url: &str) -> Result<ImageInput, TryOnError> {
        let fail = |reason: String| TryOnError::Fetch {
            what,
            url: url.to_string(),
            reason,
        };

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fail(format!("status {}", response.status())));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let bytes = response.bytes().await.map_err(|e| fail(e.to_string()))?;

        Ok(ImageInput {
            file_name: file_name_from_url(url, what),
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, TryOnError> {
        let fail = |reason: String| TryOnError::Download {
            url: url.to_string(),
            reason,
        };

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fail(format!("status {}", response.status())));
        }
        let bytes = response.bytes().await.map_err(|e| fail(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Last path segment of a URL, without query or fragment.
fn file_name_from_url(url: &str, fallback_stem: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() && !name.contains(':') => name.to_string(),
        _ => format!("{fallback_stem}.png"),
    }
}
