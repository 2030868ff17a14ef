//! Shared multipart helpers for the upload handlers.

use axum::extract::multipart::Field;
use vline_core::catalog::validate_image_file_name;
use vline_storage::{Bucket, StoredObject};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A file part read fully into memory.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Read a file part. Missing metadata falls back to `default_name` and
/// `application/octet-stream`.
pub async fn read_file(field: Field<'_>, default_name: &str) -> AppResult<UploadedFile> {
    let file_name = field.file_name().unwrap_or(default_name).to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field.bytes().await?;
    Ok(UploadedFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    })
}

/// Read a text part, trimmed. Blank values become `None`.
pub async fn read_text(field: Field<'_>) -> AppResult<Option<String>> {
    let text = field.text().await?;
    let trimmed = text.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// Validate an uploaded image and store it in `bucket`.
///
/// An empty file or unsupported extension is a 400 and never reaches the store.
pub async fn store_image(
    state: &AppState,
    bucket: Bucket,
    file: UploadedFile,
) -> AppResult<StoredObject> {
    validate_image_file_name(&file.file_name)?;
    store_file(state, bucket, file).await
}

/// Store any non-empty file in `bucket`.
pub async fn store_file(
    state: &AppState,
    bucket: Bucket,
    file: UploadedFile,
) -> AppResult<StoredObject> {
    if file.bytes.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Uploaded file '{}' is empty",
            file.file_name
        )));
    }
    let stored = state
        .media
        .upload(bucket, &file.file_name, &file.content_type, file.bytes)
        .await?;
    tracing::debug!(bucket = %bucket, key = %stored.key, "Stored upload");
    Ok(stored)
}
