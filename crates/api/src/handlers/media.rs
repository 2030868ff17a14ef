//! Raw media upload for the back office.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use vline_storage::{Bucket, StoredObject};

use super::form::{read_file, store_file};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/media/{bucket}
///
/// Store the multipart `file` field in one of the `products`, `models`, or
/// `processed` buckets and return its public URL.
pub async fn upload(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<StoredObject>>)> {
    let bucket: Bucket = bucket.parse().map_err(AppError::BadRequest)?;

    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            file = Some(read_file(field, "upload.bin").await?);
        }
    }
    let file = file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let stored = store_file(&state, bucket, file).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: stored })))
}
