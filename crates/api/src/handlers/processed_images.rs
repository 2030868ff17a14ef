//! Admin listing of stored try-on results.

use axum::extract::State;
use axum::Json;
use vline_db::models::processed_image::ProcessedImage;
use vline_db::repositories::ProcessedImageRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/processed-images
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProcessedImage>>>> {
    let rows = ProcessedImageRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: rows }))
}
