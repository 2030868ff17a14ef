//! Single-pair try-on endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use vline_core::error::CoreError;
use vline_core::types::DbId;
use vline_db::models::processed_image::ProcessedImage;
use vline_db::repositories::{ModelRepo, ProductRepo};
use vline_tryon::TryOnRequest;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/try-on`.
#[derive(Debug, Deserialize)]
pub struct TryOnPairRequest {
    pub product_id: DbId,
    pub model_id: DbId,
}

/// POST /api/v1/admin/try-on
///
/// Render one product onto one model and store the result. Any failure along
/// the way is a 502 carrying the cause; nothing is written in that case.
pub async fn invoke(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<TryOnPairRequest>,
) -> AppResult<Json<DataResponse<ProcessedImage>>> {
    let product = ProductRepo::find_by_id(&state.pool, input.product_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: input.product_id,
        }))?;
    let model = ModelRepo::find_by_id(&state.pool, input.model_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Model",
            id: input.model_id,
        }))?;

    let request = TryOnRequest {
        product_id: product.id,
        product_image_url: product.original_image_url,
        model_id: model.id,
        model_image_url: model.image_url,
    };
    let processed = state.tryon.invoke(&state.pool, &request).await?;

    Ok(Json(DataResponse { data: processed }))
}
