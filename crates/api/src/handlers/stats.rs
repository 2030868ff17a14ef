//! Back-office dashboard counters.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use vline_db::repositories::{ModelRepo, ProcessedImageRepo, ProductRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogStats {
    pub products: i64,
    pub models: i64,
    pub processed_images: i64,
}

/// GET /api/v1/admin/stats
pub async fn get_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CatalogStats>>> {
    let (products, models, processed_images) = tokio::try_join!(
        ProductRepo::count(&state.pool),
        ModelRepo::count(&state.pool),
        ProcessedImageRepo::count(&state.pool),
    )?;
    Ok(Json(DataResponse {
        data: CatalogStats {
            products,
            models,
            processed_images,
        },
    }))
}
