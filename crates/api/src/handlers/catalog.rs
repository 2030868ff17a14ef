//! Public storefront handlers for the `/catalog` resource.
//!
//! Nothing here requires authentication. Hidden products do not exist as far
//! as these endpoints are concerned, so every product lookup answers 404 for
//! them.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use vline_core::error::CoreError;
use vline_core::reveal::RevealState;
use vline_core::types::DbId;
use vline_db::models::model::Model;
use vline_db::models::processed_image::{ProcessedImage, ProcessedImageWithModel};
use vline_db::models::product::Product;
use vline_db::repositories::{ModelRepo, ProcessedImageRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A try-on result as shown on the product page.
#[derive(Debug, Serialize)]
pub struct TryOnView {
    #[serde(flatten)]
    pub result: ProcessedImageWithModel,
    /// Initial state of the per-result reveal toggle.
    pub reveal: RevealState,
}

impl From<ProcessedImageWithModel> for TryOnView {
    fn from(result: ProcessedImageWithModel) -> Self {
        Self {
            result,
            reveal: RevealState::default(),
        }
    }
}

/// Product page payload.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub try_ons: Vec<TryOnView>,
    pub manual_media: Option<ProcessedImage>,
}

/// GET /api/v1/catalog/products
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let products = ProductRepo::list(&state.pool, true).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/catalog/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductDetail>>> {
    let product = find_visible_product(&state, id).await?;
    let (try_ons, manual_media) = tokio::try_join!(
        ProcessedImageRepo::list_for_product_with_model(&state.pool, id),
        ProcessedImageRepo::find_manual_for_product(&state.pool, id),
    )?;

    Ok(Json(DataResponse {
        data: ProductDetail {
            product,
            try_ons: try_ons.into_iter().map(TryOnView::from).collect(),
            manual_media,
        },
    }))
}

/// GET /api/v1/catalog/products/{id}/try-ons
pub async fn list_try_ons(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TryOnView>>>> {
    find_visible_product(&state, id).await?;
    let rows = ProcessedImageRepo::list_for_product_with_model(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: rows.into_iter().map(TryOnView::from).collect(),
    }))
}

/// GET /api/v1/catalog/products/{id}/manual-media
///
/// `data` is `null` when the partner has not supplied any media.
pub async fn get_manual_media(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Option<ProcessedImage>>>> {
    find_visible_product(&state, id).await?;
    let row = ProcessedImageRepo::find_manual_for_product(&state.pool, id).await?;
    Ok(Json(DataResponse { data: row }))
}

/// GET /api/v1/catalog/models
pub async fn list_models(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Model>>>> {
    let models = ModelRepo::list(&state.pool, true).await?;
    Ok(Json(DataResponse { data: models }))
}

async fn find_visible_product(state: &AppState, id: DbId) -> AppResult<Product> {
    ProductRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.is_visible)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))
}
