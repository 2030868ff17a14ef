//! Admin handlers for the `/admin/products` resource.
//!
//! Creating a product uploads its image, records it, notifies the partner
//! site, and renders it onto each selected model. The fan-out runs on its own
//! task; the request waits for the report, but a dropped request leaves the
//! batch running.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vline_core::catalog::{
    parse_model_ids, validate_model_selection, validate_name, validate_price,
};
use vline_core::error::CoreError;
use vline_core::types::DbId;
use vline_db::models::model::Model;
use vline_db::models::product::{CreateProduct, Product, UpdateProduct};
use vline_db::repositories::{ModelRepo, ProductRepo};
use vline_storage::Bucket;
use vline_tryon::{spawn_fan_out, FanOutProgress, FanOutReport};

use super::form::{read_file, read_text, store_image, UploadedFile};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response body of product creation.
#[derive(Debug, Serialize)]
pub struct CreatedProduct {
    pub product: Product,
    pub try_ons: FanOutReport,
}

/// Request body for `PUT /admin/products/{id}/visibility`.
#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub is_visible: bool,
}

/// Request body for `POST /admin/products/{id}/try-ons`.
#[derive(Debug, Deserialize)]
pub struct RerunTryOnsRequest {
    pub model_ids: Vec<DbId>,
}

/// Multipart fields of the create form.
#[derive(Debug, Default)]
struct ProductForm {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    category: Option<String>,
    model_ids: Vec<DbId>,
    image: Option<UploadedFile>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/products
///
/// All products, hidden ones included, newest first.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let products = ProductRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/admin/products/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = find_product(&state, id).await?;
    Ok(Json(DataResponse { data: product }))
}

/// POST /api/v1/admin/products
///
/// Multipart form: `name`, `description`, `price`, `category`, `model_ids`
/// (comma-separated, 1 to 3 ids) and the `image` file.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedProduct>>)> {
    let form = read_product_form(multipart).await?;

    let name = form.name.unwrap_or_default();
    validate_name("name", &name)?;
    validate_price(form.price)?;
    let image = form
        .image
        .ok_or_else(|| AppError::BadRequest("Missing required 'image' field".into()))?;

    // Resolve the selection before anything is stored.
    let models = resolve_models(&state, &form.model_ids).await?;

    let stored = store_image(&state, Bucket::Products, image).await?;

    let product = ProductRepo::create(
        &state.pool,
        &CreateProduct {
            name,
            description: form.description,
            price: form.price,
            category: form.category,
            original_image_url: stored.url,
            is_visible: None,
        },
    )
    .await?;
    tracing::info!(
        product_id = product.id,
        user_id = admin.user_id,
        models = models.len(),
        "Product created"
    );

    state.partner.notify_product_created(&product).await;

    let report = run_batch(&state, &product, models).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedProduct {
                product,
                try_ons: report,
            },
        }),
    ))
}

/// PATCH /api/v1/admin/products/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateProduct>,
) -> AppResult<Json<DataResponse<Product>>> {
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    validate_price(input.price)?;

    let product = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    Ok(Json(DataResponse { data: product }))
}

/// PUT /api/v1/admin/products/{id}/visibility
///
/// Setting the current value again is a no-op that still succeeds.
pub async fn set_visibility(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<VisibilityRequest>,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = ProductRepo::set_visibility(&state.pool, id, input.is_visible)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    tracing::info!(product_id = id, is_visible = input.is_visible, "Product visibility set");
    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/admin/products/{id}
///
/// Hard delete. Try-on results and manual media go with the product, and so
/// does its batch progress entry.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProductRepo::delete(&state.pool, id).await?;
    if deleted {
        state.progress.remove(id).await;
        tracing::info!(product_id = id, "Product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))
    }
}

/// POST /api/v1/admin/products/{id}/try-ons
///
/// Run the fan-out again for an existing product. Existing results for the
/// same models are replaced.
pub async fn rerun_try_ons(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<RerunTryOnsRequest>,
) -> AppResult<Json<DataResponse<FanOutReport>>> {
    let product = find_product(&state, id).await?;
    let models = resolve_models(&state, &input.model_ids).await?;
    let report = run_batch(&state, &product, models).await?;
    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/admin/products/{id}/try-ons/progress
///
/// `data` is `null` when no batch has run for the product since startup.
pub async fn progress(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Option<FanOutProgress>>>> {
    find_product(&state, id).await?;
    let progress = state.progress.get(id).await;
    Ok(Json(DataResponse { data: progress }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_product(state: &AppState, id: DbId) -> AppResult<Product> {
    ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))
}

/// Validate a selection and load its models in selection order.
///
/// Unknown ids are a 404 and inactive models a 400, both before any
/// try-on call is made.
async fn resolve_models(state: &AppState, model_ids: &[DbId]) -> AppResult<Vec<Model>> {
    validate_model_selection(model_ids)?;

    let models = ModelRepo::find_by_ids(&state.pool, model_ids).await?;
    if let Some(&missing) = model_ids
        .iter()
        .find(|id| !models.iter().any(|m| m.id == **id))
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Model",
            id: missing,
        }));
    }
    if let Some(inactive) = models.iter().find(|m| !m.is_active) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Model {} is inactive",
            inactive.id
        ))));
    }
    Ok(models)
}

/// Spawn the fan-out and wait for its report.
async fn run_batch(
    state: &AppState,
    product: &Product,
    models: Vec<Model>,
) -> AppResult<FanOutReport> {
    let handle = spawn_fan_out(
        state.tryon.clone(),
        state.pool.clone(),
        state.progress.clone(),
        product.id,
        product.original_image_url.clone(),
        models,
    );
    handle
        .await
        .map_err(|e| AppError::InternalError(format!("Try-on batch task failed: {e}")))
}

async fn read_product_form(mut multipart: Multipart) -> AppResult<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" | "file" => form.image = Some(read_file(field, "product.png").await?),
            "name" => form.name = read_text(field).await?,
            "description" => form.description = read_text(field).await?,
            "category" => form.category = read_text(field).await?,
            "price" => {
                form.price = match read_text(field).await? {
                    Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                        AppError::Core(CoreError::Validation(format!(
                            "price must be a number, got '{raw}'"
                        )))
                    })?),
                    None => None,
                };
            }
            "model_ids" => {
                if let Some(raw) = read_text(field).await? {
                    form.model_ids.extend(parse_model_ids(&raw)?);
                }
            }
            _ => {} // ignore unknown fields
        }
    }
    Ok(form)
}
