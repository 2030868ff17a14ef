//! Admin handlers for the `/admin/models` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use vline_core::catalog::validate_name;
use vline_core::error::CoreError;
use vline_core::types::DbId;
use vline_db::models::model::{CreateModel, Model, UpdateModel};
use vline_db::repositories::ModelRepo;
use vline_storage::Bucket;

use super::form::{read_file, read_text, store_image};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/models?include_inactive=true
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<Model>>>> {
    let models = ModelRepo::list(&state.pool, !params.include_inactive).await?;
    Ok(Json(DataResponse { data: models }))
}

/// POST /api/v1/admin/models
///
/// Multipart form with `name`, optional `order_index`, and the `image` file.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Model>>)> {
    let mut name: Option<String> = None;
    let mut order_index: Option<i32> = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "image" | "file" => image = Some(read_file(field, "model.png").await?),
            "name" => name = read_text(field).await?,
            "order_index" => {
                order_index = match read_text(field).await? {
                    Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                        AppError::Core(CoreError::Validation(format!(
                            "order_index must be an integer, got '{raw}'"
                        )))
                    })?),
                    None => None,
                };
            }
            _ => {} // ignore unknown fields
        }
    }

    let name = name.unwrap_or_default();
    validate_name("name", &name)?;
    let image =
        image.ok_or_else(|| AppError::BadRequest("Missing required 'image' field".into()))?;

    let stored = store_image(&state, Bucket::Models, image).await?;
    let model = ModelRepo::create(
        &state.pool,
        &CreateModel {
            name,
            image_url: stored.url,
            order_index,
        },
    )
    .await?;
    tracing::info!(model_id = model.id, "Model created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: model })))
}

/// PATCH /api/v1/admin/models/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateModel>,
) -> AppResult<Json<DataResponse<Model>>> {
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    let model = ModelRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Model", id }))?;
    Ok(Json(DataResponse { data: model }))
}

/// DELETE /api/v1/admin/models/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ModelRepo::delete(&state.pool, id).await? {
        tracing::info!(model_id = id, "Model deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Model", id }))
    }
}
