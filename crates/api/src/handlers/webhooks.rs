//! Inbound webhook from the partner site.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vline_core::error::CoreError;
use vline_core::types::DbId;
use vline_db::models::processed_image::{ProcessedImage, UpsertManualMedia};
use vline_db::repositories::{ProcessedImageRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::webhook::WebhookSecret;
use crate::state::AppState;

/// Body of `POST /webhooks/manual-media`. Accepts snake_case and camelCase keys.
#[derive(Debug, Deserialize)]
pub struct ManualMediaPayload {
    #[serde(alias = "productId")]
    pub product_id: Option<DbId>,
    #[serde(alias = "manualImageUrl")]
    pub manual_image_url: Option<String>,
    #[serde(alias = "manualVideoUrl")]
    pub manual_video_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ManualMediaResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: ProcessedImage,
}

/// POST /api/v1/webhooks/manual-media
///
/// Record partner-supplied media for a product. Returns 201 when the manual
/// row was created and 200 when an existing one was updated.
pub async fn receive_manual_media(
    _secret: WebhookSecret,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ManualMediaPayload>,
) -> AppResult<(StatusCode, Json<ManualMediaResponse>)> {
    let product_id = payload
        .product_id
        .ok_or_else(|| AppError::BadRequest("product_id is required".into()))?;

    if ProductRepo::find_by_id(&state.pool, product_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: product_id,
        }));
    }

    let image_url = non_blank(payload.manual_image_url);
    let video_url = non_blank(payload.manual_video_url);
    if image_url.is_none() && video_url.is_none() {
        return Err(AppError::BadRequest(
            "At least one of manual_image_url or manual_video_url is required".into(),
        ));
    }

    let (row, created) = ProcessedImageRepo::upsert_manual(
        &state.pool,
        &UpsertManualMedia {
            product_id,
            image_url,
            video_url,
        },
    )
    .await?;
    tracing::info!(product_id, created, "Manual media received from partner");

    let (status, message) = if created {
        (StatusCode::CREATED, "Manual media created")
    } else {
        (StatusCode::OK, "Manual media updated")
    };
    Ok((
        status,
        Json(ManualMediaResponse {
            success: true,
            message,
            data: row,
        }),
    ))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
