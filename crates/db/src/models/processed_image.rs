//! Try-on result model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vline_core::types::{DbId, Timestamp};

/// A row from the `processed_images` table.
///
/// `model_id` is `None` for media supplied manually by the partner site.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProcessedImage {
    pub id: DbId,
    pub product_id: DbId,
    pub model_id: Option<DbId>,
    pub processed_image_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A try-on result joined with the display fields of its model.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProcessedImageWithModel {
    pub id: DbId,
    pub product_id: DbId,
    pub model_id: Option<DbId>,
    pub processed_image_url: Option<String>,
    pub video_url: Option<String>,
    pub model_name: Option<String>,
    pub model_image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording the try-on result of one (product, model) pair.
#[derive(Debug, Clone)]
pub struct UpsertTryOnResult {
    pub product_id: DbId,
    pub model_id: DbId,
    pub processed_image_url: String,
}

/// DTO for recording manually supplied media for a product.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertManualMedia {
    pub product_id: DbId,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}
