//! Fashion model entity and DTOs.
//!
//! A model is a person photo that garments are rendered onto during try-on.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vline_core::types::{DbId, Timestamp};

/// A row from the `models` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Model {
    pub id: DbId,
    pub name: String,
    pub image_url: String,
    pub order_index: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new model.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateModel {
    pub name: String,
    pub image_url: String,
    /// Defaults to 0 if omitted.
    pub order_index: Option<i32>,
}

/// DTO for updating an existing model. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateModel {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub order_index: Option<i32>,
    pub is_active: Option<bool>,
}
