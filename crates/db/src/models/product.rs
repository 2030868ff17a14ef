//! Product entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vline_core::types::{DbId, Timestamp};

/// A product row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub original_image_url: String,
    pub is_visible: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub original_image_url: String,
    /// Defaults to `true` if omitted.
    pub is_visible: Option<bool>,
}

/// DTO for updating an existing product. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub original_image_url: Option<String>,
    pub is_visible: Option<bool>,
}
