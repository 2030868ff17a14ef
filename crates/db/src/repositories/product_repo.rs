//! Repository for the `products` table.

use sqlx::PgPool;
use vline_core::types::DbId;

use crate::models::product::{CreateProduct, Product, UpdateProduct};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, price, category, original_image_url, \
                       is_visible, created_at, updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product, returning the created row.
    ///
    /// If `is_visible` is `None` in the input, the product is visible.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (name, description, price, category, original_image_url, is_visible)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.category)
            .bind(&input.original_image_url)
            .bind(input.is_visible)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List products, most recently created first.
    ///
    /// With `visible_only`, hidden products are left out.
    pub async fn list(pool: &PgPool, visible_only: bool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE ($1 = FALSE OR is_visible)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(visible_only)
            .fetch_all(pool)
            .await
    }

    /// Update a product. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                category = COALESCE($5, category),
                original_image_url = COALESCE($6, original_image_url),
                is_visible = COALESCE($7, is_visible)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.category)
            .bind(&input.original_image_url)
            .bind(input.is_visible)
            .fetch_optional(pool)
            .await
    }

    /// Set the visibility flag to an explicit state.
    ///
    /// Setting the state a product already has leaves it unchanged, so the
    /// call can be repeated safely. Returns `None` if the product does not exist.
    pub async fn set_visibility(
        pool: &PgPool,
        id: DbId,
        is_visible: bool,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET is_visible = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(is_visible)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a product by ID. Returns `true` if a row was removed.
    ///
    /// Try-on results of the product are removed by the foreign key cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all products.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
