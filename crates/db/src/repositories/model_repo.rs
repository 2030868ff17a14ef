//! Repository for the `models` table.

use sqlx::PgPool;
use vline_core::types::DbId;

use crate::models::model::{CreateModel, Model, UpdateModel};

const COLUMNS: &str = "id, name, image_url, order_index, is_active, created_at, updated_at";

/// Provides CRUD operations for fashion models.
pub struct ModelRepo;

impl ModelRepo {
    /// Insert a new model. `order_index` defaults to 0.
    pub async fn create(pool: &PgPool, input: &CreateModel) -> Result<Model, sqlx::Error> {
        let query = format!(
            "INSERT INTO models (name, image_url, order_index)
             VALUES ($1, $2, COALESCE($3, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(&input.name)
            .bind(&input.image_url)
            .bind(input.order_index)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Model>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM models WHERE id = $1");
        sqlx::query_as::<_, Model>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several models, returned in the same order as `ids`.
    ///
    /// Ids with no matching row are skipped; callers compare lengths to
    /// detect unknown ids.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Model>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM models
             WHERE id = ANY($1)
             ORDER BY array_position($1, id)"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List models by display order. With `active_only`, inactive models are left out.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Model>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM models
             WHERE ($1 = FALSE OR is_active)
             ORDER BY order_index ASC, id ASC"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Update a model. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateModel,
    ) -> Result<Option<Model>, sqlx::Error> {
        let query = format!(
            "UPDATE models SET
                name = COALESCE($2, name),
                image_url = COALESCE($3, image_url),
                order_index = COALESCE($4, order_index),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Model>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.image_url)
            .bind(input.order_index)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a model. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM models WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM models")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
