//! Repository for the `processed_images` table (try-on results and
//! manually supplied media).

use sqlx::{FromRow, PgPool};
use vline_core::types::DbId;

use crate::models::processed_image::{
    ProcessedImage, ProcessedImageWithModel, UpsertManualMedia, UpsertTryOnResult,
};

const COLUMNS: &str = "id, product_id, model_id, processed_image_url, video_url, \
                       created_at, updated_at";

/// Result of an upsert that also reports whether a new row was inserted.
#[derive(Debug, FromRow)]
struct UpsertedRow {
    #[sqlx(flatten)]
    image: ProcessedImage,
    inserted: bool,
}

/// Provides upsert and query operations for processed images.
pub struct ProcessedImageRepo;

impl ProcessedImageRepo {
    /// Record the try-on result for a (product, model) pair.
    ///
    /// A second result for the same pair replaces the first in place, so
    /// there is never more than one row per pair.
    pub async fn upsert_for_pair(
        pool: &PgPool,
        input: &UpsertTryOnResult,
    ) -> Result<ProcessedImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO processed_images (product_id, model_id, processed_image_url)
             VALUES ($1, $2, $3)
             ON CONFLICT (product_id, model_id) DO UPDATE
                SET processed_image_url = EXCLUDED.processed_image_url
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProcessedImage>(&query)
            .bind(input.product_id)
            .bind(input.model_id)
            .bind(&input.processed_image_url)
            .fetch_one(pool)
            .await
    }

    /// Record manually supplied media for a product (row with a NULL model).
    ///
    /// URLs left as `None` keep their stored value on update. Returns the row
    /// and `true` when it was newly created.
    pub async fn upsert_manual(
        pool: &PgPool,
        input: &UpsertManualMedia,
    ) -> Result<(ProcessedImage, bool), sqlx::Error> {
        let query = format!(
            "INSERT INTO processed_images (product_id, model_id, processed_image_url, video_url)
             VALUES ($1, NULL, $2, $3)
             ON CONFLICT (product_id, model_id) DO UPDATE SET
                processed_image_url = COALESCE(EXCLUDED.processed_image_url, processed_images.processed_image_url),
                video_url = COALESCE(EXCLUDED.video_url, processed_images.video_url)
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        let row = sqlx::query_as::<_, UpsertedRow>(&query)
            .bind(input.product_id)
            .bind(&input.image_url)
            .bind(&input.video_url)
            .fetch_one(pool)
            .await?;
        Ok((row.image, row.inserted))
    }

    /// Find the manually supplied media row for a product, if any.
    pub async fn find_manual_for_product(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Option<ProcessedImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM processed_images
             WHERE product_id = $1 AND model_id IS NULL"
        );
        sqlx::query_as::<_, ProcessedImage>(&query)
            .bind(product_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the try-on result for one (product, model) pair.
    pub async fn find_for_pair(
        pool: &PgPool,
        product_id: DbId,
        model_id: DbId,
    ) -> Result<Option<ProcessedImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM processed_images
             WHERE product_id = $1 AND model_id = $2"
        );
        sqlx::query_as::<_, ProcessedImage>(&query)
            .bind(product_id)
            .bind(model_id)
            .fetch_optional(pool)
            .await
    }

    /// List the model try-on results of a product with the model display
    /// fields, in model display order. Manual rows are excluded.
    pub async fn list_for_product_with_model(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Vec<ProcessedImageWithModel>, sqlx::Error> {
        sqlx::query_as::<_, ProcessedImageWithModel>(
            "SELECT p.id, p.product_id, p.model_id, p.processed_image_url, p.video_url,
                    m.name AS model_name, m.image_url AS model_image_url,
                    p.created_at, p.updated_at
             FROM processed_images p
             LEFT JOIN models m ON m.id = p.model_id
             WHERE p.product_id = $1 AND p.model_id IS NOT NULL
             ORDER BY m.order_index ASC, m.id ASC",
        )
        .bind(product_id)
        .fetch_all(pool)
        .await
    }

    /// List every processed image, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ProcessedImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM processed_images ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ProcessedImage>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM processed_images")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn count_for_product(pool: &PgPool, product_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM processed_images WHERE product_id = $1")
                .bind(product_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
