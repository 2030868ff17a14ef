//! Repository for the `profiles` table.

use sqlx::PgPool;
use vline_core::types::DbId;

use crate::models::profile::{CreateProfile, Profile};

const COLUMNS: &str = "id, user_id, role, display_name, created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a profile for a user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, role, display_name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(input.user_id)
            .bind(&input.role)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    /// Look up only the role of a user. `None` means the user has no profile.
    pub async fn find_role(pool: &PgPool, user_id: DbId) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT role FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(role,)| role))
    }
}
