//! User profile model. The profile role gates back-office access.

use serde::Serialize;
use sqlx::FromRow;
use vline_core::types::{DbId, Timestamp};

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub display_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a profile.
pub struct CreateProfile {
    pub user_id: DbId,
    pub role: String,
    pub display_name: Option<String>,
}
