//! First-run setup performed by the binary before it starts serving.

use vline_core::roles::ROLE_ADMIN;
use vline_db::models::profile::CreateProfile;
use vline_db::models::user::CreateUser;
use vline_db::repositories::{ProfileRepo, SessionRepo, UserRepo};
use vline_db::DbPool;

use crate::auth::password::{hash_password, MIN_PASSWORD_LENGTH};
use crate::config::AdminBootstrap;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("ADMIN_PASSWORD must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Create the configured admin account if no user with that email exists.
///
/// Returns `true` when an account was created. An existing user is left
/// untouched, including its password and role.
pub async fn ensure_admin(
    pool: &DbPool,
    admin: Option<&AdminBootstrap>,
) -> Result<bool, BootstrapError> {
    let Some(admin) = admin else {
        tracing::debug!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin bootstrap");
        return Ok(false);
    };

    if UserRepo::find_by_email(pool, &admin.email).await?.is_some() {
        tracing::debug!(email = %admin.email, "Admin account already exists");
        return Ok(false);
    }

    if admin.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(BootstrapError::WeakPassword);
    }

    let password_hash =
        hash_password(&admin.password).map_err(|e| BootstrapError::Hash(e.to_string()))?;
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: admin.email.clone(),
            password_hash,
        },
    )
    .await?;
    ProfileRepo::create(
        pool,
        &CreateProfile {
            user_id: user.id,
            role: ROLE_ADMIN.to_string(),
            display_name: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin account created");
    Ok(true)
}

/// Delete sessions that expired or were revoked. Returns the number removed.
pub async fn prune_sessions(pool: &DbPool) -> Result<u64, BootstrapError> {
    let removed = SessionRepo::cleanup_expired(pool).await?;
    if removed > 0 {
        tracing::info!(removed, "Pruned stale sessions");
    }
    Ok(removed)
}
