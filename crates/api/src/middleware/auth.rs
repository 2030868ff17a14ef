//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use vline_core::error::CoreError;
use vline_core::types::DbId;
use vline_db::repositories::SessionRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// The token must be valid and the session it was issued for must still be
/// live, so logging out or revoking sessions takes effect immediately.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub session_id: DbId,
    /// Role recorded in the token at login.
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        if !SessionRepo::is_active(&state.pool, claims.sid).await? {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Session has ended, please log in again".into(),
            )));
        }

        Ok(AuthUser {
            user_id: claims.sub,
            session_id: claims.sid,
            role: claims.role,
        })
    }
}
