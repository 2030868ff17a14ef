//! Role-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vline_core::error::CoreError;
use vline_core::roles::ROLE_ADMIN;
use vline_db::repositories::ProfileRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an authenticated user whose profile role is `admin`.
///
/// The role is read from the stored profile on every request rather than
/// trusted from the token, so a demoted user loses access at once.
/// Rejects with 401 when unauthenticated and 403 for any other role.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let role = ProfileRepo::find_role(&state.pool, user.user_id).await?;
        if role.as_deref() != Some(ROLE_ADMIN) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
