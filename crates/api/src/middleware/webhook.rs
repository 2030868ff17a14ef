//! Shared-secret check for inbound webhooks.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vline_core::error::CoreError;
use vline_core::webhook::{verify_shared_secret, WEBHOOK_SECRET_HEADER};

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the configured webhook secret.
///
/// Put it first in a handler's arguments so a bad secret is rejected before
/// the body is read. With no secret configured every call is rejected.
pub struct WebhookSecret;

impl FromRequestParts<AppState> for WebhookSecret {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());

        if !verify_shared_secret(state.config.webhook.secret.as_deref(), provided) {
            tracing::warn!(
                header_present = provided.is_some(),
                "Rejected webhook call with a missing or wrong secret"
            );
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid webhook secret".into(),
            )));
        }
        Ok(WebhookSecret)
    }
}
