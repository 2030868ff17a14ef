//! Route definitions for inbound `/webhooks`.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`. Authenticated by the shared secret header.
pub fn router() -> Router<AppState> {
    Router::new().route("/manual-media", post(webhooks::receive_manual_media))
}
