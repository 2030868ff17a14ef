pub mod admin;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                   login (public)
/// /auth/refresh                                 refresh (public)
/// /auth/logout                                  logout (requires auth)
/// /auth/me                                      current user (requires auth)
///
/// /catalog/products                             visible products (public)
/// /catalog/products/{id}                        product page with try-ons
/// /catalog/products/{id}/try-ons                try-on results
/// /catalog/products/{id}/manual-media           partner media or null
/// /catalog/models                               active models
///
/// /webhooks/manual-media                        partner media (X-Webhook-Secret)
///
/// /admin/stats                                  catalog counters
/// /admin/media/{bucket}                         raw upload
/// /admin/products                               list, create + fan-out
/// /admin/products/{id}                          get, update, delete
/// /admin/products/{id}/visibility               show / hide (PUT)
/// /admin/products/{id}/try-ons                  re-run fan-out (POST)
/// /admin/products/{id}/try-ons/progress         fan-out progress
/// /admin/models                                 list, create
/// /admin/models/{id}                            update, delete
/// /admin/try-on                                 single pair (POST)
/// /admin/processed-images                       all try-on rows
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/catalog", catalog::router())
        .nest("/webhooks", webhooks::router())
        .nest("/admin", admin::router())
}
