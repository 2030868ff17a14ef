//! Route definitions for the public `/catalog` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/catalog`. No authentication.
///
/// ```text
/// GET    /products                      -> list_products
/// GET    /products/{id}                 -> get_product
/// GET    /products/{id}/try-ons         -> list_try_ons
/// GET    /products/{id}/manual-media    -> get_manual_media
/// GET    /models                        -> list_models
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::list_products))
        .route("/products/{id}", get(catalog::get_product))
        .route("/products/{id}/try-ons", get(catalog::list_try_ons))
        .route("/products/{id}/manual-media", get(catalog::get_manual_media))
        .route("/models", get(catalog::list_models))
}
