//! Route definitions for the `/admin` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{media, models, processed_images, products, stats, tryon};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /stats                              -> stats::get_stats
/// POST   /media/{bucket}                     -> media::upload
///
/// GET    /products                           -> products::list
/// POST   /products                           -> products::create
/// GET    /products/{id}                      -> products::get_by_id
/// PATCH  /products/{id}                      -> products::update
/// DELETE /products/{id}                      -> products::delete
/// PUT    /products/{id}/visibility           -> products::set_visibility
/// POST   /products/{id}/try-ons              -> products::rerun_try_ons
/// GET    /products/{id}/try-ons/progress     -> products::progress
///
/// GET    /models                             -> models::list
/// POST   /models                             -> models::create
/// PATCH  /models/{id}                        -> models::update
/// DELETE /models/{id}                        -> models::delete
///
/// POST   /try-on                             -> tryon::invoke
/// GET    /processed-images                   -> processed_images::list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats::get_stats))
        .route("/media/{bucket}", post(media::upload))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get_by_id)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/products/{id}/visibility", put(products::set_visibility))
        .route("/products/{id}/try-ons", post(products::rerun_try_ons))
        .route("/products/{id}/try-ons/progress", get(products::progress))
        .route("/models", get(models::list).post(models::create))
        .route(
            "/models/{id}",
            axum::routing::patch(models::update).delete(models::delete),
        )
        .route("/try-on", post(tryon::invoke))
        .route("/processed-images", get(processed_images::list))
}
