//! Error envelope and status mapping at the HTTP level.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    admin_token, body_json, get, get_auth, json_request, raw_json_request, WEBHOOK_SECRET,
};
use sqlx::PgPool;

/// Missing entities produce the `{error, code}` envelope with 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn not_found_has_error_envelope(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = get(app.router(), "/api/v1/catalog/products/424242").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Product with id 424242 not found");
}

/// A malformed bearer token is a 401 with the envelope.
#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = get_auth(app.router(), "/api/v1/admin/stats", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

/// Updating a missing model is a 404, blank names are a validation error.
#[sqlx::test(migrations = "../../db/migrations")]
async fn model_update_errors(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;

    let response = json_request(
        app.router(),
        Method::PATCH,
        "/api/v1/admin/models/999999",
        Some(&token),
        &[],
        serde_json::json!({ "order_index": 4 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let model = app.seed_model(&pool, "m1", 0, b"p").await;
    let response = json_request(
        app.router(),
        Method::PATCH,
        &format!("/api/v1/admin/models/{}", model.id),
        Some(&token),
        &[],
        serde_json::json!({ "name": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

/// Unparseable JSON bodies get the envelope too, not axum's plain-text
/// rejection.
#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_has_error_envelope(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let token = admin_token(&app, &pool).await;

    let response = raw_json_request(
        app.router(),
        Method::POST,
        "/api/v1/webhooks/manual-media",
        None,
        &[("x-webhook-secret", WEBHOOK_SECRET)],
        "{\"product_id\": ",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().starts_with("Invalid request body"));

    let response = raw_json_request(
        app.router(),
        Method::PUT,
        "/api/v1/admin/products/1/visibility",
        Some(&token),
        &[],
        r#"{"is_visible": "yes"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = raw_json_request(
        app.router(),
        Method::PATCH,
        "/api/v1/admin/products/1",
        Some(&token),
        &[],
        "not json",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
