//! HTTP-level integration tests for the inbound partner webhook.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, json_request, WEBHOOK_SECRET};
use sqlx::PgPool;
use vline_db::models::product::CreateProduct;
use vline_db::repositories::{ProcessedImageRepo, ProductRepo};

const URI: &str = "/api/v1/webhooks/manual-media";

async fn seed_product(pool: &PgPool) -> i64 {
    ProductRepo::create(
        pool,
        &CreateProduct {
            name: "Shirt A".to_string(),
            description: None,
            price: None,
            category: None,
            original_image_url: "http://media.test/products/a.png".to_string(),
            is_visible: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn call(
    app: axum::Router,
    secret: Option<&str>,
    body: serde_json::Value,
) -> axum::http::Response<axum::body::Body> {
    let headers: Vec<(&str, &str)> = secret
        .map(|s| vec![("X-Webhook-Secret", s)])
        .unwrap_or_default();
    json_request(app, Method::POST, URI, None, &headers, body).await
}

/// Missing or wrong secret is a 401 and nothing is written.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_secret_is_required(pool: PgPool) {
    let product_id = seed_product(&pool).await;
    let app = common::build_test_app(pool.clone()).await;
    let body = serde_json::json!({
        "product_id": product_id,
        "manual_image_url": "http://partner.test/a.jpg",
    });

    let response = call(app.router(), None, body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = call(app.router(), Some("wrong-secret"), body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(ProcessedImageRepo::find_manual_for_product(&pool, product_id)
        .await
        .unwrap()
        .is_none());
}

/// First call creates the manual row, the second updates it in place.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_created_then_updated(pool: PgPool) {
    let product_id = seed_product(&pool).await;
    let app = common::build_test_app(pool.clone()).await;

    let response = call(
        app.router(),
        Some(WEBHOOK_SECRET),
        serde_json::json!({
            "product_id": product_id,
            "manual_image_url": "http://partner.test/a.jpg",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Manual media created");
    assert!(json["data"]["model_id"].is_null());

    let response = call(
        app.router(),
        Some(WEBHOOK_SECRET),
        serde_json::json!({
            "productId": product_id,
            "manualVideoUrl": "http://partner.test/a.mp4",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Manual media updated");
    assert_eq!(json["data"]["processed_image_url"], "http://partner.test/a.jpg");
    assert_eq!(json["data"]["video_url"], "http://partner.test/a.mp4");

    assert_eq!(ProcessedImageRepo::count_for_product(&pool, product_id).await.unwrap(), 1);
}

/// Unknown product is a 404; missing product id or URLs are 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_payload_validation(pool: PgPool) {
    let product_id = seed_product(&pool).await;
    let app = common::build_test_app(pool).await;

    let response = call(
        app.router(),
        Some(WEBHOOK_SECRET),
        serde_json::json!({ "product_id": 999999, "manual_image_url": "http://partner.test/a.jpg" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = call(
        app.router(),
        Some(WEBHOOK_SECRET),
        serde_json::json!({ "manual_image_url": "http://partner.test/a.jpg" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = call(
        app.router(),
        Some(WEBHOOK_SECRET),
        serde_json::json!({ "product_id": product_id, "manual_image_url": "  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
