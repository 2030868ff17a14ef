//! Product-created webhook to the partner site.
//!
//! [`PartnerNotifier`] POSTs the new product's fields as JSON with the shared
//! secret in the `X-Webhook-Secret` header. It makes one attempt; a failure is
//! logged and reported to the caller but never fails product creation.

use std::time::Duration;

use serde_json::json;
use vline_core::webhook::WEBHOOK_SECRET_HEADER;
use vline_db::models::product::Product;

use crate::config::WebhookConfig;

/// HTTP request timeout for the delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PartnerWebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The partner returned a non-2xx status code.
    #[error("Partner webhook returned HTTP {0}")]
    HttpStatus(u16),
}

/// What happened to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerDelivery {
    /// URL or secret not configured.
    Skipped,
    Delivered,
    Failed,
}

// ---------------------------------------------------------------------------
// PartnerNotifier
// ---------------------------------------------------------------------------

pub struct PartnerNotifier {
    client: reqwest::Client,
    url: Option<String>,
    secret: Option<String>,
}

impl PartnerNotifier {
    pub fn new(config: &WebhookConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: config.partner_url.clone(),
            secret: config.secret.clone(),
        })
    }

    /// Notify the partner that `product` was created.
    pub async fn notify_product_created(&self, product: &Product) -> PartnerDelivery {
        let (Some(url), Some(secret)) = (self.url.as_deref(), self.secret.as_deref()) else {
            tracing::debug!(product_id = product.id, "Partner webhook not configured, skipping");
            return PartnerDelivery::Skipped;
        };

        match self.send(url, secret, product).await {
            Ok(()) => {
                tracing::info!(product_id = product.id, "Partner notified of new product");
                PartnerDelivery::Delivered
            }
            Err(e) => {
                tracing::warn!(
                    product_id = product.id,
                    url,
                    error = %e,
                    "Partner webhook delivery failed"
                );
                PartnerDelivery::Failed
            }
        }
    }

    async fn send(&self, url: &str, secret: &str, product: &Product) -> Result<(), PartnerWebhookError> {
        let payload = json!({
            "id": product.id,
            "name": product.name,
            "description": product.description,
            "price": product.price,
            "category": product.category,
            "original_image_url": product.original_image_url,
            "is_visible": product.is_visible,
            "created_at": product.created_at,
        });

        let response = self
            .client
            .post(url)
            .header(WEBHOOK_SECRET_HEADER, secret)
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PartnerWebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Json;

    use super::*;

    fn product() -> Product {
        Product {
            id: 5,
            name: "Shirt A".to_string(),
            description: None,
            price: Some(150000.0),
            category: None,
            original_image_url: "http://media.test/products/a.png".to_string(),
            is_visible: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    /// Start a partner endpoint answering with `status` and recording calls.
    async fn partner(status: StatusCode) -> (String, Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = calls.clone();
        let app = axum::Router::new().route(
            "/hook",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let recorded = recorded.clone();
                async move {
                    let secret = headers
                        .get(WEBHOOK_SECRET_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    recorded.lock().unwrap().push((secret, body));
                    status
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/hook"), calls)
    }

    #[tokio::test]
    async fn missing_configuration_skips() {
        let notifier = PartnerNotifier::new(&WebhookConfig {
            secret: Some("s3cret".into()),
            partner_url: None,
        })
        .unwrap();
        assert_eq!(notifier.notify_product_created(&product()).await, PartnerDelivery::Skipped);
    }

    #[tokio::test]
    async fn delivers_product_with_secret_header() {
        let (url, calls) = partner(StatusCode::OK).await;
        let notifier = PartnerNotifier::new(&WebhookConfig {
            secret: Some("s3cret".into()),
            partner_url: Some(url),
        })
        .unwrap();

        assert_eq!(notifier.notify_product_created(&product()).await, PartnerDelivery::Delivered);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.as_deref(), Some("s3cret"));
        assert_eq!(calls[0].1["name"], "Shirt A");
        assert_eq!(calls[0].1["price"], 150000.0);
    }

    #[tokio::test]
    async fn partner_error_is_reported_not_retried() {
        let (url, calls) = partner(StatusCode::INTERNAL_SERVER_ERROR).await;
        let notifier = PartnerNotifier::new(&WebhookConfig {
            secret: Some("s3cret".into()),
            partner_url: Some(url),
        })
        .unwrap();

        assert_eq!(notifier.notify_product_created(&product()).await, PartnerDelivery::Failed);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}
