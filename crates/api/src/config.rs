use vline_storage::StorageConfig;
use vline_tryon::TryOnConfig;

use crate::auth::jwt::JwtConfig;

/// Default body limit: 25 MiB, enough for full-resolution phone photos.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared-secret webhook settings for both directions.
#[derive(Debug, Clone, Default)]
pub struct WebhookConfig {
    /// Value expected in (and sent as) the `X-Webhook-Secret` header.
    pub secret: Option<String>,
    /// Partner endpoint notified when a product is created.
    pub partner_url: Option<String>,
}

/// Credentials of the admin account created on first start.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `900`, room for a full
    /// three-model fan-out).
    pub request_timeout_secs: u64,
    /// Largest accepted request body in bytes (default: 25 MiB). Bounds the
    /// multipart image uploads.
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
    pub webhook: WebhookConfig,
    pub storage: StorageConfig,
    pub tryon: TryOnConfig,
    pub bootstrap_admin: Option<AdminBootstrap>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `900`                      |
    /// | `MAX_UPLOAD_BYTES`     | `26214400` (25 MiB)        |
    /// | `WEBHOOK_SECRET`       | unset                      |
    /// | `PARTNER_WEBHOOK_URL`  | unset                      |
    /// | `ADMIN_EMAIL`          | unset                      |
    /// | `ADMIN_PASSWORD`       | unset                      |
    ///
    /// JWT, storage, and try-on settings are read by their own `from_env`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let webhook = WebhookConfig {
            secret: non_empty_var("WEBHOOK_SECRET"),
            partner_url: non_empty_var("PARTNER_WEBHOOK_URL"),
        };

        let bootstrap_admin = match (non_empty_var("ADMIN_EMAIL"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            jwt: JwtConfig::from_env(),
            webhook,
            storage: StorageConfig::from_env(),
            tryon: TryOnConfig::from_env(),
            bootstrap_admin,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
