#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use vline_api::auth::jwt::JwtConfig;
use vline_api::auth::password::hash_password;
use vline_api::config::{ServerConfig, WebhookConfig, DEFAULT_MAX_UPLOAD_BYTES};
use vline_api::notifications::PartnerNotifier;
use vline_api::router::build_app_router;
use vline_api::state::AppState;
use vline_core::roles::{ROLE_ADMIN, ROLE_USER};
use vline_core::tryon::GenerationParams;
use vline_db::models::model::{CreateModel, Model};
use vline_db::models::profile::CreateProfile;
use vline_db::models::user::{CreateUser, User};
use vline_db::repositories::{ModelRepo, ProfileRepo, UserRepo};
use vline_storage::{
    Bucket, LocalMediaStore, MediaStore, StorageConfig, StorageError, StorageResult, StoredObject,
};
use vline_tryon::{
    AccountPool, ImageInput, ProgressTracker, ProviderError, TryOnConfig, TryOnInvoker,
    TryOnProvider,
};

pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Model image bytes the fake provider refuses to process.
pub const FAILING_PERSON: &[u8] = b"FAIL";

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Returns a fixed result image served by the test media server.
struct FakeProvider {
    result_url: String,
}

#[async_trait]
impl TryOnProvider for FakeProvider {
    async fn generate(
        &self,
        _garment: ImageInput,
        person: ImageInput,
        _params: &GenerationParams,
        _token: Option<&str>,
    ) -> Result<String, ProviderError> {
        if person.bytes == FAILING_PERSON {
            return Err(ProviderError::Inference("GPU quota exceeded".into()));
        }
        Ok(self.result_url.clone())
    }
}

/// The router plus the media server that backs the local store.
pub struct TestApp {
    pub router: Router,
    /// Base URL of the in-process media server.
    pub media_url: String,
    media_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn media_root(&self) -> &Path {
        self.media_dir.path()
    }

    /// Write `bytes` under the media root and return the served URL.
    pub fn serve_file(&self, relative: &str, bytes: &[u8]) -> String {
        let path = self.media_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, bytes).unwrap();
        format!("{}/{relative}", self.media_url)
    }

    /// Insert a model whose photo holds `bytes`.
    pub async fn seed_model(&self, pool: &PgPool, name: &str, order: i32, bytes: &[u8]) -> Model {
        let image_url = self.serve_file(&format!("models/{name}.png"), bytes);
        ModelRepo::create(
            pool,
            &CreateModel {
                name: name.to_string(),
                image_url,
                order_index: Some(order),
            },
        )
        .await
        .expect("model creation should succeed")
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(media_dir: &Path, media_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        jwt: JwtConfig {
            secret: "test-jwt-secret-that-is-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        webhook: WebhookConfig {
            secret: Some(WEBHOOK_SECRET.to_string()),
            partner_url: None,
        },
        storage: StorageConfig::Local {
            dir: media_dir.to_string_lossy().into_owned(),
            public_base_url: media_url.to_string(),
        },
        tryon: TryOnConfig {
            endpoint_url: "http://tryon.invalid".to_string(),
            api_prefix: "/gradio_api".to_string(),
            api_keys: vec!["hf_test_token".to_string()],
            timeout: Duration::from_secs(10),
        },
        bootstrap_admin: None,
    }
}

/// Serve `dir` over HTTP on an ephemeral port, returning the base URL.
async fn serve_dir(dir: &Path) -> String {
    let app = Router::new().fallback_service(ServeDir::new(dir));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Build the full application router, using the production middleware stack,
/// against a fake try-on provider and a temp-dir media store.
pub async fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, |_| {}, None).await
}

/// Like [`build_test_app`], with a config override and an optional media
/// store replacing the local one.
pub async fn build_test_app_with(
    pool: PgPool,
    configure: impl FnOnce(&mut ServerConfig),
    media_override: Option<Arc<dyn MediaStore>>,
) -> TestApp {
    let media_dir = tempfile::tempdir().unwrap();
    let media_url = serve_dir(media_dir.path()).await;
    let mut config = test_config(media_dir.path(), &media_url);
    configure(&mut config);

    let store: Arc<dyn MediaStore> = match media_override {
        Some(store) => store,
        None => Arc::new(
            LocalMediaStore::new(media_dir.path(), media_url.clone())
                .await
                .unwrap(),
        ),
    };

    std::fs::write(media_dir.path().join("fixture-result.png"), b"generated").unwrap();
    let provider = Arc::new(FakeProvider {
        result_url: format!("{media_url}/fixture-result.png"),
    });
    let tryon = Arc::new(TryOnInvoker::new(
        reqwest::Client::new(),
        provider,
        AccountPool::new(config.tryon.api_keys.clone()),
        store.clone(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media: store,
        tryon,
        progress: ProgressTracker::new(),
        partner: Arc::new(PartnerNotifier::new(&config.webhook).unwrap()),
    };

    TestApp {
        router: build_app_router(state, &config),
        media_url,
        media_dir,
    }
}

/// Media store whose backend refuses every upload.
pub struct RejectingMediaStore;

#[async_trait]
impl MediaStore for RejectingMediaStore {
    async fn upload(
        &self,
        _bucket: Bucket,
        _original_name: &str,
        _content_type: &str,
        _data: Vec<u8>,
    ) -> StorageResult<StoredObject> {
        Err(StorageError::UploadFailed("bucket quota exceeded".into()))
    }

    fn public_url(&self, bucket: Bucket, key: &str) -> String {
        format!("http://media.invalid/{bucket}/{key}")
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Create a user with a profile of the given role.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        },
    )
    .await
    .expect("user creation should succeed");
    ProfileRepo::create(
        pool,
        &CreateProfile {
            user_id: user.id,
            role: role.to_string(),
            display_name: None,
        },
    )
    .await
    .expect("profile creation should succeed");
    user
}

pub async fn create_admin(pool: &PgPool) -> User {
    create_user(pool, "admin@vline.test", ROLE_ADMIN).await
}

pub async fn create_shopper(pool: &PgPool) -> User {
    create_user(pool, "shopper@vline.test", ROLE_USER).await
}

/// Log in through the API and return the access token.
pub async fn login(app: Router, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"]
        .as_str()
        .expect("login must return an access token")
        .to_string()
}

/// Create the admin account and return its access token.
pub async fn admin_token(app: &TestApp, pool: &PgPool) -> String {
    let admin = create_admin(pool).await;
    login(app.router(), &admin.email).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, None, &[], body).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::POST, uri, Some(token), &[], body).await
}

pub async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    headers: &[(&str, &str)],
    body: serde_json::Value,
) -> Response<Body> {
    let body = serde_json::to_vec(&body).unwrap();
    raw_json_request(app, method, uri, token, headers, body).await
}

/// Send `body` as-is with a JSON content type, valid or not.
pub async fn raw_json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    headers: &[(&str, &str)],
    body: impl Into<Body>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(body.into()).unwrap()).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// One part of a multipart form.
pub enum FormPart<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        bytes: &'a [u8],
    },
}

const BOUNDARY: &str = "vline-test-boundary";

/// POST a multipart form with a bearer token.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    token: &str,
    parts: &[FormPart<'_>],
) -> Response<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            FormPart::File {
                name,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
