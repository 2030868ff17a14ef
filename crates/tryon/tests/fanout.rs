//! Fan-out and single-pair try-on against a fake provider.
//!
//! Source and result images are served over HTTP from a temp directory by an
//! in-process Axum server; results are stored with the local media backend.

use std::path::Path;
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;
use sqlx::PgPool;
use tower_http::services::ServeDir;
use vline_core::tryon::GenerationParams;
use vline_db::models::model::{CreateModel, Model};
use vline_db::models::product::CreateProduct;
use vline_db::repositories::{ModelRepo, ProcessedImageRepo, ProductRepo};
use vline_storage::LocalMediaStore;
use vline_tryon::{
    run_fan_out, spawn_fan_out, AccountPool, FanOutProgress, ImageInput, PairOutcome,
    ProgressTracker, ProviderError, TryOnError, TryOnInvoker, TryOnProvider, TryOnRequest,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bytes of a model image the fake provider refuses to process.
const FAILING_PERSON: &[u8] = b"person-that-fails";

/// Returns a fixed result URL and records the token of every call.
struct FakeProvider {
    result_url: String,
    tokens: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl TryOnProvider for FakeProvider {
    async fn generate(
        &self,
        garment: ImageInput,
        person: ImageInput,
        params: &GenerationParams,
        token: Option<&str>,
    ) -> Result<String, ProviderError> {
        assert_eq!(params, &GenerationParams::default());
        assert!(!garment.bytes.is_empty());
        self.tokens.lock().unwrap().push(token.map(str::to_string));

        if person.bytes == FAILING_PERSON {
            return Err(ProviderError::Inference("model is busy".to_string()));
        }
        Ok(self.result_url.clone())
    }
}

struct Harness {
    base_url: String,
    provider: Arc<FakeProvider>,
    invoker: TryOnInvoker,
    _served: tempfile::TempDir,
    stored: tempfile::TempDir,
}

/// Serve `dir` over HTTP on an ephemeral port, returning the base URL.
async fn serve_dir(dir: &Path) -> String {
    let app = axum::Router::new().fallback_service(ServeDir::new(dir));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn harness(tokens: &[&str]) -> Harness {
    let served = tempfile::tempdir().unwrap();
    std::fs::write(served.path().join("shirt.png"), b"garment-bytes").unwrap();
    std::fs::write(served.path().join("m1.png"), b"person-one").unwrap();
    std::fs::write(served.path().join("m2.png"), FAILING_PERSON).unwrap();
    std::fs::write(served.path().join("m3.png"), b"person-three").unwrap();
    std::fs::write(served.path().join("result.png"), b"generated-bytes").unwrap();
    let base_url = serve_dir(served.path()).await;

    let stored = tempfile::tempdir().unwrap();
    let store = LocalMediaStore::new(stored.path(), "http://media.test/media".to_string())
        .await
        .unwrap();

    let provider = Arc::new(FakeProvider {
        result_url: format!("{base_url}/result.png"),
        tokens: Mutex::new(Vec::new()),
    });
    let invoker = TryOnInvoker::new(
        reqwest::Client::new(),
        provider.clone(),
        AccountPool::new(tokens.iter().map(|t| t.to_string())),
        Arc::new(store),
    );

    Harness {
        base_url,
        provider,
        invoker,
        _served: served,
        stored,
    }
}

async fn seed_product(pool: &PgPool, base_url: &str) -> i64 {
    ProductRepo::create(
        pool,
        &CreateProduct {
            name: "Shirt A".to_string(),
            description: None,
            price: Some(150000.0),
            category: None,
            original_image_url: format!("{base_url}/shirt.png"),
            is_visible: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_model(pool: &PgPool, base_url: &str, file: &str) -> Model {
    ModelRepo::create(
        pool,
        &CreateModel {
            name: file.trim_end_matches(".png").to_uppercase(),
            image_url: format!("{base_url}/{file}"),
            order_index: None,
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_single_model_produces_one_result(pool: PgPool) {
    let h = harness(&["hf_1"]).await;
    let product_id = seed_product(&pool, &h.base_url).await;
    let m1 = seed_model(&pool, &h.base_url, "m1.png").await;

    let tracker = ProgressTracker::new();
    let report = run_fan_out(
        &h.invoker,
        &pool,
        &tracker,
        product_id,
        &format!("{}/shirt.png", h.base_url),
        &[m1.clone()],
    )
    .await;

    assert_eq!(report.total, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 0);

    let row = ProcessedImageRepo::find_for_pair(&pool, product_id, m1.id)
        .await
        .unwrap()
        .expect("result row");
    let url = row.processed_image_url.unwrap();
    assert!(url.starts_with("http://media.test/media/processed/"));
    assert!(url.ends_with(".png"));

    let key = url.rsplit('/').next().unwrap();
    let stored = std::fs::read(h.stored.path().join("processed").join(key)).unwrap();
    assert_eq!(stored, b"generated-bytes");

    assert_eq!(
        tracker.get(product_id).await,
        Some(FanOutProgress { current: 1, total: 1, finished: true })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_model_does_not_stop_the_batch(pool: PgPool) {
    let h = harness(&["hf_1", "hf_2"]).await;
    let product_id = seed_product(&pool, &h.base_url).await;
    let m1 = seed_model(&pool, &h.base_url, "m1.png").await;
    let m2 = seed_model(&pool, &h.base_url, "m2.png").await;
    let m3 = seed_model(&pool, &h.base_url, "m3.png").await;

    let tracker = ProgressTracker::new();
    let report = run_fan_out(
        &h.invoker,
        &pool,
        &tracker,
        product_id,
        &format!("{}/shirt.png", h.base_url),
        &[m1.clone(), m2.clone(), m3.clone()],
    )
    .await;

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert_matches!(&report.outcomes[0], PairOutcome::Succeeded { model_id, .. } if *model_id == m1.id);
    assert_matches!(&report.outcomes[1], PairOutcome::Failed { model_id, error } if *model_id == m2.id && error.contains("model is busy"));
    assert_matches!(&report.outcomes[2], PairOutcome::Succeeded { model_id, .. } if *model_id == m3.id);

    assert_eq!(
        ProcessedImageRepo::count_for_product(&pool, product_id)
            .await
            .unwrap(),
        2
    );

    // Accounts rotate across calls, failed ones included.
    let tokens = h.provider.tokens.lock().unwrap().clone();
    assert_eq!(
        tokens,
        vec![
            Some("hf_1".to_string()),
            Some("hf_2".to_string()),
            Some("hf_1".to_string())
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_spawned_batch_reports_back(pool: PgPool) {
    let h = harness(&[]).await;
    let product_id = seed_product(&pool, &h.base_url).await;
    let m1 = seed_model(&pool, &h.base_url, "m1.png").await;

    let tracker = ProgressTracker::new();
    let Harness { base_url, invoker, provider, _served, stored } = h;
    let report = spawn_fan_out(
        Arc::new(invoker),
        pool.clone(),
        tracker.clone(),
        product_id,
        format!("{base_url}/shirt.png"),
        vec![m1],
    )
    .await
    .unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(tracker.get(product_id).await.map(|p| p.finished), Some(true));
    // No tokens configured: the call runs unauthenticated.
    assert_eq!(*provider.tokens.lock().unwrap(), vec![None]);
    drop(stored);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_source_image_writes_nothing(pool: PgPool) {
    let h = harness(&["hf_1"]).await;
    let product_id = seed_product(&pool, &h.base_url).await;
    let m1 = seed_model(&pool, &h.base_url, "m1.png").await;

    let result = h
        .invoker
        .invoke(
            &pool,
            &TryOnRequest {
                product_id,
                product_image_url: format!("{}/missing.png", h.base_url),
                model_id: m1.id,
                model_image_url: m1.image_url.clone(),
            },
        )
        .await;

    assert_matches!(result, Err(TryOnError::Fetch { what: "product", .. }));
    assert!(h.provider.tokens.lock().unwrap().is_empty());
    assert_eq!(ProcessedImageRepo::count(&pool).await.unwrap(), 0);
}
