use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vline_api::config::ServerConfig;
use vline_api::notifications::PartnerNotifier;
use vline_api::state::AppState;
use vline_api::{bootstrap, router};
use vline_tryon::{AccountPool, GradioTryOnClient, ProgressTracker, TryOnInvoker};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "vline_api=debug,vline_tryon=debug,vline_storage=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = vline_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    vline_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    vline_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // --- First-run setup ---
    bootstrap::ensure_admin(&pool, config.bootstrap_admin.as_ref())
        .await
        .expect("Failed to bootstrap admin account");
    if let Err(e) = bootstrap::prune_sessions(&pool).await {
        tracing::warn!(error = %e, "Session cleanup failed");
    }

    // --- Media storage ---
    let media = config
        .storage
        .build()
        .await
        .expect("Failed to initialise media storage");

    // --- Try-on ---
    let provider =
        GradioTryOnClient::new(&config.tryon).expect("Failed to build try-on HTTP client");
    let http = reqwest::Client::builder()
        .timeout(config.tryon.timeout)
        .build()
        .expect("Failed to build HTTP client");
    let accounts = AccountPool::new(config.tryon.api_keys.clone());
    tracing::info!(
        endpoint = %config.tryon.endpoint_url,
        accounts = accounts.len(),
        "Try-on provider configured"
    );
    let tryon = Arc::new(TryOnInvoker::new(
        http,
        Arc::new(provider),
        accounts,
        Arc::clone(&media),
    ));

    // --- Partner webhook ---
    let partner = Arc::new(
        PartnerNotifier::new(&config.webhook).expect("Failed to build webhook HTTP client"),
    );

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media,
        tryon,
        progress: ProgressTracker::new(),
        partner,
    };

    // --- Router ---
    let app = router::build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
