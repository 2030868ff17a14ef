use std::sync::Arc;

use vline_storage::MediaStore;
use vline_tryon::{ProgressTracker, TryOnInvoker};

use crate::config::ServerConfig;
use crate::notifications::PartnerNotifier;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vline_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Object storage for product, model, and processed images.
    pub media: Arc<dyn MediaStore>,
    /// Try-on invoker, owner of the account rotation.
    pub tryon: Arc<TryOnInvoker>,
    /// Progress of running fan-out batches.
    pub progress: ProgressTracker,
    /// Outbound product-created webhook.
    pub partner: Arc<PartnerNotifier>,
}
