//! Shared progress of running fan-out batches, keyed by product.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use vline_core::types::DbId;

/// Progress of the latest batch for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FanOutProgress {
    /// Attempts made so far, successful or not.
    pub current: usize,
    pub total: usize,
    pub finished: bool,
}

/// Cloneable handle to the progress table.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    inner: Arc<RwLock<HashMap<DbId, FanOutProgress>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the entry for a product at the start of a batch.
    pub async fn start(&self, product_id: DbId, total: usize) {
        self.inner.write().await.insert(
            product_id,
            FanOutProgress {
                current: 0,
                total,
                finished: total == 0,
            },
        );
    }

    /// Record one more finished attempt.
    pub async fn advance(&self, product_id: DbId) {
        if let Some(entry) = self.inner.write().await.get_mut(&product_id) {
            entry.current = (entry.current + 1).min(entry.total);
        }
    }

    /// Mark the batch for a product as done.
    pub async fn finish(&self, product_id: DbId) {
        if let Some(entry) = self.inner.write().await.get_mut(&product_id) {
            entry.finished = true;
        }
    }

    pub async fn get(&self, product_id: DbId) -> Option<FanOutProgress> {
        self.inner.read().await.get(&product_id).copied()
    }

    /// Drop the entry for a product that no longer exists.
    pub async fn remove(&self, product_id: DbId) -> Option<FanOutProgress> {
        self.inner.write().await.remove(&product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracks_a_batch_through_completion() {
        let tracker = ProgressTracker::new();
        assert_eq!(tracker.get(7).await, None);

        tracker.start(7, 2).await;
        tracker.advance(7).await;
        assert_eq!(
            tracker.get(7).await,
            Some(FanOutProgress { current: 1, total: 2, finished: false })
        );

        tracker.advance(7).await;
        tracker.advance(7).await;
        tracker.finish(7).await;
        assert_eq!(
            tracker.get(7).await,
            Some(FanOutProgress { current: 2, total: 2, finished: true })
        );
    }

    #[tokio::test]
    async fn remove_forgets_the_product() {
        let tracker = ProgressTracker::new();
        tracker.start(4, 1).await;
        tracker.advance(4).await;
        tracker.finish(4).await;

        assert!(tracker.remove(4).await.is_some());
        assert_eq!(tracker.get(4).await, None);
        assert_eq!(tracker.remove(4).await, None);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let tracker = ProgressTracker::new();
        let other = tracker.clone();
        tracker.start(1, 3).await;
        other.advance(1).await;
        assert_eq!(tracker.get(1).await.map(|p| p.current), Some(1));
    }
}
