//! Round-robin rotation over inference account tokens.

use std::sync::atomic::{AtomicUsize, Ordering};

/// A fixed set of account tokens handed out in turn.
///
/// Rotation state lives in the pool itself, so each invoker that owns a pool
/// rotates independently. An empty pool means calls run unauthenticated.
#[derive(Debug, Default)]
pub struct AccountPool {
    tokens: Vec<String>,
    cursor: AtomicUsize,
}

impl AccountPool {
    /// Build a pool, dropping blank tokens.
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Take the next account token, or `None` when no accounts are configured.
    pub fn next_token(&self) -> Option<&str> {
        if self.tokens.is_empty() {
            return None;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.tokens.len();
        Some(self.tokens[index].as_str())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_through_accounts_in_order() {
        let pool = AccountPool::new(["a".to_string(), "b".to_string(), "c".to_string()]);
        let taken: Vec<&str> = (0..7).filter_map(|_| pool.next_token()).collect();
        assert_eq!(taken, vec!["a", "b", "c", "a", "b", "c", "a"]);
    }

    #[test]
    fn empty_pool_yields_no_token() {
        let pool = AccountPool::new(Vec::<String>::new());
        assert!(pool.is_empty());
        assert_eq!(pool.next_token(), None);
    }

    #[test]
    fn blank_tokens_are_ignored() {
        let pool = AccountPool::new(["  ".to_string(), "hf_1".to_string()]);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.next_token(), Some("hf_1"));
        assert_eq!(pool.next_token(), Some("hf_1"));
    }

    #[test]
    fn concurrent_callers_share_the_cursor() {
        let pool = std::sync::Arc::new(AccountPool::new(["a".to_string(), "b".to_string()]));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = pool.clone();
                std::thread::spawn(move || {
                    (0..50).filter(|_| pool.next_token() == Some("a")).count()
                })
            })
            .collect();
        let a_count: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(a_count, 100);
    }
}
