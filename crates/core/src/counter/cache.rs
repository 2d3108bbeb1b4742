//! Volatile view-count tier.
//!
//! Entries are advisory: a missing entry means "not cached", never "zero".
//! Implementations may drop entries at any time.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::config::AppConfig;
use crate::store::ArticleId;

/// Errors from the volatile tier.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// The cache cannot be reached. Callers fall back to the durable store.
    #[error("view cache unavailable: {0}")]
    Unavailable(String),
}

/// In-flight view counts keyed by article id.
#[async_trait]
pub trait ViewCache: Send + Sync {
    async fn get(&self, id: ArticleId) -> Result<Option<u64>, CacheError>;

    async fn set(&self, id: ArticleId, count: u64) -> Result<(), CacheError>;

    async fn evict(&self, id: ArticleId) -> Result<(), CacheError>;
}

/// Bounded in-process view cache.
///
/// Backed by moka's concurrent cache: capacity-bounded with TinyLFU
/// admission, optional time-to-idle expiry.
#[derive(Clone, Debug)]
pub struct MokaViewCache {
    entries: Cache<ArticleId, u64>,
}

impl MokaViewCache {
    pub fn new(max_entries: u64, idle: Option<Duration>) -> Self {
        let mut builder = Cache::builder().max_capacity(max_entries);
        if let Some(idle) = idle {
            builder = builder.time_to_idle(idle);
        }
        Self { entries: builder.build() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.cache_max_entries, config.cache_idle())
    }

    /// Number of live entries, after applying pending evictions.
    #[cfg(test)]
    async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

#[async_trait]
impl ViewCache for MokaViewCache {
    async fn get(&self, id: ArticleId) -> Result<Option<u64>, CacheError> {
        Ok(self.entries.get(&id).await)
    }

    async fn set(&self, id: ArticleId, count: u64) -> Result<(), CacheError> {
        self.entries.insert(id, count).await;
        Ok(())
    }

    async fn evict(&self, id: ArticleId) -> Result<(), CacheError> {
        self.entries.invalidate(&id).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_evict() {
        let cache = MokaViewCache::new(16, None);
        assert_eq!(cache.get(1).await.unwrap(), None);

        cache.set(1, 7).await.unwrap();
        assert_eq!(cache.get(1).await.unwrap(), Some(7));

        cache.set(1, 8).await.unwrap();
        assert_eq!(cache.get(1).await.unwrap(), Some(8));

        cache.evict(1).await.unwrap();
        assert_eq!(cache.get(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_is_a_real_entry() {
        let cache = MokaViewCache::new(16, None);
        cache.set(3, 0).await.unwrap();
        assert_eq!(cache.get(3).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_capacity_bound() {
        let cache = MokaViewCache::new(10, None);
        for id in 0..200 {
            cache.set(id, 1).await.unwrap();
        }
        assert!(cache.entry_count().await <= 10);
    }

    #[tokio::test]
    async fn test_idle_entries_expire() {
        let cache = MokaViewCache::new(16, Some(Duration::from_millis(50)));
        cache.set(1, 5).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(cache.get(1).await.unwrap(), None);
    }
}
