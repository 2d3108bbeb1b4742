//! Two-tier view-count coordination.
//!
//! Every operation holds the article's [`KeyLease`](super::KeyLease) from its
//! first read to its last write, and runs as a detached task so that a caller
//! walking away mid-call cannot leave the tiers half-updated.

use std::future::Future;
use std::num::NonZeroU64;
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::cache::ViewCache;
use super::locks::KeyedLocks;
use crate::Error;
use crate::articles::ArticleDraft;
use crate::store::{Article, ArticleId, ArticleStore, MAX_VIEW_COUNT};

/// Outcome of consulting the volatile tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Hit(u64),
    Miss,
    /// No usable cache: disabled, or unreachable for this call.
    Bypass,
}

/// Reconciles the volatile view cache with the durable article store.
///
/// Cloning is cheap; clones share the cache, store and lock table.
#[derive(Clone)]
pub struct ViewCoordinator {
    store: Arc<dyn ArticleStore>,
    cache: Option<Arc<dyn ViewCache>>,
    locks: Arc<KeyedLocks>,
    threshold: NonZeroU64,
}

impl ViewCoordinator {
    /// Build a coordinator. `cache = None` runs write-through on the store.
    pub fn new(store: Arc<dyn ArticleStore>, cache: Option<Arc<dyn ViewCache>>, threshold: NonZeroU64) -> Self {
        Self { store, cache, locks: Arc::new(KeyedLocks::new()), threshold }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Current view count. A cache miss is filled from the store.
    pub async fn get_views(&self, id: ArticleId) -> Result<u64, Error> {
        self.detached(move |this| async move {
            let _lease = this.locks.lock(id).await;
            this.get_locked(id).await
        })
        .await
    }

    /// Count one view and return the new total.
    ///
    /// The store is written when the total is a multiple of the threshold,
    /// or on every call while the cache is unusable. A write that skipped
    /// the cache also evicts the id, so an older cached count never
    /// shadows it once the cache is back.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown ids; `PersistFailure` when a due flush fails.
    /// The cache keeps the new count in the latter case.
    pub async fn increment_views(&self, id: ArticleId) -> Result<u64, Error> {
        self.detached(move |this| async move {
            let _lease = this.locks.lock(id).await;
            this.increment_locked(id).await
        })
        .await
    }

    /// Count a fetch of the article as a view and return the post-increment count.
    pub async fn reconcile_on_read(&self, id: ArticleId) -> Result<u64, Error> {
        self.increment_views(id).await
    }

    /// Zero the durable count, then drop the cached one.
    pub async fn reset_views(&self, id: ArticleId) -> Result<(), Error> {
        self.detached(move |this| async move {
            let _lease = this.locks.lock(id).await;
            this.reset_locked(id).await
        })
        .await
    }

    /// Replace an article's title and content without touching its views.
    ///
    /// A cached count newer than the durable one is written along with the
    /// content, so reading right after the update shows no regression.
    pub async fn update_preserving_views(&self, id: ArticleId, draft: ArticleDraft) -> Result<Article, Error> {
        self.detached(move |this| async move {
            let _lease = this.locks.lock(id).await;
            this.update_locked(id, draft).await
        })
        .await
    }

    /// Delete the durable record and its cached count as one operation.
    pub async fn forget(&self, id: ArticleId) -> Result<(), Error> {
        self.detached(move |this| async move {
            let _lease = this.locks.lock(id).await;
            this.forget_locked(id).await
        })
        .await
    }

    /// Cached count without populating the cache or taking the lock.
    ///
    /// Advisory only: `None` says nothing about the durable count.
    pub async fn peek_cached(&self, id: ArticleId) -> Option<u64> {
        let cache = self.cache.as_ref()?;
        match cache.get(id).await {
            Ok(count) => count,
            Err(e) => {
                debug!(article_id = id, error = %e, "view cache peek failed");
                None
            }
        }
    }

    async fn get_locked(&self, id: ArticleId) -> Result<u64, Error> {
        let lookup = self.lookup(id).await;
        if let Lookup::Hit(count) = lookup {
            return Ok(count);
        }
        let count = self.durable_count(id).await?;
        if lookup == Lookup::Miss {
            self.remember(id, count).await;
        }
        Ok(count)
    }

    async fn increment_locked(&self, id: ArticleId) -> Result<u64, Error> {
        let lookup = self.lookup(id).await;
        let base = match lookup {
            Lookup::Hit(count) => count,
            Lookup::Miss | Lookup::Bypass => self.durable_count(id).await?,
        };
        let next = base.saturating_add(1).min(MAX_VIEW_COUNT);

        if lookup != Lookup::Bypass && self.remember(id, next).await {
            if next % self.threshold.get() == 0 {
                self.flush(id, next).await?;
            }
        } else {
            self.flush(id, next).await?;
            self.discard(id, "write-through").await;
        }
        Ok(next)
    }

    async fn reset_locked(&self, id: ArticleId) -> Result<(), Error> {
        self.store.set_view_count(id, 0).await?;
        self.discard(id, "reset").await;
        debug!(article_id = id, "view count reset");
        Ok(())
    }

    async fn update_locked(&self, id: ArticleId, draft: ArticleDraft) -> Result<Article, Error> {
        let mut article = self.store.get(id).await?.ok_or(Error::NotFound(id))?;
        let lookup = self.lookup(id).await;

        article.title = draft.title;
        article.content = draft.content;
        if let Lookup::Hit(count) = lookup {
            article.view_count = count;
        }

        self.store.update(&article).await?;
        if lookup != Lookup::Bypass {
            self.remember(id, article.view_count).await;
        }
        Ok(article)
    }

    async fn forget_locked(&self, id: ArticleId) -> Result<(), Error> {
        self.store.delete(id).await?;
        self.discard(id, "delete").await;
        Ok(())
    }

    async fn flush(&self, id: ArticleId, count: u64) -> Result<(), Error> {
        match self.store.set_view_count(id, count).await {
            Ok(()) => {
                debug!(article_id = id, count, "flushed view count");
                Ok(())
            }
            Err(Error::NotFound(missing)) => {
                // Deleted behind the cache's back; don't keep counting a ghost.
                self.discard(id, "flush").await;
                Err(Error::NotFound(missing))
            }
            Err(e) => {
                warn!(article_id = id, count, error = %e, "view count flush failed");
                Err(Error::PersistFailure { id, count, source: Box::new(e) })
            }
        }
    }

    async fn durable_count(&self, id: ArticleId) -> Result<u64, Error> {
        self.store
            .get(id)
            .await?
            .map(|article| article.view_count)
            .ok_or(Error::NotFound(id))
    }

    async fn lookup(&self, id: ArticleId) -> Lookup {
        let Some(cache) = &self.cache else {
            return Lookup::Bypass;
        };
        match cache.get(id).await {
            Ok(Some(count)) => Lookup::Hit(count),
            Ok(None) => Lookup::Miss,
            Err(e) => {
                warn!(article_id = id, error = %e, "view cache lookup failed, using durable count");
                Lookup::Bypass
            }
        }
    }

    /// Store `count` in the cache. Returns false if the cache is unusable.
    async fn remember(&self, id: ArticleId, count: u64) -> bool {
        let Some(cache) = &self.cache else {
            return false;
        };
        match cache.set(id, count).await {
            Ok(()) => true,
            Err(e) => {
                warn!(article_id = id, count, error = %e, "view cache write failed, persisting directly");
                false
            }
        }
    }

    async fn discard(&self, id: ArticleId, during: &'static str) {
        if let Some(cache) = &self.cache
            && let Err(e) = cache.evict(id).await
        {
            error!(article_id = id, during, error = %e, "view cache eviction failed after durable write");
        }
    }

    /// Run `op` on its own task so it finishes even if the caller is dropped.
    async fn detached<T, F, Fut>(&self, op: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(Self) -> Fut,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        tokio::spawn(op(self.clone()))
            .await
            .map_err(|e| Error::TaskFailed(e.to_string()))?
    }
}
