//! Article facade.

use std::sync::Arc;

use crate::Error;
use crate::config::AppConfig;
use crate::counter::{MokaViewCache, ViewCache, ViewCoordinator};
use crate::store::{Article, ArticleId, ArticleStore};

use super::ArticleDraft;

/// Article CRUD with view counting.
///
/// Content operations go straight to the store; anything that reads or
/// writes a view count goes through the [`ViewCoordinator`].
#[derive(Clone)]
pub struct ArticleService {
    store: Arc<dyn ArticleStore>,
    views: ViewCoordinator,
}

impl ArticleService {
    pub fn new(store: Arc<dyn ArticleStore>, views: ViewCoordinator) -> Self {
        Self { store, views }
    }

    /// Wire a service from configuration: moka cache when enabled,
    /// write-through on the store otherwise.
    pub fn from_config(store: Arc<dyn ArticleStore>, config: &AppConfig) -> Self {
        let cache = config
            .cache_enabled
            .then(|| Arc::new(MokaViewCache::from_config(config)) as Arc<dyn ViewCache>);
        let views = ViewCoordinator::new(Arc::clone(&store), cache, config.flush_threshold);
        Self::new(store, views)
    }

    pub fn views(&self) -> &ViewCoordinator {
        &self.views
    }

    /// Create an article with zero views and return its id.
    pub async fn create(&self, draft: ArticleDraft) -> Result<ArticleId, Error> {
        draft.validate()?;
        if self.store.exists_by_title(&draft.title).await? {
            return Err(Error::AlreadyExists);
        }
        let id = self.store.create(&draft).await?;
        tracing::info!(article_id = id, "article created");
        Ok(id)
    }

    /// All articles, with cached counts shown where fresher than the store.
    ///
    /// Listing does not count as a view.
    pub async fn list(&self) -> Result<Vec<Article>, Error> {
        let mut articles = self.store.list().await?;
        for article in &mut articles {
            if let Some(count) = self.views.peek_cached(article.id).await {
                article.view_count = count;
            }
        }
        Ok(articles)
    }

    /// Fetch an article; the fetch itself counts as a view.
    pub async fn read(&self, id: ArticleId) -> Result<Article, Error> {
        let mut article = self.store.get(id).await?.ok_or(Error::NotFound(id))?;
        article.view_count = self.views.reconcile_on_read(id).await?;
        Ok(article)
    }

    /// Replace title and content. The view count is left as is.
    pub async fn update(&self, id: ArticleId, draft: ArticleDraft) -> Result<Article, Error> {
        draft.validate()?;
        let current = self.store.get(id).await?.ok_or(Error::NotFound(id))?;
        if current.title != draft.title && self.store.exists_by_title(&draft.title).await? {
            return Err(Error::AlreadyExists);
        }
        let article = self.views.update_preserving_views(id, draft).await?;
        tracing::info!(article_id = id, "article updated");
        Ok(article)
    }

    pub async fn delete(&self, id: ArticleId) -> Result<(), Error> {
        self.views.forget(id).await?;
        tracing::info!(article_id = id, "article deleted");
        Ok(())
    }

    pub async fn view_count(&self, id: ArticleId) -> Result<u64, Error> {
        self.views.get_views(id).await
    }

    pub async fn increment_views(&self, id: ArticleId) -> Result<u64, Error> {
        self.views.increment_views(id).await
    }

    pub async fn reset_views(&self, id: ArticleId) -> Result<(), Error> {
        self.views.reset_views(id).await
    }
}
