//! Durable article storage.
//!
//! The authoritative copy of every article, including its persisted view
//! count, lives behind the [`ArticleStore`] trait. [`ArticleDb`] is the
//! SQLite implementation:
//!
//! - Async access via tokio-rusqlite (queries run on a background thread)
//! - Automatic schema migrations
//! - WAL mode for concurrent readers
//! - Title uniqueness enforced by the schema

pub mod articles;
pub mod connection;
pub mod migrations;

use async_trait::async_trait;

use crate::Error;
use crate::articles::ArticleDraft;

pub use articles::Article;
pub use connection::ArticleDb;

/// Identifier assigned to an article on creation.
pub type ArticleId = i64;

/// Largest view count the store can hold (SQLite integers are signed).
pub const MAX_VIEW_COUNT: u64 = i64::MAX as u64;

/// Durable record store consumed by the article facade and the view coordinator.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Insert a new article with a view count of 0 and return its id.
    ///
    /// Fails with [`Error::AlreadyExists`] if the title is taken.
    async fn create(&self, draft: &ArticleDraft) -> Result<ArticleId, Error>;

    /// Fetch one article. `None` when the id is unknown.
    async fn get(&self, id: ArticleId) -> Result<Option<Article>, Error>;

    /// All articles, ordered by id.
    async fn list(&self) -> Result<Vec<Article>, Error>;

    /// Overwrite title, content and view count of an existing article.
    ///
    /// Counts above [`MAX_VIEW_COUNT`] fail with [`Error::ValidationFailed`].
    async fn update(&self, article: &Article) -> Result<(), Error>;

    /// Remove an article. Fails with [`Error::NotFound`] if absent.
    async fn delete(&self, id: ArticleId) -> Result<(), Error>;

    async fn exists_by_title(&self, title: &str) -> Result<bool, Error>;

    /// Write only the view count. Fails with [`Error::NotFound`] if absent
    /// and [`Error::ValidationFailed`] above [`MAX_VIEW_COUNT`].
    async fn set_view_count(&self, id: ArticleId, count: u64) -> Result<(), Error>;
}
