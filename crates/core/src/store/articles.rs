//! Article CRUD operations.
//!
//! [`ArticleDb`]'s implementation of [`ArticleStore`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, Row, ffi};

use super::connection::ArticleDb;
use super::{ArticleId, ArticleStore, MAX_VIEW_COUNT};
use crate::Error;
use crate::articles::ArticleDraft;

/// A stored article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub view_count: u64,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl Article {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            view_count: row.get::<_, i64>(3)? as u64,
            created_at: row.get(4)?,
        })
    }
}

const SELECT_ARTICLE: &str = "SELECT id, title, content, view_count, created_at FROM articles";

/// Map a UNIQUE(title) violation onto the domain error.
fn conflict_or(err: rusqlite::Error) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE => Error::AlreadyExists,
        _ => err.into(),
    }
}

fn stored_count(count: u64) -> Result<i64, Error> {
    i64::try_from(count).map_err(|_| Error::ValidationFailed(format!("View count {count} exceeds {MAX_VIEW_COUNT}")))
}

#[async_trait]
impl ArticleStore for ArticleDb {
    async fn create(&self, draft: &ArticleDraft) -> Result<ArticleId, Error> {
        let draft = draft.clone();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<ArticleId, Error> {
                conn.execute(
                    "INSERT INTO articles (title, content, view_count, created_at) VALUES (?1, ?2, 0, ?3)",
                    params![draft.title, draft.content, created_at],
                )
                .map_err(conflict_or)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(Error::from)
    }

    async fn get(&self, id: ArticleId) -> Result<Option<Article>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<Article>, Error> {
                let result = conn.query_row(&format!("{SELECT_ARTICLE} WHERE id = ?1"), params![id], Article::from_row);

                match result {
                    Ok(article) => Ok(Some(article)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn list(&self) -> Result<Vec<Article>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<Article>, Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_ARTICLE} ORDER BY id ASC"))?;
                let articles = stmt
                    .query_map([], Article::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await
            .map_err(Error::from)
    }

    async fn update(&self, article: &Article) -> Result<(), Error> {
        let article = article.clone();
        let view_count = stored_count(article.view_count)?;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let changed = conn
                    .execute(
                        "UPDATE articles SET title = ?2, content = ?3, view_count = ?4 WHERE id = ?1",
                        params![article.id, article.title, article.content, view_count],
                    )
                    .map_err(conflict_or)?;
                if changed == 0 {
                    return Err(Error::NotFound(article.id));
                }
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, id: ArticleId) -> Result<(), Error> {
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let deleted = conn.execute("DELETE FROM articles WHERE id = ?1", params![id])?;
                if deleted == 0 {
                    return Err(Error::NotFound(id));
                }
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn exists_by_title(&self, title: &str) -> Result<bool, Error> {
        let title = title.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM articles WHERE title = ?1)",
                    params![title],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    async fn set_view_count(&self, id: ArticleId, count: u64) -> Result<(), Error> {
        let count = stored_count(count)?;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let changed = conn.execute(
                    "UPDATE articles SET view_count = ?2 WHERE id = ?1",
                    params![id, count],
                )?;
                if changed == 0 {
                    return Err(Error::NotFound(id));
                }
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> ArticleDraft {
        ArticleDraft { title: title.to_string(), content: "x".repeat(80) }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = ArticleDb::open_in_memory().await.unwrap();
        let id = db.create(&draft("First")).await.unwrap();

        let article = db.get(id).await.unwrap().unwrap();
        assert_eq!(article.id, id);
        assert_eq!(article.title, "First");
        assert_eq!(article.view_count, 0);
        assert!(chrono::DateTime::parse_from_rfc3339(&article.created_at).is_ok());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = ArticleDb::open_in_memory().await.unwrap();
        assert!(db.get(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_title_is_conflict() {
        let db = ArticleDb::open_in_memory().await.unwrap();
        db.create(&draft("Same")).await.unwrap();

        let result = db.create(&draft("Same")).await;
        assert!(matches!(result, Err(Error::AlreadyExists)));
        assert!(db.exists_by_title("Same").await.unwrap());
        assert!(!db.exists_by_title("Other").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_into_taken_title_is_conflict() {
        let db = ArticleDb::open_in_memory().await.unwrap();
        db.create(&draft("Taken")).await.unwrap();
        let id = db.create(&draft("Mine")).await.unwrap();

        let mut article = db.get(id).await.unwrap().unwrap();
        article.title = "Taken".to_string();
        assert!(matches!(db.update(&article).await, Err(Error::AlreadyExists)));
    }

    #[tokio::test]
    async fn test_list_ordered_by_id() {
        let db = ArticleDb::open_in_memory().await.unwrap();
        let a = db.create(&draft("A")).await.unwrap();
        let b = db.create(&draft("B")).await.unwrap();

        let ids: Vec<_> = db.list().await.unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn test_set_view_count_and_delete() {
        let db = ArticleDb::open_in_memory().await.unwrap();
        let id = db.create(&draft("Counted")).await.unwrap();

        db.set_view_count(id, 15).await.unwrap();
        assert_eq!(db.get(id).await.unwrap().unwrap().view_count, 15);

        db.delete(id).await.unwrap();
        assert!(matches!(db.delete(id).await, Err(Error::NotFound(gone)) if gone == id));
        assert!(matches!(db.set_view_count(id, 1).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_view_count_above_sqlite_range_is_rejected() {
        let db = ArticleDb::open_in_memory().await.unwrap();
        let id = db.create(&draft("Huge")).await.unwrap();

        db.set_view_count(id, MAX_VIEW_COUNT).await.unwrap();
        assert_eq!(db.get(id).await.unwrap().unwrap().view_count, MAX_VIEW_COUNT);

        let overflow = db.set_view_count(id, MAX_VIEW_COUNT + 1).await;
        assert!(matches!(overflow, Err(Error::ValidationFailed(_))));

        let mut article = db.get(id).await.unwrap().unwrap();
        article.view_count = u64::MAX;
        assert!(matches!(db.update(&article).await, Err(Error::ValidationFailed(_))));
        assert_eq!(db.get(id).await.unwrap().unwrap().view_count, MAX_VIEW_COUNT);
    }
}
