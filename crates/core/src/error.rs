//! Unified error types for viewtally.
//!
//! Every message starts with a stable code so callers can match on it
//! without parsing prose.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

use crate::store::ArticleId;

/// Unified error types for the article service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No article with this id exists in the durable store.
    #[error("NOT_FOUND: Article not found with id: {0}")]
    NotFound(ArticleId),

    /// Another article already uses the requested title.
    #[error("CONFLICT: Article by this title already exists")]
    AlreadyExists,

    /// Malformed article input. Holds every violated rule, comma separated.
    #[error("VALIDATION_FAILED: {0}")]
    ValidationFailed(String),

    /// A view count reached the flush threshold but could not be written.
    ///
    /// The cached count is left in place, so the value survives in memory
    /// and the next flush retries it.
    #[error("PERSIST_FAILURE: view count {count} for article {id} not persisted: {source}")]
    PersistFailure {
        id: ArticleId,
        count: u64,
        source: Box<Error>,
    },

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A detached view-count task panicked or was aborted by the runtime.
    #[error("INTERNAL: view task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::NotFound(_) => -32001,
            Error::AlreadyExists => -32009,
            Error::ValidationFailed(_) => -32602,
            Error::PersistFailure { .. } => -32003,
            Error::Database(_) | Error::MigrationFailed(_) => -32002,
            Error::TaskFailed(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
