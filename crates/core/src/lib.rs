//! Core types and shared functionality for viewtally.
//!
//! This crate provides:
//! - Durable article storage with a SQLite backend
//! - Two-tier view counting with a bounded-loss flush policy
//! - The article facade used by the server
//! - Unified error types
//! - Configuration structures

pub mod articles;
pub mod config;
pub mod counter;
pub mod error;
pub mod store;

pub use articles::{ArticleDraft, ArticleService};
pub use config::AppConfig;
pub use counter::{ViewCache, ViewCoordinator};
pub use error::Error;
pub use store::{Article, ArticleDb, ArticleId, ArticleStore};
