//! View-count tracking.
//!
//! Counts live in two tiers: a fast volatile [`ViewCache`] and the durable
//! [`ArticleStore`](crate::store::ArticleStore). The [`ViewCoordinator`]
//! writes every increment to the cache and pushes the count to the store
//! whenever it reaches a multiple of the flush threshold, so at most
//! `threshold - 1` increments per article can be lost on a crash.
//!
//! All read-then-write work for one article is serialized through
//! [`KeyedLocks`]; different articles never wait on each other.

pub mod cache;
pub mod coordinator;
pub mod locks;

pub use cache::{CacheError, MokaViewCache, ViewCache};
pub use coordinator::ViewCoordinator;
pub use locks::{KeyLease, KeyedLocks};
