//! Article facade: content CRUD on top of the durable store, with every
//! view-related read or write routed through the view coordinator.

pub mod draft;
pub mod service;

pub use draft::ArticleDraft;
pub use service::ArticleService;
