//! Repositories
//!
//! Trait-based data access for the content store. Services depend on the
//! traits (`Arc<dyn …>`), the sqlx implementations bind them to SQLite.

pub mod article;
pub mod category;
pub mod contact;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use contact::{ContactRepository, SqlxContactRepository};
