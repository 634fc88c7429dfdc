//! Services
//!
//! Business logic on top of the repositories:
//! - `article`: creation with one-shot enrichment, the visible read paths,
//!   and lifecycle transitions
//! - `category`: category management with cascade deletion
//! - `contact`: reader message intake
//! - `translation`: the provider seam and the enricher fill logic

pub mod article;
pub mod category;
pub mod contact;
pub mod translation;

pub use article::{generate_slug, ArticleService, ArticleServiceError};
pub use category::{CategoryService, CategoryServiceError};
pub use contact::{ContactService, ContactServiceError};
pub use translation::{fill_missing_translations, GoogleTranslator, Translator};
