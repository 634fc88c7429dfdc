//! Data models
//!
//! This module defines the entities of the newsroom content store:
//! - `Article` with its publication status and localized field slots
//! - `Category` owning nothing, referenced by articles
//! - `ContactMessage`, a write-once reader submission
//! - Query and pagination types shared by the read paths

pub mod article;
pub mod category;
pub mod contact;

pub use article::{
    Article, ArticleStatus, CreateArticleInput, ListParams, PagedResult, TargetLang,
    TranslatableField, TranslationPatch, UpdateArticleInput, VisibleQuery,
};
pub use category::{Category, CategoryWithCount};
pub use contact::{ContactMessage, NewContactMessage};
