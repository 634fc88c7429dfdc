//! Article model
//!
//! This module provides:
//! - `Article` entity with base-language fields and localized slots
//! - `ArticleStatus` enum for publication states
//! - `TargetLang` / `TranslatableField` addressing the localized slots
//! - `VisibleQuery`, the composable published-only read filter
//! - `TranslationPatch`, the single follow-up write payload of the enricher
//! - Input types for creating and updating articles
//! - Pagination types for list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article entity.
///
/// `title` and `content` hold the base-language text. The `*_en` / `*_ru`
/// slots hold translations and start out empty; the enricher fills them
/// best-effort after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// URL-friendly slug, globally unique
    pub slug: String,
    /// Title in the base language
    pub title: String,
    /// Body text in the base language
    pub content: String,
    /// English title translation
    pub title_en: Option<String>,
    /// Russian title translation
    pub title_ru: Option<String>,
    /// English body translation
    pub content_en: Option<String>,
    /// Russian body translation
    pub content_ru: Option<String>,
    /// Optional cover image path
    pub image: Option<String>,
    /// Owning category
    pub category_id: i64,
    /// Publication status
    pub status: ArticleStatus,
    /// Publication timestamp, defaults to creation time; drives ordering
    pub published_at: DateTime<Utc>,
    /// Creation timestamp, set once
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, bumped on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Read a localized slot. `None` means the slot has never been filled.
    pub fn localized(&self, field: TranslatableField, lang: TargetLang) -> Option<&str> {
        match (field, lang) {
            (TranslatableField::Title, TargetLang::En) => self.title_en.as_deref(),
            (TranslatableField::Title, TargetLang::Ru) => self.title_ru.as_deref(),
            (TranslatableField::Content, TargetLang::En) => self.content_en.as_deref(),
            (TranslatableField::Content, TargetLang::Ru) => self.content_ru.as_deref(),
        }
    }

    /// Whether a localized slot holds usable text. A blank string counts as
    /// empty, same as a slot that was never written.
    pub fn has_localized(&self, field: TranslatableField, lang: TargetLang) -> bool {
        self.localized(field, lang)
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false)
    }

    /// Write a localized slot.
    pub fn set_localized(&mut self, field: TranslatableField, lang: TargetLang, value: String) {
        let slot = match (field, lang) {
            (TranslatableField::Title, TargetLang::En) => &mut self.title_en,
            (TranslatableField::Title, TargetLang::Ru) => &mut self.title_ru,
            (TranslatableField::Content, TargetLang::En) => &mut self.content_en,
            (TranslatableField::Content, TargetLang::Ru) => &mut self.content_ru,
        };
        *slot = Some(value);
    }

    /// Merge a translation patch into this article in memory. Mirrors what
    /// the follow-up UPDATE does in the store.
    pub fn apply_patch(&mut self, patch: &TranslationPatch) {
        for (field, lang) in TranslationPatch::SLOTS {
            if let Some(value) = patch.get(field, lang) {
                self.set_localized(field, lang, value.to_string());
            }
        }
    }

    /// Whether the article is reachable through the public read path.
    pub fn is_visible(&self) -> bool {
        self.status == ArticleStatus::Published
    }
}

/// Article publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Draft - not visible to the public
    #[default]
    Draft,
    /// Published - visible to the public
    Published,
    /// Archived - hidden again but not deleted
    Archived,
}

impl ArticleStatus {
    /// Database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
            ArticleStatus::Archived => "archived",
        }
    }

    /// Parse the database string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(ArticleStatus::Draft),
            "published" => Some(ArticleStatus::Published),
            "archived" => Some(ArticleStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target language of a localized slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLang {
    /// English
    En,
    /// Russian
    Ru,
}

impl TargetLang {
    /// ISO 639-1 code passed to the translation provider
    pub fn code(&self) -> &'static str {
        match self {
            TargetLang::En => "en",
            TargetLang::Ru => "ru",
        }
    }

    /// Parse an ISO 639-1 code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" => Some(TargetLang::En),
            "ru" => Some(TargetLang::Ru),
            _ => None,
        }
    }

    /// All languages with a slot in the schema
    pub fn all() -> [TargetLang; 2] {
        [TargetLang::En, TargetLang::Ru]
    }
}

impl std::fmt::Display for TargetLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Field of an article that carries translations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatableField {
    /// The article title
    Title,
    /// The article body
    Content,
}

impl TranslatableField {
    /// Name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslatableField::Title => "title",
            TranslatableField::Content => "content",
        }
    }

    /// The base-language text this field translates from
    pub fn base_text<'a>(&self, article: &'a Article) -> &'a str {
        match self {
            TranslatableField::Title => &article.title,
            TranslatableField::Content => &article.content,
        }
    }
}

/// Composable filter over the public read path.
///
/// Every query built from this type is constrained to published articles and
/// ordered by publish time descending; the optional parts narrow the result
/// further but can never widen it past the publication gate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleQuery {
    /// Restrict to one category
    pub category_id: Option<i64>,
    /// Drop one article id from the result (e.g. the one being viewed)
    pub exclude_id: Option<i64>,
    /// Cap the number of rows
    pub limit: Option<i64>,
    /// Skip this many rows
    pub offset: i64,
}

impl VisibleQuery {
    /// A query matching every published article, newest first
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to articles in the given category
    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Exclude one article id
    pub fn excluding(mut self, article_id: i64) -> Self {
        self.exclude_id = Some(article_id);
        self
    }

    /// Cap the result at `n` rows
    pub fn take(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Skip the first `n` rows
    pub fn skip(mut self, n: i64) -> Self {
        self.offset = n;
        self
    }

    /// Apply pagination parameters
    pub fn paged(self, params: &ListParams) -> Self {
        let offset = params.offset();
        self.take(params.limit()).skip(offset)
    }
}

/// Translations gathered by the enricher, persisted in one follow-up write.
///
/// Only filled slots are written; an empty patch means no write happens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationPatch {
    /// English title, if translated
    pub title_en: Option<String>,
    /// Russian title, if translated
    pub title_ru: Option<String>,
    /// English body, if translated
    pub content_en: Option<String>,
    /// Russian body, if translated
    pub content_ru: Option<String>,
}

impl TranslationPatch {
    /// Every slot the schema carries, in column order
    pub const SLOTS: [(TranslatableField, TargetLang); 4] = [
        (TranslatableField::Title, TargetLang::En),
        (TranslatableField::Title, TargetLang::Ru),
        (TranslatableField::Content, TargetLang::En),
        (TranslatableField::Content, TargetLang::Ru),
    ];

    /// Read a slot of the patch
    pub fn get(&self, field: TranslatableField, lang: TargetLang) -> Option<&str> {
        match (field, lang) {
            (TranslatableField::Title, TargetLang::En) => self.title_en.as_deref(),
            (TranslatableField::Title, TargetLang::Ru) => self.title_ru.as_deref(),
            (TranslatableField::Content, TargetLang::En) => self.content_en.as_deref(),
            (TranslatableField::Content, TargetLang::Ru) => self.content_ru.as_deref(),
        }
    }

    /// Fill a slot of the patch
    pub fn set(&mut self, field: TranslatableField, lang: TargetLang, value: String) {
        let slot = match (field, lang) {
            (TranslatableField::Title, TargetLang::En) => &mut self.title_en,
            (TranslatableField::Title, TargetLang::Ru) => &mut self.title_ru,
            (TranslatableField::Content, TargetLang::En) => &mut self.content_en,
            (TranslatableField::Content, TargetLang::Ru) => &mut self.content_ru,
        };
        *slot = Some(value);
    }

    /// True when no slot is filled; the enricher skips the follow-up write
    pub fn is_empty(&self) -> bool {
        self.title_en.is_none()
            && self.title_ru.is_none()
            && self.content_en.is_none()
            && self.content_ru.is_none()
    }

    /// Number of filled slots
    pub fn filled_count(&self) -> usize {
        Self::SLOTS
            .iter()
            .filter(|(field, lang)| self.get(*field, *lang).is_some())
            .count()
    }
}

/// Input for creating a new article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArticleInput {
    /// URL-friendly slug; generated from the title when left empty
    pub slug: String,
    /// Title in the base language
    pub title: String,
    /// Body text in the base language
    pub content: String,
    /// Optional cover image path
    pub image: Option<String>,
    /// Owning category
    pub category_id: i64,
    /// Publication status (defaults to Draft)
    pub status: Option<ArticleStatus>,
    /// Publication timestamp (defaults to creation time)
    pub published_at: Option<DateTime<Utc>>,
}

impl CreateArticleInput {
    /// Create a new CreateArticleInput
    pub fn new(slug: String, title: String, content: String, category_id: i64) -> Self {
        Self {
            slug,
            title,
            content,
            image: None,
            category_id,
            status: None,
            published_at: None,
        }
    }

    /// Set the cover image path
    pub fn with_image(mut self, image: String) -> Self {
        self.image = Some(image);
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set an explicit publication timestamp
    pub fn with_published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }
}

/// Input for updating an existing article.
///
/// Updates never touch the localized slots; those belong to the enricher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateArticleInput {
    /// New slug (optional)
    pub slug: Option<String>,
    /// New title (optional)
    pub title: Option<String>,
    /// New body text (optional)
    pub content: Option<String>,
    /// New cover image path (optional)
    pub image: Option<String>,
    /// New category (optional)
    pub category_id: Option<i64>,
    /// New status (optional)
    pub status: Option<ArticleStatus>,
    /// New publication timestamp (optional)
    pub published_at: Option<DateTime<Utc>>,
}

impl UpdateArticleInput {
    /// Create a new empty UpdateArticleInput
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slug
    pub fn with_slug(mut self, slug: String) -> Self {
        self.slug = Some(slug);
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    /// Set the body text
    pub fn with_content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the publication timestamp
    pub fn with_published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.slug.is_some()
            || self.title.is_some()
            || self.content.is_some()
            || self.image.is_some()
            || self.category_id.is_some()
            || self.status.is_some()
            || self.published_at.is_some()
    }
}

/// Pagination parameters for list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self { page: 1, per_page: 6 }
    }
}

impl ListParams {
    /// Create pagination parameters; page is clamped to 1+, per_page to 1..=100
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    /// Row offset for the query
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    /// Row limit for the query
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    /// Create a paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    /// Total number of pages
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        ((self.total.max(0) as u32) + self.per_page - 1) / self.per_page
    }

    /// Whether a next page exists
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether a previous page exists
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_article() -> Article {
        let now = Utc::now();
        Article {
            id: 1,
            slug: "sample".to_string(),
            title: "Sample".to_string(),
            content: "Body".to_string(),
            title_en: None,
            title_ru: None,
            content_en: None,
            content_ru: None,
            image: None,
            category_id: 1,
            status: ArticleStatus::Draft,
            published_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ArticleStatus::Draft,
            ArticleStatus::Published,
            ArticleStatus::Archived,
        ] {
            assert_eq!(ArticleStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_unknown() {
        assert_eq!(ArticleStatus::parse("pending"), None);
        assert_eq!(ArticleStatus::parse(""), None);
    }

    #[test]
    fn test_status_default_is_draft() {
        assert_eq!(ArticleStatus::default(), ArticleStatus::Draft);
    }

    #[test]
    fn test_target_lang_codes() {
        assert_eq!(TargetLang::En.code(), "en");
        assert_eq!(TargetLang::Ru.code(), "ru");
        assert_eq!(TargetLang::from_code("EN"), Some(TargetLang::En));
        assert_eq!(TargetLang::from_code("de"), None);
    }

    #[test]
    fn test_localized_slot_accessors() {
        let mut article = sample_article();
        assert!(!article.has_localized(TranslatableField::Title, TargetLang::En));

        article.set_localized(
            TranslatableField::Title,
            TargetLang::En,
            "Sample EN".to_string(),
        );
        assert_eq!(
            article.localized(TranslatableField::Title, TargetLang::En),
            Some("Sample EN")
        );
        assert!(article.has_localized(TranslatableField::Title, TargetLang::En));
    }

    #[test]
    fn test_blank_slot_counts_as_empty() {
        let mut article = sample_article();
        article.title_ru = Some("   ".to_string());
        assert!(!article.has_localized(TranslatableField::Title, TargetLang::Ru));
    }

    #[test]
    fn test_patch_is_empty_and_filled_count() {
        let mut patch = TranslationPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.filled_count(), 0);

        patch.set(
            TranslatableField::Content,
            TargetLang::Ru,
            "Текст".to_string(),
        );
        assert!(!patch.is_empty());
        assert_eq!(patch.filled_count(), 1);
        assert_eq!(
            patch.get(TranslatableField::Content, TargetLang::Ru),
            Some("Текст")
        );
    }

    #[test]
    fn test_apply_patch_fills_only_patched_slots() {
        let mut article = sample_article();
        article.title_en = Some("kept".to_string());

        let mut patch = TranslationPatch::default();
        patch.set(
            TranslatableField::Content,
            TargetLang::En,
            "body en".to_string(),
        );
        article.apply_patch(&patch);

        assert_eq!(article.title_en.as_deref(), Some("kept"));
        assert_eq!(article.content_en.as_deref(), Some("body en"));
        assert!(article.content_ru.is_none());
    }

    #[test]
    fn test_visible_query_builder() {
        let query = VisibleQuery::new().in_category(3).excluding(7).take(5).skip(10);
        assert_eq!(query.category_id, Some(3));
        assert_eq!(query.exclude_id, Some(7));
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.offset, 10);
    }

    #[test]
    fn test_visible_query_paged() {
        let params = ListParams::new(3, 6);
        let query = VisibleQuery::new().paged(&params);
        assert_eq!(query.limit, Some(6));
        assert_eq!(query.offset, 12);
    }

    #[test]
    fn test_list_params_clamping() {
        let params = ListParams::new(0, 500);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 100);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_paged_result_navigation() {
        let params = ListParams::new(2, 6);
        let result: PagedResult<i32> = PagedResult::new(vec![1, 2, 3], 13, &params);
        assert_eq!(result.total_pages(), 3);
        assert!(result.has_next());
        assert!(result.has_prev());
    }

    #[test]
    fn test_is_visible() {
        let mut article = sample_article();
        assert!(!article.is_visible());
        article.status = ArticleStatus::Published;
        assert!(article.is_visible());
        article.status = ArticleStatus::Archived;
        assert!(!article.is_visible());
    }
}
