//! Article service
//!
//! Business logic for articles:
//! - Creation with validation, slug generation, and one-shot translation
//!   enrichment
//! - The published-only read paths (lists, lookups, related, latest)
//! - Updates and lifecycle transitions, which never re-trigger enrichment
//!
//! The enricher runs inside `create` only. Whatever happens to the provider,
//! creation itself succeeds once the row is in the store; translations are
//! persisted afterwards in at most one follow-up write.

use crate::config::TranslationConfig;
use crate::db::repositories::ArticleRepository;
use crate::models::{
    Article, ArticleStatus, CreateArticleInput, ListParams, PagedResult, UpdateArticleInput,
    VisibleQuery,
};
use crate::services::translation::{fill_missing_translations, Translator};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info};

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// No visible article matches; covers both absent records and records
    /// that exist but are not published
    #[error("Article not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Duplicate slug
    #[error("Article slug already exists: {0}")]
    DuplicateSlug(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Article service
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
    translator: Option<Arc<dyn Translator>>,
    translation: TranslationConfig,
}

impl ArticleService {
    /// Create a service without translation enrichment
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self {
            repo,
            translator: None,
            translation: TranslationConfig::default(),
        }
    }

    /// Create a service that enriches new articles through the given provider
    pub fn with_translator(
        repo: Arc<dyn ArticleRepository>,
        translator: Arc<dyn Translator>,
        translation: TranslationConfig,
    ) -> Self {
        Self {
            repo,
            translator: Some(translator),
            translation,
        }
    }

    /// Create a new article.
    ///
    /// After the row is stored, the enricher attempts to fill the empty
    /// localized slots. Enrichment happens here and nowhere else; later edits
    /// to the same record never call the provider again.
    pub async fn create(
        &self,
        mut input: CreateArticleInput,
    ) -> Result<Article, ArticleServiceError> {
        self.validate_create_input(&input)?;

        if input.slug.trim().is_empty() {
            input.slug = generate_slug(&input.title);
            if input.slug.is_empty() {
                return Err(ArticleServiceError::ValidationError(
                    "Cannot derive a slug from the title".to_string(),
                ));
            }
        }

        if self
            .repo
            .exists_by_slug(&input.slug)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(ArticleServiceError::DuplicateSlug(input.slug));
        }

        let mut article = self
            .repo
            .create(&input)
            .await
            .context("Failed to create article")?;
        info!(id = article.id, slug = %article.slug, "article created");

        self.enrich_new_article(&mut article).await;

        Ok(article)
    }

    /// One-shot enrichment of a freshly created article. Best-effort: nothing
    /// here can fail the creation that triggered it.
    async fn enrich_new_article(&self, article: &mut Article) {
        let Some(translator) = &self.translator else {
            return;
        };
        if !self.translation.enabled {
            return;
        }

        let patch =
            fill_missing_translations(article, translator.as_ref(), &self.translation).await;
        if patch.is_empty() {
            return;
        }

        match self.repo.apply_translations(article.id, &patch).await {
            Ok(()) => {
                article.apply_patch(&patch);
                info!(
                    id = article.id,
                    slots = patch.filled_count(),
                    "stored article translations"
                );
            }
            Err(err) => {
                error!(id = article.id, error = %err, "failed to store article translations");
            }
        }
    }

    /// Get a published article by ID
    pub async fn get_visible_by_id(&self, id: i64) -> Result<Article, ArticleServiceError> {
        self.repo
            .get_visible_by_id(id)
            .await
            .context("Failed to get article by ID")?
            .ok_or_else(|| ArticleServiceError::NotFound(format!("id {}", id)))
    }

    /// Get a published article by slug
    pub async fn get_visible_by_slug(&self, slug: &str) -> Result<Article, ArticleServiceError> {
        self.repo
            .get_visible_by_slug(slug)
            .await
            .context("Failed to get article by slug")?
            .ok_or_else(|| ArticleServiceError::NotFound(format!("slug {}", slug)))
    }

    /// List published articles, newest publish time first
    pub async fn list_visible(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<Article>, ArticleServiceError> {
        let items = self
            .repo
            .list_visible(&VisibleQuery::new().paged(params))
            .await
            .context("Failed to list visible articles")?;
        let total = self
            .repo
            .count_visible(&VisibleQuery::new())
            .await
            .context("Failed to count visible articles")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// List published articles in one category
    pub async fn list_visible_in_category(
        &self,
        category_id: i64,
        params: &ListParams,
    ) -> Result<PagedResult<Article>, ArticleServiceError> {
        let base = VisibleQuery::new().in_category(category_id);
        let items = self
            .repo
            .list_visible(&base.clone().paged(params))
            .await
            .context("Failed to list visible articles by category")?;
        let total = self
            .repo
            .count_visible(&base)
            .await
            .context("Failed to count visible articles by category")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Published articles from the same category, excluding the article
    /// itself (sidebar-style "related" listing)
    pub async fn related(
        &self,
        article: &Article,
        limit: i64,
    ) -> Result<Vec<Article>, ArticleServiceError> {
        let query = VisibleQuery::new()
            .in_category(article.category_id)
            .excluding(article.id)
            .take(limit);
        Ok(self
            .repo
            .list_visible(&query)
            .await
            .context("Failed to list related articles")?)
    }

    /// The `limit` most recently published articles
    pub async fn latest(&self, limit: i64) -> Result<Vec<Article>, ArticleServiceError> {
        Ok(self
            .repo
            .list_visible(&VisibleQuery::new().take(limit))
            .await
            .context("Failed to list latest articles")?)
    }

    /// List articles of any status (operator view)
    pub async fn list(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<Article>, ArticleServiceError> {
        let items = self
            .repo
            .list(params.offset(), params.limit())
            .await
            .context("Failed to list articles")?;
        let total = self.repo.count().await.context("Failed to count articles")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Update an article. Never re-triggers translation enrichment.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateArticleInput,
    ) -> Result<Article, ArticleServiceError> {
        let existing = self.require_exists(id).await?;
        if !input.has_changes() {
            return Ok(existing);
        }

        if let Some(title) = &input.title {
            if title.trim().is_empty() {
                return Err(ArticleServiceError::ValidationError(
                    "Article title cannot be empty".to_string(),
                ));
            }
        }
        if let Some(content) = &input.content {
            if content.trim().is_empty() {
                return Err(ArticleServiceError::ValidationError(
                    "Article content cannot be empty".to_string(),
                ));
            }
        }
        if let Some(slug) = &input.slug {
            if self
                .repo
                .exists_by_slug_excluding(slug, id)
                .await
                .context("Failed to check slug uniqueness")?
            {
                return Err(ArticleServiceError::DuplicateSlug(slug.clone()));
            }
        }

        Ok(self
            .repo
            .update(id, &input)
            .await
            .context("Failed to update article")?)
    }

    /// Transition an article to Published; it becomes reachable through the
    /// visible read path. `at` overrides the publish time, defaulting to now.
    pub async fn publish(
        &self,
        id: i64,
        at: Option<DateTime<Utc>>,
    ) -> Result<Article, ArticleServiceError> {
        self.require_exists(id).await?;

        let input = UpdateArticleInput::new()
            .with_status(ArticleStatus::Published)
            .with_published_at(at.unwrap_or_else(Utc::now));
        let article = self
            .repo
            .update(id, &input)
            .await
            .context("Failed to publish article")?;
        info!(id, slug = %article.slug, "article published");
        Ok(article)
    }

    /// Transition an article to Archived, hiding it from the visible read path
    pub async fn archive(&self, id: i64) -> Result<Article, ArticleServiceError> {
        self.require_exists(id).await?;

        let input = UpdateArticleInput::new().with_status(ArticleStatus::Archived);
        let article = self
            .repo
            .update(id, &input)
            .await
            .context("Failed to archive article")?;
        info!(id, slug = %article.slug, "article archived");
        Ok(article)
    }

    /// Delete an article
    pub async fn delete(&self, id: i64) -> Result<(), ArticleServiceError> {
        self.require_exists(id).await?;
        self.repo
            .delete(id)
            .await
            .context("Failed to delete article")?;
        info!(id, "article deleted");
        Ok(())
    }

    async fn require_exists(&self, id: i64) -> Result<Article, ArticleServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get article by ID")?
            .ok_or_else(|| ArticleServiceError::NotFound(format!("id {}", id)))
    }

    fn validate_create_input(&self, input: &CreateArticleInput) -> Result<(), ArticleServiceError> {
        if input.title.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Article title cannot be empty".to_string(),
            ));
        }
        if input.content.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Article content cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generate a URL-friendly slug from a title.
///
/// ASCII is lowercased and non-alphanumeric runs collapse into single
/// hyphens; non-ASCII characters pass through so Cyrillic titles keep
/// readable slugs.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || !c.is_ascii() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
