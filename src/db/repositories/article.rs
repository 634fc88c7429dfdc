//! Article repository
//!
//! Database operations for articles, including the published-only read path
//! and the enricher's single follow-up translation write.

use crate::models::{
    Article, ArticleStatus, CreateArticleInput, TranslationPatch, UpdateArticleInput, VisibleQuery,
};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;

const ARTICLE_COLUMNS: &str = "id, slug, title, content, title_en, title_ru, content_en, \
     content_ru, image, category_id, status, published_at, created_at, updated_at";

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Create a new article. Fails on a duplicate slug, leaving the store unchanged.
    async fn create(&self, input: &CreateArticleInput) -> Result<Article>;

    /// Get an article by ID, any status
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// Get an article by slug, any status
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>>;

    /// Get a published article by ID. Draft and Archived records read as absent.
    async fn get_visible_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// Get a published article by slug. Draft and Archived records read as absent.
    async fn get_visible_by_slug(&self, slug: &str) -> Result<Option<Article>>;

    /// List published articles matching the query, publish time descending
    async fn list_visible(&self, query: &VisibleQuery) -> Result<Vec<Article>>;

    /// Count published articles matching the query's filters (paging ignored)
    async fn count_visible(&self, query: &VisibleQuery) -> Result<i64>;

    /// List articles of any status, newest created first (operator view)
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Article>>;

    /// Count all articles, any status
    async fn count(&self) -> Result<i64>;

    /// Partially update an article and bump its updated time
    async fn update(&self, id: i64, input: &UpdateArticleInput) -> Result<Article>;

    /// Store the enricher's translations in one UPDATE, filling only the
    /// patched slots. An empty patch writes nothing.
    async fn apply_translations(&self, id: i64, patch: &TranslationPatch) -> Result<()>;

    /// Delete an article
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check if a slug is already taken
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Check if a slug is taken by a different article (for updates)
    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool>;
}

/// SQLx-based article repository
pub struct SqlxArticleRepository {
    pool: SqlitePool,
}

impl SqlxArticleRepository {
    /// Create a new repository on the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, input: &CreateArticleInput) -> Result<Article> {
        let now = Utc::now();
        let status = input.status.unwrap_or_default();
        let published_at = input.published_at.unwrap_or(now);

        let result = sqlx::query(
            r#"
            INSERT INTO articles (slug, title, content, image, category_id, status, published_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.slug)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.image)
        .bind(input.category_id)
        .bind(status.as_str())
        .bind(published_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create article")?;

        Ok(Article {
            id: result.last_insert_rowid(),
            slug: input.slug.clone(),
            title: input.title.clone(),
            content: input.content.clone(),
            title_en: None,
            title_ru: None,
            content_en: None,
            content_ru: None,
            image: input.image.clone(),
            category_id: input.category_id,
            status,
            published_at,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        let sql = format!("SELECT {} FROM articles WHERE id = ?", ARTICLE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get article by ID")?;

        row.as_ref().map(row_to_article).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let sql = format!("SELECT {} FROM articles WHERE slug = ?", ARTICLE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get article by slug")?;

        row.as_ref().map(row_to_article).transpose()
    }

    async fn get_visible_by_id(&self, id: i64) -> Result<Option<Article>> {
        let sql = format!(
            "SELECT {} FROM articles WHERE id = ? AND status = 'published'",
            ARTICLE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get visible article by ID")?;

        row.as_ref().map(row_to_article).transpose()
    }

    async fn get_visible_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let sql = format!(
            "SELECT {} FROM articles WHERE slug = ? AND status = 'published'",
            ARTICLE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get visible article by slug")?;

        row.as_ref().map(row_to_article).transpose()
    }

    async fn list_visible(&self, query: &VisibleQuery) -> Result<Vec<Article>> {
        let sql = format!(
            "SELECT {} FROM articles WHERE {} ORDER BY published_at DESC, id DESC LIMIT ? OFFSET ?",
            ARTICLE_COLUMNS,
            visible_where(query)
        );

        let mut q = sqlx::query(&sql);
        if let Some(category_id) = query.category_id {
            q = q.bind(category_id);
        }
        if let Some(exclude_id) = query.exclude_id {
            q = q.bind(exclude_id);
        }
        // LIMIT -1 means unbounded in SQLite
        q = q.bind(query.limit.unwrap_or(-1)).bind(query.offset);

        let rows = q
            .fetch_all(&self.pool)
            .await
            .context("Failed to list visible articles")?;

        rows.iter().map(row_to_article).collect()
    }

    async fn count_visible(&self, query: &VisibleQuery) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) as count FROM articles WHERE {}",
            visible_where(query)
        );

        let mut q = sqlx::query(&sql);
        if let Some(category_id) = query.category_id {
            q = q.bind(category_id);
        }
        if let Some(exclude_id) = query.exclude_id {
            q = q.bind(exclude_id);
        }

        let row = q
            .fetch_one(&self.pool)
            .await
            .context("Failed to count visible articles")?;

        Ok(row.get("count"))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Article>> {
        let sql = format!(
            "SELECT {} FROM articles ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            ARTICLE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list articles")?;

        rows.iter().map(row_to_article).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM articles")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count articles")?;
        Ok(row.get("count"))
    }

    async fn update(&self, id: i64, input: &UpdateArticleInput) -> Result<Article> {
        let result = sqlx::query(
            r#"
            UPDATE articles SET
                slug = COALESCE(?, slug),
                title = COALESCE(?, title),
                content = COALESCE(?, content),
                image = COALESCE(?, image),
                category_id = COALESCE(?, category_id),
                status = COALESCE(?, status),
                published_at = COALESCE(?, published_at),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.slug)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.image)
        .bind(input.category_id)
        .bind(input.status.map(|s| s.as_str()))
        .bind(input.published_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update article")?;

        if result.rows_affected() == 0 {
            bail!("Article {} does not exist", id);
        }

        self.get_by_id(id)
            .await?
            .with_context(|| format!("Article {} vanished during update", id))
    }

    async fn apply_translations(&self, id: i64, patch: &TranslationPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let result = sqlx::query(
            r#"
            UPDATE articles SET
                title_en = COALESCE(?, title_en),
                title_ru = COALESCE(?, title_ru),
                content_en = COALESCE(?, content_en),
                content_ru = COALESCE(?, content_ru),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&patch.title_en)
        .bind(&patch.title_ru)
        .bind(&patch.content_en)
        .bind(&patch.content_ru)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to store translations")?;

        if result.rows_affected() == 0 {
            bail!("Article {} does not exist", id);
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete article")?;
        Ok(())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM articles WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check slug")?;
        Ok(row.get::<i64, _>("count") > 0)
    }

    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM articles WHERE slug = ? AND id <> ?")
            .bind(slug)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check slug")?;
        Ok(row.get::<i64, _>("count") > 0)
    }
}

/// WHERE clause for the published-only read path. The publication gate is
/// always present; the query's filters only narrow it.
fn visible_where(query: &VisibleQuery) -> String {
    let mut clause = String::from("status = 'published'");
    if query.category_id.is_some() {
        clause.push_str(" AND category_id = ?");
    }
    if query.exclude_id.is_some() {
        clause.push_str(" AND id <> ?");
    }
    clause
}

fn row_to_article(row: &SqliteRow) -> Result<Article> {
    let status_raw: String = row.try_get("status")?;
    let status = ArticleStatus::parse(&status_raw)
        .with_context(|| format!("Unknown article status in store: {}", status_raw))?;

    Ok(Article {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        title_en: row.try_get("title_en")?,
        title_ru: row.try_get("title_ru")?,
        content_en: row.try_get("content_en")?,
        content_ru: row.try_get("content_ru")?,
        image: row.try_get("image")?,
        category_id: row.try_get("category_id")?,
        status,
        published_at: row.try_get("published_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
