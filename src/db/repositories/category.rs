//! Category repository
//!
//! Database operations for categories. Deleting a category cascades to its
//! articles through the foreign key, so the delete here is a single statement.

use crate::models::{Category, CategoryWithCount};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a category. Fails on a duplicate name, leaving the store unchanged.
    async fn create(&self, name: &str) -> Result<Category>;

    /// Get a category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// Get a category by its unique name
    async fn get_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// List all categories ordered by name
    async fn list(&self) -> Result<Vec<Category>>;

    /// List all categories with their article counts, ordered by name
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>>;

    /// Rename a category
    async fn rename(&self, id: i64, name: &str) -> Result<Category>;

    /// Delete a category; its articles are removed with it
    async fn delete(&self, id: i64) -> Result<()>;

    /// Number of articles referencing the category, any status
    async fn count_articles(&self, id: i64) -> Result<i64>;
}

/// SQLx-based category repository
pub struct SqlxCategoryRepository {
    pool: SqlitePool,
}

impl SqlxCategoryRepository {
    /// Create a new repository on the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn create(&self, name: &str) -> Result<Category> {
        let now = Utc::now();
        let result = sqlx::query("INSERT INTO categories (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(now)
            .execute(&self.pool)
            .await
            .context("Failed to create category")?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, created_at FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get category by ID")?;

        row.as_ref().map(row_to_category).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, created_at FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get category by name")?;

        row.as_ref().map(row_to_category).transpose()
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list categories")?;

        rows.iter().map(row_to_category).collect()
    }

    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name, c.created_at, COUNT(a.id) as article_count
            FROM categories c
            LEFT JOIN articles a ON a.category_id = c.id
            GROUP BY c.id, c.name, c.created_at
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories with counts")?;

        rows.iter()
            .map(|row| {
                Ok(CategoryWithCount {
                    category: row_to_category(row)?,
                    article_count: row.try_get("article_count")?,
                })
            })
            .collect()
    }

    async fn rename(&self, id: i64, name: &str) -> Result<Category> {
        let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to rename category")?;

        if result.rows_affected() == 0 {
            bail!("Category {} does not exist", id);
        }

        self.get_by_id(id)
            .await?
            .with_context(|| format!("Category {} vanished during rename", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete category")?;
        Ok(())
    }

    async fn count_articles(&self, id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM articles WHERE category_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count articles in category")?;
        Ok(row.get("count"))
    }
}

fn row_to_category(row: &SqliteRow) -> Result<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
    })
}
