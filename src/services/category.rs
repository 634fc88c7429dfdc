//! Category service
//!
//! Business logic for categories: creation with name uniqueness, renames,
//! listings, and deletion. Deleting a category takes its articles with it.

use crate::db::repositories::CategoryRepository;
use crate::models::{Category, CategoryWithCount};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Category not found
    #[error("Category not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Duplicate name
    #[error("Category name already exists: {0}")]
    DuplicateName(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Category service
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    /// Create a new category service
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// Create a category. The name is trimmed and must be unique.
    pub async fn create(&self, name: &str) -> Result<Category, CategoryServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryServiceError::ValidationError(
                "Category name cannot be empty".to_string(),
            ));
        }

        if self
            .repo
            .get_by_name(name)
            .await
            .context("Failed to check category name")?
            .is_some()
        {
            return Err(CategoryServiceError::DuplicateName(name.to_string()));
        }

        let category = self
            .repo
            .create(name)
            .await
            .context("Failed to create category")?;
        info!(id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Get a category by ID
    pub async fn get(&self, id: i64) -> Result<Category, CategoryServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?
            .ok_or_else(|| CategoryServiceError::NotFound(format!("id {}", id)))
    }

    /// List all categories, name-ordered
    pub async fn list(&self) -> Result<Vec<Category>, CategoryServiceError> {
        Ok(self.repo.list().await.context("Failed to list categories")?)
    }

    /// List all categories with their article counts
    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, CategoryServiceError> {
        Ok(self
            .repo
            .list_with_counts()
            .await
            .context("Failed to list categories with counts")?)
    }

    /// Rename a category; the new name must be unique too
    pub async fn rename(&self, id: i64, name: &str) -> Result<Category, CategoryServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryServiceError::ValidationError(
                "Category name cannot be empty".to_string(),
            ));
        }

        self.get(id).await?;

        if let Some(existing) = self
            .repo
            .get_by_name(name)
            .await
            .context("Failed to check category name")?
        {
            if existing.id != id {
                return Err(CategoryServiceError::DuplicateName(name.to_string()));
            }
        }

        Ok(self
            .repo
            .rename(id, name)
            .await
            .context("Failed to rename category")?)
    }

    /// Delete a category. Every article referencing it is removed as well.
    pub async fn delete(&self, id: i64) -> Result<(), CategoryServiceError> {
        let category = self.get(id).await?;
        let articles = self
            .repo
            .count_articles(id)
            .await
            .context("Failed to count articles")?;

        self.repo
            .delete(id)
            .await
            .context("Failed to delete category")?;
        info!(id, name = %category.name, articles, "category deleted with its articles");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{ArticleRepository, SqlxArticleRepository, SqlxCategoryRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::CreateArticleInput;

    async fn setup() -> (CategoryService, Arc<dyn ArticleRepository>) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let service = CategoryService::new(SqlxCategoryRepository::boxed(pool.clone()));
        (service, SqlxArticleRepository::boxed(pool))
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let (service, _articles) = setup().await;

        let category = service.create("  Culture  ").await.expect("create");
        assert_eq!(category.name, "Culture");
    }

    #[tokio::test]
    async fn test_create_empty_name_fails() {
        let (service, _articles) = setup().await;

        assert!(matches!(
            service.create("   ").await,
            Err(CategoryServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_duplicate_name_fails() {
        let (service, _articles) = setup().await;

        service.create("Economy").await.expect("create");
        assert!(matches!(
            service.create("Economy").await,
            Err(CategoryServiceError::DuplicateName(_))
        ));
    }

    #[tokio::test]
    async fn test_get_missing_category() {
        let (service, _articles) = setup().await;

        assert!(matches!(
            service.get(404).await,
            Err(CategoryServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_rejects_taken_name() {
        let (service, _articles) = setup().await;

        service.create("Politics").await.expect("create");
        let sport = service.create("Sport").await.expect("create");

        assert!(matches!(
            service.rename(sport.id, "Politics").await,
            Err(CategoryServiceError::DuplicateName(_))
        ));

        // Renaming to its own name is a no-op, not a conflict
        let renamed = service.rename(sport.id, "Sport").await.expect("rename");
        assert_eq!(renamed.name, "Sport");
    }

    #[tokio::test]
    async fn test_delete_cascades_to_articles() {
        let (service, articles) = setup().await;

        let category = service.create("Doomed").await.expect("create");
        articles
            .create(&CreateArticleInput::new(
                "goes-too".to_string(),
                "Goes too".to_string(),
                "Body".to_string(),
                category.id,
            ))
            .await
            .expect("create article");

        service.delete(category.id).await.expect("delete");

        assert!(matches!(
            service.get(category.id).await,
            Err(CategoryServiceError::NotFound(_))
        ));
        assert_eq!(articles.count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_list_with_counts() {
        let (service, articles) = setup().await;

        let culture = service.create("Culture").await.expect("create");
        service.create("Empty").await.expect("create");
        articles
            .create(&CreateArticleInput::new(
                "exhibit".to_string(),
                "Exhibit".to_string(),
                "Body".to_string(),
                culture.id,
            ))
            .await
            .expect("create article");

        let listed = service.list_with_counts().await.expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].category.name, "Culture");
        assert_eq!(listed[0].article_count, 1);
        assert_eq!(listed[1].article_count, 0);
    }
}
