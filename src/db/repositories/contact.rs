//! Contact message repository
//!
//! Write-once storage for reader submissions; reads come back newest first.

use crate::models::{ContactMessage, NewContactMessage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;

/// Contact message repository trait
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Store a new contact message
    async fn create(&self, input: &NewContactMessage) -> Result<ContactMessage>;

    /// List messages, newest first
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<ContactMessage>>;

    /// Count all messages
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based contact message repository
pub struct SqlxContactRepository {
    pool: SqlitePool,
}

impl SqlxContactRepository {
    /// Create a new repository on the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn ContactRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn create(&self, input: &NewContactMessage) -> Result<ContactMessage> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO contact_messages (name, email, message, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.message)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to store contact message")?;

        Ok(ContactMessage {
            id: result.last_insert_rowid(),
            name: input.name.clone(),
            email: input.email.clone(),
            message: input.message.clone(),
            created_at: now,
        })
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<ContactMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, message, created_at
            FROM contact_messages
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list contact messages")?;

        rows.iter().map(row_to_message).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM contact_messages")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count contact messages")?;
        Ok(row.get("count"))
    }
}

fn row_to_message(row: &SqliteRow) -> Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        message: row.try_get("message")?,
        created_at: row.try_get("created_at")?,
    })
}
