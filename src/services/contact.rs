//! Contact message service
//!
//! Accepts reader submissions after light validation and lists them for
//! operators, newest first.

use crate::db::repositories::ContactRepository;
use crate::models::{ContactMessage, ListParams, NewContactMessage, PagedResult};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

/// Error types for contact service operations
#[derive(Debug, thiserror::Error)]
pub enum ContactServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Contact message service
pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
}

impl ContactService {
    /// Create a new contact service
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self { repo }
    }

    /// Store a submitted message
    pub async fn submit(
        &self,
        input: NewContactMessage,
    ) -> Result<ContactMessage, ContactServiceError> {
        if input.name.trim().is_empty() {
            return Err(ContactServiceError::ValidationError(
                "Sender name cannot be empty".to_string(),
            ));
        }
        if input.message.trim().is_empty() {
            return Err(ContactServiceError::ValidationError(
                "Message cannot be empty".to_string(),
            ));
        }
        if !is_plausible_email(&input.email) {
            return Err(ContactServiceError::ValidationError(format!(
                "Invalid email address: {}",
                input.email
            )));
        }

        let message = self
            .repo
            .create(&input)
            .await
            .context("Failed to store contact message")?;
        info!(id = message.id, from = %message.email, "contact message received");
        Ok(message)
    }

    /// List stored messages, newest first
    pub async fn list(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<ContactMessage>, ContactServiceError> {
        let items = self
            .repo
            .list(params.offset(), params.limit())
            .await
            .context("Failed to list contact messages")?;
        let total = self
            .repo
            .count()
            .await
            .context("Failed to count contact messages")?;

        Ok(PagedResult::new(items, total, params))
    }
}

/// Minimal email shape check: one `@` with a non-empty local part and a
/// dotted domain, no whitespace.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
