//! Contact message model
//!
//! Reader-submitted messages. Write-once: a message is created with its
//! timestamp and never transitions afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored contact message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    /// Unique identifier
    pub id: i64,
    /// Sender name
    pub name: String,
    /// Sender email address
    pub email: String,
    /// Free-text message body
    pub message: String,
    /// Submission timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for submitting a contact message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContactMessage {
    /// Sender name
    pub name: String,
    /// Sender email address
    pub email: String,
    /// Free-text message body
    pub message: String,
}

impl NewContactMessage {
    /// Create a new contact message input
    pub fn new(name: String, email: String, message: String) -> Self {
        Self { name, email, message }
    }
}
