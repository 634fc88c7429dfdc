//! Category model
//!
//! Categories group articles. A category does not own its articles in memory,
//! but deleting one cascades to every article referencing it in the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity. Identified by a globally unique name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Unique category name
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Category together with the number of articles referencing it.
///
/// Used by navigation-style listings that show categories with counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithCount {
    /// The category itself
    #[serde(flatten)]
    pub category: Category,
    /// Number of articles in the category, any status
    pub article_count: i64,
}
