//! Database layer
//!
//! SQLite-backed storage for the newsroom content store:
//! - `pool` creates and checks connection pools (foreign keys enabled, so
//!   category deletes cascade to articles)
//! - `migrations` applies the embedded schema migrations
//! - `repositories` holds the trait-based data access used by the services

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
