//! Newsroom - a multilingual news publishing core
//!
//! This library provides the content core of a news site: a SQLite-backed
//! content store for articles, categories, and contact messages; a
//! published-only, publish-time-ordered read view; and best-effort
//! auto-translation of newly created articles via an external provider.

pub mod config;
pub mod db;
pub mod models;
pub mod services;
