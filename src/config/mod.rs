//! Configuration management
//!
//! Configuration is loaded from a config.yml file; environment variables
//! (prefix `NEWSROOM_`) override file settings, and missing values fall back
//! to defaults.

use serde::{Deserialize, Serialize};

use crate::models::TargetLang;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Translation provider configuration
    #[serde(default)]
    pub translation: TranslationConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/newsroom.db".to_string()
}

/// Translation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Whether new articles are enriched at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Provider endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Source language code, or `auto` for provider-side detection
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    /// Languages whose slots the enricher fills
    #[serde(default = "default_target_langs")]
    pub target_langs: Vec<TargetLang>,
    /// Per-call timeout for provider requests, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            source_lang: default_source_lang(),
            target_langs: default_target_langs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_source_lang() -> String {
    "auto".to_string()
}

fn default_target_langs() -> Vec<TargetLang> {
    vec![TargetLang::En, TargetLang::Ru]
}

fn default_timeout_secs() -> u64 {
    10
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// A missing or empty file yields defaults; a malformed file yields a
    /// parse error with line and column.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;

        Ok(config)
    }

    /// Load configuration from a file with environment variable overrides.
    ///
    /// Recognized variables:
    /// - `NEWSROOM_DATABASE_URL`
    /// - `NEWSROOM_TRANSLATION_ENABLED`
    /// - `NEWSROOM_TRANSLATION_ENDPOINT`
    /// - `NEWSROOM_TRANSLATION_SOURCE_LANG`
    /// - `NEWSROOM_TRANSLATION_TARGET_LANGS` (comma-separated codes)
    /// - `NEWSROOM_TRANSLATION_TIMEOUT_SECS`
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("NEWSROOM_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(enabled) = std::env::var("NEWSROOM_TRANSLATION_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "true" | "1" | "yes" => self.translation.enabled = true,
                "false" | "0" | "no" => self.translation.enabled = false,
                _ => {}
            }
        }
        if let Ok(endpoint) = std::env::var("NEWSROOM_TRANSLATION_ENDPOINT") {
            self.translation.endpoint = endpoint;
        }
        if let Ok(source) = std::env::var("NEWSROOM_TRANSLATION_SOURCE_LANG") {
            self.translation.source_lang = source;
        }
        if let Ok(langs) = std::env::var("NEWSROOM_TRANSLATION_TARGET_LANGS") {
            let parsed: Vec<TargetLang> = langs
                .split(',')
                .filter_map(|code| TargetLang::from_code(code.trim()))
                .collect();
            if !parsed.is_empty() {
                self.translation.target_langs = parsed;
            }
        }
        if let Ok(timeout) = std::env::var("NEWSROOM_TRANSLATION_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                self.translation.timeout_secs = timeout;
            }
        }
    }
}

/// Format a YAML parsing error with location context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        super::CONFIG_ENV_MUTEX
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn clear_env() {
        for key in [
            "NEWSROOM_DATABASE_URL",
            "NEWSROOM_TRANSLATION_ENABLED",
            "NEWSROOM_TRANSLATION_ENDPOINT",
            "NEWSROOM_TRANSLATION_SOURCE_LANG",
            "NEWSROOM_TRANSLATION_TARGET_LANGS",
            "NEWSROOM_TRANSLATION_TIMEOUT_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let config = Config::load(std::path::Path::new("nonexistent_config.yml")).unwrap();
        assert_eq!(config.database.url, "data/newsroom.db");
        assert!(config.translation.enabled);
        assert_eq!(
            config.translation.target_langs,
            vec![TargetLang::En, TargetLang::Ru]
        );
        assert_eq!(config.translation.timeout_secs, 10);
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "   \n").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.database.url, "data/newsroom.db");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "database:\n  url: /tmp/other.db\ntranslation:\n  source_lang: uz\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.database.url, "/tmp/other.db");
        assert_eq!(config.translation.source_lang, "uz");
        // Unspecified fields keep their defaults
        assert!(config.translation.enabled);
        assert_eq!(config.translation.timeout_secs, 10);
    }

    #[test]
    fn test_load_target_langs_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "translation:\n  target_langs: [ru]\n").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.translation.target_langs, vec![TargetLang::Ru]);
    }

    #[test]
    fn test_load_invalid_yaml_reports_location() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "database:\n  url: [unclosed\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_env_overrides() {
        let _guard = lock_env();
        clear_env();

        std::env::set_var("NEWSROOM_DATABASE_URL", "/tmp/env.db");
        std::env::set_var("NEWSROOM_TRANSLATION_ENABLED", "false");
        std::env::set_var("NEWSROOM_TRANSLATION_TARGET_LANGS", "ru, en");
        std::env::set_var("NEWSROOM_TRANSLATION_TIMEOUT_SECS", "3");

        let config =
            Config::load_with_env(std::path::Path::new("nonexistent_config.yml")).unwrap();
        assert_eq!(config.database.url, "/tmp/env.db");
        assert!(!config.translation.enabled);
        assert_eq!(
            config.translation.target_langs,
            vec![TargetLang::Ru, TargetLang::En]
        );
        assert_eq!(config.translation.timeout_secs, 3);

        clear_env();
    }

    #[test]
    fn test_env_invalid_values_ignored() {
        let _guard = lock_env();
        clear_env();

        std::env::set_var("NEWSROOM_TRANSLATION_ENABLED", "maybe");
        std::env::set_var("NEWSROOM_TRANSLATION_TARGET_LANGS", "de,fr");
        std::env::set_var("NEWSROOM_TRANSLATION_TIMEOUT_SECS", "soon");

        let config =
            Config::load_with_env(std::path::Path::new("nonexistent_config.yml")).unwrap();
        assert!(config.translation.enabled);
        assert_eq!(
            config.translation.target_langs,
            vec![TargetLang::En, TargetLang::Ru]
        );
        assert_eq!(config.translation.timeout_secs, 10);

        clear_env();
    }
}
