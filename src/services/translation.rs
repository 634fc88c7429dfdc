//! Translation provider and enrichment
//!
//! Implements:
//! - `Translator`, the seam to the external translation capability
//! - `GoogleTranslator`, an HTTP client for the public Google endpoint
//! - `fill_missing_translations`, the fill logic run once per new article
//!
//! Provider failures are contained here: a failed sub-task is logged and its
//! slot stays empty, nothing propagates to the caller that created the
//! article.

use crate::config::TranslationConfig;
use crate::models::{Article, TranslatableField, TranslationPatch};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, warn};

/// External translation capability.
///
/// Any failure reads uniformly as "no result for this sub-task".
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_lang` into `target_lang`
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str)
        -> Result<String>;
}

/// Translation client for the public Google endpoint.
///
/// Sends a `client=gtx` request and reassembles the translated text from the
/// segmented JSON payload.
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    /// Build a client from configuration; the per-call timeout comes from
    /// `translation.timeout_secs`.
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build translation HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .context("Failed to send translation request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            bail!("Translation provider error ({}): {}", status, body);
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse translation response")?;

        // The payload nests segments as [[[translated, original, ...], ...], ...]
        let translated: String = payload
            .get(0)
            .and_then(|segments| segments.as_array())
            .map(|segments| {
                segments
                    .iter()
                    .filter_map(|segment| segment.get(0).and_then(|s| s.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        if translated.trim().is_empty() {
            bail!("Translation provider returned an empty result");
        }

        Ok(translated)
    }
}

/// Fill every empty localized slot of `article` from the provider.
///
/// One sub-task per configured target language and translatable field.
/// Already-filled slots are skipped without a provider call, failed sub-tasks
/// are logged and leave their slot empty, and the surviving results come back
/// as a single patch for one follow-up write. The sub-tasks run concurrently;
/// the patch is only assembled after all of them have settled.
pub async fn fill_missing_translations(
    article: &Article,
    translator: &dyn Translator,
    config: &TranslationConfig,
) -> TranslationPatch {
    let mut pending = Vec::new();
    for lang in &config.target_langs {
        for field in [TranslatableField::Title, TranslatableField::Content] {
            if article.has_localized(field, *lang) {
                debug!(
                    slug = %article.slug,
                    field = field.as_str(),
                    lang = lang.code(),
                    "slot already filled, skipping"
                );
                continue;
            }
            pending.push((field, *lang));
        }
    }

    let source_lang = config.source_lang.as_str();
    let sub_tasks: Vec<_> = pending
        .into_iter()
        .map(|(field, lang)| {
            let text = field.base_text(article);
            async move {
                match translator.translate(text, source_lang, lang.code()).await {
                    Ok(translated) => Some((field, lang, translated)),
                    Err(error) => {
                        warn!(
                            slug = %article.slug,
                            field = field.as_str(),
                            lang = lang.code(),
                            %error,
                            "translation sub-task failed"
                        );
                        None
                    }
                }
            }
        })
        .collect();

    let mut patch = TranslationPatch::default();
    for (field, lang, translated) in join_all(sub_tasks).await.into_iter().flatten() {
        patch.set(field, lang, translated);
    }
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleStatus, TargetLang};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article(slug: &str) -> Article {
        let now = Utc::now();
        Article {
            id: 1,
            slug: slug.to_string(),
            title: "Yangi maqola".to_string(),
            content: "Maqola matni".to_string(),
            title_en: None,
            title_ru: None,
            content_en: None,
            content_ru: None,
            image: None,
            category_id: 1,
            status: ArticleStatus::Draft,
            published_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn config() -> TranslationConfig {
        TranslationConfig::default()
    }

    /// Translator that answers from a fixed rule and counts its calls.
    struct MockTranslator {
        calls: AtomicUsize,
        /// (text, target_lang) pairs that fail
        failures: Vec<(String, String)>,
    }

    impl MockTranslator {
        fn succeeding() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures: Vec::new(),
            }
        }

        fn failing_on(text: &str, target_lang: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures: vec![(text.to_string(), target_lang.to_string())],
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Translator for MockTranslator {
        async fn translate(
            &self,
            text: &str,
            _source_lang: &str,
            target_lang: &str,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self
                .failures
                .iter()
                .any(|(t, l)| t == text && l == target_lang)
            {
                bail!("provider unavailable");
            }
            Ok(format!("{} [{}]", text, target_lang))
        }
    }

    // ========================================================================
    // fill_missing_translations
    // ========================================================================

    #[tokio::test]
    async fn test_fill_all_slots() {
        let article = article("fresh");
        let translator = MockTranslator::succeeding();

        let patch = fill_missing_translations(&article, &translator, &config()).await;

        assert_eq!(patch.filled_count(), 4);
        assert_eq!(translator.call_count(), 4);
        assert_eq!(patch.title_en.as_deref(), Some("Yangi maqola [en]"));
        assert_eq!(patch.content_ru.as_deref(), Some("Maqola matni [ru]"));
    }

    #[tokio::test]
    async fn test_fill_is_idempotent_on_filled_record() {
        let mut article = article("done");
        article.title_en = Some("t en".to_string());
        article.title_ru = Some("t ru".to_string());
        article.content_en = Some("c en".to_string());
        article.content_ru = Some("c ru".to_string());
        let translator = MockTranslator::succeeding();

        let patch = fill_missing_translations(&article, &translator, &config()).await;

        assert!(patch.is_empty());
        assert_eq!(translator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fill_skips_only_filled_slots() {
        let mut article = article("half");
        article.title_en = Some("already".to_string());
        let translator = MockTranslator::succeeding();

        let patch = fill_missing_translations(&article, &translator, &config()).await;

        assert_eq!(patch.filled_count(), 3);
        assert!(patch.title_en.is_none());
        assert_eq!(translator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_blank_slot_is_refilled() {
        let mut article = article("blank");
        article.title_en = Some("  ".to_string());
        let translator = MockTranslator::succeeding();

        let patch = fill_missing_translations(&article, &translator, &config()).await;

        assert_eq!(patch.filled_count(), 4);
        assert_eq!(patch.title_en.as_deref(), Some("Yangi maqola [en]"));
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_the_others() {
        let article = article("partial");
        let translator = MockTranslator::failing_on("Yangi maqola", "ru");

        let patch = fill_missing_translations(&article, &translator, &config()).await;

        assert_eq!(translator.call_count(), 4);
        assert_eq!(patch.filled_count(), 3);
        assert!(patch.title_ru.is_none());
        assert!(patch.title_en.is_some());
        assert!(patch.content_ru.is_some());
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_patch() {
        let article = article("down");
        let translator = MockTranslator {
            calls: AtomicUsize::new(0),
            failures: vec![
                ("Yangi maqola".to_string(), "en".to_string()),
                ("Yangi maqola".to_string(), "ru".to_string()),
                ("Maqola matni".to_string(), "en".to_string()),
                ("Maqola matni".to_string(), "ru".to_string()),
            ],
        };

        let patch = fill_missing_translations(&article, &translator, &config()).await;

        assert_eq!(translator.call_count(), 4);
        assert!(patch.is_empty());
    }

    #[tokio::test]
    async fn test_configured_target_langs_limit_sub_tasks() {
        let article = article("ru-only");
        let translator = MockTranslator::succeeding();
        let config = TranslationConfig {
            target_langs: vec![TargetLang::Ru],
            ..TranslationConfig::default()
        };

        let patch = fill_missing_translations(&article, &translator, &config).await;

        assert_eq!(translator.call_count(), 2);
        assert_eq!(patch.filled_count(), 2);
        assert!(patch.title_en.is_none());
        assert!(patch.content_en.is_none());
    }

    // ========================================================================
    // GoogleTranslator
    // ========================================================================

    fn google_config(endpoint: String) -> TranslationConfig {
        TranslationConfig {
            endpoint,
            ..TranslationConfig::default()
        }
    }

    #[tokio::test]
    async fn test_google_translate_reassembles_segments() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            [
                ["Привет, ", "Salom, ", null],
                ["мир", "dunyo", null]
            ],
            null,
            "uz"
        ]);

        Mock::given(method("GET"))
            .and(path("/translate"))
            .and(query_param("client", "gtx"))
            .and(query_param("sl", "auto"))
            .and(query_param("tl", "ru"))
            .and(query_param("q", "Salom, dunyo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let translator =
            GoogleTranslator::new(&google_config(format!("{}/translate", server.uri())))
                .expect("Failed to build client");

        let result = translator
            .translate("Salom, dunyo", "auto", "ru")
            .await
            .expect("Should succeed");
        assert_eq!(result, "Привет, мир");
    }

    #[tokio::test]
    async fn test_google_translate_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let translator =
            GoogleTranslator::new(&google_config(format!("{}/translate", server.uri())))
                .expect("Failed to build client");

        let result = translator.translate("matn", "auto", "en").await;
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("500"), "unexpected error: {}", message);
    }

    #[tokio::test]
    async fn test_google_translate_empty_payload_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([[], null])))
            .mount(&server)
            .await;

        let translator =
            GoogleTranslator::new(&google_config(format!("{}/translate", server.uri())))
                .expect("Failed to build client");

        let result = translator.translate("matn", "auto", "en").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty result"));
    }

    #[tokio::test]
    async fn test_google_translate_malformed_payload_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
            .mount(&server)
            .await;

        let translator =
            GoogleTranslator::new(&google_config(format!("{}/translate", server.uri())))
                .expect("Failed to build client");

        let result = translator.translate("matn", "auto", "en").await;
        assert!(result.is_err());
    }
}
