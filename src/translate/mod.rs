pub mod libretranslate;

use async_trait::async_trait;

pub use libretranslate::LibreTranslateClient;

use crate::{config::TranslatorConfig, error::Result, models::TranslationOutcome, text};

/// Language detection and translation backend.
#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn detect(&self, text: &str) -> Result<String>;
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Turns Turkish prompts into English ones. Never fails: on any service
/// error the original text is kept.
pub struct LanguageTranslator {
    service: Box<dyn TranslationService>,
    source_lang: String,
    target_lang: String,
}

impl LanguageTranslator {
    pub fn new(service: Box<dyn TranslationService>, config: &TranslatorConfig) -> Self {
        Self {
            service,
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
        }
    }

    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self::new(Box::new(LibreTranslateClient::new(config)), config)
    }

    pub async fn translate(&self, text: &str) -> TranslationOutcome {
        let detected = match self.service.detect(text).await {
            Ok(language) => language,
            Err(e) => {
                log::warn!("Language detection failed: {}, using original text", e);
                return TranslationOutcome::untouched(text, None);
            }
        };

        if detected != self.source_lang {
            log::debug!("Detected '{}', no translation needed", detected);
            return TranslationOutcome::untouched(text, Some(detected));
        }

        let prepared = text::replace_turkish_chars(text);
        match self
            .service
            .translate(&prepared, &self.source_lang, &self.target_lang)
            .await
        {
            Ok(translated) => {
                log::info!("Translation: '{}' -> '{}'", prepared, translated);
                TranslationOutcome {
                    original: text.to_string(),
                    detected_language: Some(detected),
                    translated,
                }
            }
            Err(e) => {
                log::warn!("Translation failed: {}, using original text", e);
                TranslationOutcome::untouched(text, Some(detected))
            }
        }
    }

    pub async fn translate_to_english(&self, text: &str) -> String {
        self.translate(text).await.translated
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ForgeError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted service that counts calls.
    pub(crate) struct FakeTranslation {
        pub detected: Option<&'static str>,
        pub translated: Option<&'static str>,
        pub calls: Arc<AtomicUsize>,
        pub seen: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl FakeTranslation {
        pub(crate) fn new(detected: Option<&'static str>, translated: Option<&'static str>) -> Self {
            Self {
                detected,
                translated,
                calls: Arc::new(AtomicUsize::new(0)),
                seen: Arc::new(std::sync::Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl TranslationService for FakeTranslation {
        async fn detect(&self, _text: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.detected
                .map(String::from)
                .ok_or_else(|| ForgeError::Translation("connection refused".into()))
        }

        async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(text.to_string());
            self.translated
                .map(String::from)
                .ok_or_else(|| ForgeError::Translation("503 Service Unavailable".into()))
        }
    }

    fn translator(service: FakeTranslation) -> LanguageTranslator {
        LanguageTranslator::new(Box::new(service), &TranslatorConfig::new())
    }

    #[tokio::test]
    async fn test_turkish_prompt_is_translated_after_char_mapping() {
        let service = FakeTranslation::new(Some("tr"), Some("a cat flying in the blue sky"));
        let seen = service.seen.clone();
        let outcome = translator(service).translate("mavi gökyüzünde uçan kedi").await;

        assert_eq!(outcome.translated, "a cat flying in the blue sky");
        assert_eq!(outcome.original, "mavi gökyüzünde uçan kedi");
        assert_eq!(outcome.detected_language.as_deref(), Some("tr"));
        assert!(outcome.was_translated());
        assert_eq!(seen.lock().unwrap().as_slice(), ["mavi gokyuzunde ucan kedi"]);
    }

    #[tokio::test]
    async fn test_english_prompt_is_left_alone() {
        let service = FakeTranslation::new(Some("en"), Some("unused"));
        let calls = service.calls.clone();
        let text = translator(service).translate_to_english("neon city").await;

        assert_eq!(text, "neon city");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreachable_service_returns_input_unchanged() {
        let service = FakeTranslation::new(None, None);
        let calls = service.calls.clone();
        let outcome = translator(service).translate("kar yağan dağ").await;

        assert_eq!(outcome.translated, "kar yağan dağ");
        assert!(outcome.detected_language.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_translation_failure_keeps_original_text() {
        let service = FakeTranslation::new(Some("tr"), None);
        let calls = service.calls.clone();
        let text = translator(service).translate_to_english("uzayda kediler").await;

        assert_eq!(text, "uzayda kediler");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_real_client_against_closed_port_falls_back() {
        let config = TranslatorConfig::new().with_base_url("http://127.0.0.1:9");
        let text = LanguageTranslator::from_config(&config)
            .translate_to_english("gün batımı")
            .await;
        assert_eq!(text, "gün batımı");
    }
}
