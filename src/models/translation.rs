use serde::{Deserialize, Serialize};

/// Result of one translation attempt. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub original: String,
    pub detected_language: Option<String>,
    pub translated: String,
}

impl TranslationOutcome {
    pub fn untouched(text: &str, detected_language: Option<String>) -> Self {
        Self {
            original: text.to_string(),
            detected_language,
            translated: text.to_string(),
        }
    }

    pub fn was_translated(&self) -> bool {
        self.original != self.translated
    }
}

#[derive(Debug, Serialize)]
pub struct DetectRequest<'a> {
    pub q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct DetectedLanguage {
    pub language: String,
    #[serde(default)]
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct TranslateRequest<'a> {
    pub q: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}
