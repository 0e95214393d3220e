use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::TranslationService;
use crate::{
    config::TranslatorConfig,
    error::{ForgeError, Result},
    models::{DetectRequest, DetectedLanguage, ServiceErrorBody, TranslateRequest, TranslateResponse},
};

/// Client for a LibreTranslate compatible HTTP API.
#[derive(Clone)]
pub struct LibreTranslateClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl LibreTranslateClient {
    pub fn new(config: &TranslatorConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &TranslatorConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ServiceErrorBody>(&body)
                .map(|err| err.error)
                .unwrap_or(body);
            return Err(ForgeError::Translation(format!(
                "service returned {}: {}",
                status, message
            )));
        }

        serde_json::from_str(&body).map_err(|e| ForgeError::Translation(e.to_string()))
    }
}

/// Picks the most confident detection.
pub fn best_detection(candidates: Vec<DetectedLanguage>) -> Option<DetectedLanguage> {
    candidates
        .into_iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
}

#[async_trait]
impl TranslationService for LibreTranslateClient {
    async fn detect(&self, text: &str) -> Result<String> {
        let payload = DetectRequest {
            q: text,
            api_key: self.api_key.as_deref(),
        };

        log::debug!("Detecting language via {}", self.base_url);
        let response = self
            .client
            .post(self.endpoint("detect"))
            .json(&payload)
            .send()
            .await?;

        let candidates: Vec<DetectedLanguage> = Self::read_json(response).await?;
        best_detection(candidates)
            .map(|detected| detected.language)
            .ok_or_else(|| ForgeError::Translation("no language detected".into()))
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let payload = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(self.endpoint("translate"))
            .json(&payload)
            .send()
            .await?;

        let translated: TranslateResponse = Self::read_json(response).await?;
        Ok(translated.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_detection_prefers_highest_confidence() {
        let candidates: Vec<DetectedLanguage> = serde_json::from_str(
            r#"[{"language":"az","confidence":40.0},{"language":"tr","confidence":92.0}]"#,
        )
        .unwrap();
        assert_eq!(best_detection(candidates).unwrap().language, "tr");
        assert!(best_detection(Vec::new()).is_none());
    }

    #[test]
    fn test_translate_payload_shape() {
        let payload = TranslateRequest {
            q: "mavi kedi",
            source: "tr",
            target: "en",
            format: "text",
            api_key: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"q": "mavi kedi", "source": "tr", "target": "en", "format": "text"})
        );
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let config = TranslatorConfig::new().with_base_url("http://localhost:5000/");
        let client = LibreTranslateClient::new(&config);
        assert_eq!(client.endpoint("detect"), "http://localhost:5000/detect");
    }
}
