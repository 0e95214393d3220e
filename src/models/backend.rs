use serde::{Deserialize, Serialize};

/// Parameters for one text-to-image call, after translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Txt2ImgParams {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
}

/// Body of `POST /sdapi/v1/txt2img` on a Stable Diffusion web UI worker.
#[derive(Debug, Serialize)]
pub struct SdTxt2ImgRequest<'a> {
    pub prompt: &'a str,
    pub negative_prompt: &'a str,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub cfg_scale: f32,
    pub batch_size: u32,
    pub n_iter: u32,
}

impl<'a> From<&'a Txt2ImgParams> for SdTxt2ImgRequest<'a> {
    fn from(params: &'a Txt2ImgParams) -> Self {
        Self {
            prompt: &params.prompt,
            negative_prompt: &params.negative_prompt,
            width: params.width,
            height: params.height,
            steps: params.num_inference_steps,
            cfg_scale: params.guidance_scale,
            batch_size: 1,
            n_iter: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SdTxt2ImgResponse {
    #[serde(default)]
    pub images: Vec<String>, // Base64 encoded PNG
}

/// Body of `POST /sdapi/v1/options` selecting the active checkpoint.
#[derive(Debug, Serialize)]
pub struct SdOptionsRequest<'a> {
    pub sd_model_checkpoint: &'a str,
}

/// One entry of `GET /sdapi/v1/sd-models`.
#[derive(Debug, Clone, Deserialize)]
pub struct SdModelInfo {
    pub title: String,
    pub model_name: String,
    #[serde(default)]
    pub hash: Option<String>,
}

impl SdModelInfo {
    /// Accepts the checkpoint title, its bare file name or its short hash.
    pub fn matches(&self, id: &str) -> bool {
        self.title == id || self.model_name == id || self.hash.as_deref() == Some(id)
    }
}

/// Error body the web UI returns on 4xx/5xx. Validation errors only carry
/// `detail`, runtime errors fill `error` and `errors`.
#[derive(Debug, Default, Deserialize)]
pub struct SdErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<String>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl SdErrorBody {
    pub fn message(&self) -> Option<String> {
        let detail = match &self.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(serde_json::Value::String(_)) => None,
            Some(other) => Some(other.to_string()),
        };
        self.errors
            .clone()
            .filter(|s| !s.is_empty())
            .or(detail)
            .or_else(|| self.error.clone())
    }
}

#[derive(Deserialize)]
pub struct StabilityImageResponse {
    pub artifacts: Vec<StabilityArtifact>,
}

#[derive(Deserialize)]
pub struct StabilityArtifact {
    pub base64: String,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt2img_body_uses_webui_names() {
        let params = Txt2ImgParams {
            prompt: "a red fox".into(),
            negative_prompt: "blurry".into(),
            width: 512,
            height: 768,
            num_inference_steps: 20,
            guidance_scale: 7.5,
        };
        let value = serde_json::to_value(SdTxt2ImgRequest::from(&params)).unwrap();
        assert_eq!(value["steps"], 20);
        assert_eq!(value["cfg_scale"], 7.5);
        assert_eq!(value["height"], 768);
        assert_eq!(value["batch_size"], 1);
        assert!(value.get("num_inference_steps").is_none());
    }

    #[test]
    fn test_error_body_prefers_runtime_message() {
        let body: SdErrorBody = serde_json::from_str(
            r#"{"error":"RuntimeError","detail":"","body":"","errors":"model 'x' not found"}"#,
        )
        .unwrap();
        assert_eq!(body.message().as_deref(), Some("model 'x' not found"));

        let body: SdErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","steps"],"msg":"value is not a valid integer"}]}"#)
                .unwrap();
        assert!(body.message().unwrap().contains("not a valid integer"));
    }

    #[test]
    fn test_model_info_matches_title_name_or_hash() {
        let info: SdModelInfo = serde_json::from_str(
            r#"{"title":"v1-5-pruned-emaonly.safetensors [6ce0161689]","model_name":"v1-5-pruned-emaonly","hash":"6ce0161689","filename":"/models/v1-5-pruned-emaonly.safetensors","config":null}"#,
        )
        .unwrap();
        assert!(info.matches("v1-5-pruned-emaonly"));
        assert!(info.matches("6ce0161689"));
        assert!(info.matches("v1-5-pruned-emaonly.safetensors [6ce0161689]"));
        assert!(!info.matches("sd_xl_base_1.0"));
    }
}
