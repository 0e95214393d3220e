use async_trait::async_trait;
use aws_sdk_bedrockruntime::{primitives::Blob, Client};
use image::DynamicImage;
use serde_json::json;

use super::{decode_image, DiffusionModel, ModelLoader};
use crate::{
    config::BedrockConfig,
    error::{ForgeError, Result},
    models::{PipelineSettings, StabilityImageResponse, Txt2ImgParams},
};

/// Stable Diffusion hosted on AWS Bedrock. Device settings do not apply.
#[derive(Clone)]
pub struct BedrockLoader {
    config: BedrockConfig,
}

impl BedrockLoader {
    pub fn new(config: BedrockConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ModelLoader for BedrockLoader {
    async fn load(&self, settings: &PipelineSettings) -> Result<Box<dyn DiffusionModel>> {
        let region = aws_sdk_bedrockruntime::config::Region::new(
            self.config
                .region
                .clone()
                .unwrap_or_else(|| "us-east-1".to_string()),
        );
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

        if let (Some(access_key), Some(secret_key)) =
            (&self.config.access_key, &self.config.secret_key)
        {
            loader = loader.credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "imgforge",
            ));
        } else {
            log::warn!("No AWS credentials configured, using the default credential chain");
        }

        let aws_config = loader.load().await;
        log::info!("Using Bedrock model {} (remote inference)", settings.model_id);

        Ok(Box::new(BedrockModel {
            client: Client::new(&aws_config),
            model_id: settings.model_id.clone(),
        }))
    }
}

pub struct BedrockModel {
    client: Client,
    model_id: String,
}

/// Width x height pairs SDXL 1.0 on Bedrock accepts.
pub const SDXL_DIMENSIONS: [(u32, u32); 9] = [
    (1024, 1024),
    (1152, 896),
    (1216, 832),
    (1344, 768),
    (1536, 640),
    (640, 1536),
    (768, 1344),
    (832, 1216),
    (896, 1152),
];

pub fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if SDXL_DIMENSIONS.contains(&(width, height)) {
        return Ok(());
    }
    let allowed: Vec<String> = SDXL_DIMENSIONS
        .iter()
        .map(|(w, h)| format!("{}x{}", w, h))
        .collect();
    Err(ForgeError::Generation(format!(
        "{}x{} is not supported by Bedrock SDXL, use one of {}",
        width,
        height,
        allowed.join(", ")
    )))
}

pub fn stability_payload(params: &Txt2ImgParams) -> serde_json::Value {
    let mut text_prompts = vec![json!({ "text": params.prompt, "weight": 1.0 })];
    if !params.negative_prompt.trim().is_empty() {
        text_prompts.push(json!({ "text": params.negative_prompt, "weight": -1.0 }));
    }

    json!({
        "text_prompts": text_prompts,
        "cfg_scale": params.guidance_scale,
        "steps": params.num_inference_steps,
        "width": params.width,
        "height": params.height,
        "samples": 1
    })
}

#[async_trait]
impl DiffusionModel for BedrockModel {
    fn name(&self) -> &str {
        &self.model_id
    }

    async fn txt2img(&self, params: &Txt2ImgParams) -> Result<DynamicImage> {
        check_dimensions(params.width, params.height)?;
        let request_json = serde_json::to_string(&stability_payload(params))?;

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| ForgeError::Aws(e.to_string()))?;

        let response_bytes = response.body.into_inner();
        let stability: StabilityImageResponse = serde_json::from_slice(&response_bytes)?;

        let artifact = stability
            .artifacts
            .first()
            .ok_or_else(|| ForgeError::Generation("No images generated".into()))?;

        if let Some(reason) = artifact.finish_reason.as_deref() {
            if reason != "SUCCESS" {
                return Err(ForgeError::Generation(format!(
                    "Bedrock finished with {}",
                    reason
                )));
            }
        }

        decode_image(&artifact.base64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;
    use aws_sdk_bedrockruntime::config::{BehaviorVersion, Region};

    fn params(negative: &str) -> Txt2ImgParams {
        Txt2ImgParams {
            prompt: "a lighthouse at dusk".to_string(),
            negative_prompt: negative.to_string(),
            width: 1024,
            height: 1024,
            num_inference_steps: 30,
            guidance_scale: 9.0,
        }
    }

    #[test]
    fn test_stability_payload_weights_negative_prompt() {
        let payload = stability_payload(&params("blurry"));
        assert_eq!(payload["text_prompts"][0]["weight"], 1.0);
        assert_eq!(payload["text_prompts"][1]["text"], "blurry");
        assert_eq!(payload["text_prompts"][1]["weight"], -1.0);
        assert_eq!(payload["steps"], 30);
        assert_eq!(payload["cfg_scale"], 9.0);
    }

    #[test]
    fn test_stability_payload_skips_empty_negative_prompt() {
        let payload = stability_payload(&params("  "));
        assert_eq!(payload["text_prompts"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_check_dimensions() {
        let (width, height) = BackendKind::Bedrock.default_size();
        assert!(check_dimensions(width, height).is_ok());
        assert!(check_dimensions(896, 1152).is_ok());
        assert!(matches!(check_dimensions(512, 512), Err(ForgeError::Generation(_))));
        assert!(check_dimensions(1152, 1152).is_err());
    }

    #[tokio::test]
    async fn test_unsupported_size_fails_before_invoking() {
        let config = aws_sdk_bedrockruntime::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let model = BedrockModel {
            client: Client::from_conf(config),
            model_id: "stability.stable-diffusion-xl-v1".to_string(),
        };

        let mut request = params("blurry");
        request.width = 512;
        request.height = 512;
        match model.txt2img(&request).await {
            Err(ForgeError::Generation(message)) => assert!(message.contains("512x512")),
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }
}
