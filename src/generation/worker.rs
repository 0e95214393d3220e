use async_trait::async_trait;
use image::DynamicImage;
use reqwest::{Client, Response};

use super::{decode_image, DiffusionModel, ModelLoader};
use crate::{
    error::{ForgeError, Result},
    models::{
        PipelineSettings, SdErrorBody, SdModelInfo, SdOptionsRequest, SdTxt2ImgRequest,
        SdTxt2ImgResponse, Txt2ImgParams,
    },
};

/// Drives a Stable Diffusion web UI (AUTOMATIC1111 compatible `/sdapi/v1`)
/// started with `--api`.
#[derive(Clone)]
pub struct WorkerLoader {
    client: Client,
    base_url: String,
}

impl WorkerLoader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn checkpoints(&self) -> Result<Vec<SdModelInfo>> {
        let response = self
            .client
            .get(format!("{}/sdapi/v1/sd-models", self.base_url))
            .send()
            .await
            .map_err(|e| ForgeError::ModelLoad(format!("worker unreachable: {}", e)))?;
        let response = check_status(response, ForgeError::ModelLoad).await?;
        response
            .json()
            .await
            .map_err(|e| ForgeError::ModelLoad(format!("unexpected checkpoint list: {}", e)))
    }
}

/// Turns a non-2xx reply into `wrap(message)`.
async fn check_status(response: Response, wrap: fn(String) -> ForgeError) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<SdErrorBody>(&body)
        .ok()
        .and_then(|b| b.message())
        .unwrap_or_else(|| format!("worker returned {}", status));
    Err(wrap(message))
}

#[async_trait]
impl ModelLoader for WorkerLoader {
    async fn load(&self, settings: &PipelineSettings) -> Result<Box<dyn DiffusionModel>> {
        // Precision and memory savers are launch flags of the web UI
        // (--no-half, --medvram, --opt-split-attention), not API options.
        log::info!(
            "Loading {} (wanted: {}, {}, attention slicing: {}, cpu offload: {})",
            settings.model_id,
            settings.device,
            settings.precision.as_str(),
            settings.attention_slicing,
            settings.cpu_offload
        );

        let available = self.checkpoints().await?;
        let checkpoint = available
            .iter()
            .find(|info| info.matches(&settings.model_id))
            .ok_or_else(|| {
                let names: Vec<&str> = available.iter().map(|i| i.model_name.as_str()).collect();
                ForgeError::ModelLoad(format!(
                    "checkpoint '{}' not found on worker (available: {})",
                    settings.model_id,
                    names.join(", ")
                ))
            })?;

        let response = self
            .client
            .post(format!("{}/sdapi/v1/options", self.base_url))
            .json(&SdOptionsRequest {
                sd_model_checkpoint: &checkpoint.title,
            })
            .send()
            .await
            .map_err(|e| ForgeError::ModelLoad(format!("worker unreachable: {}", e)))?;
        check_status(response, ForgeError::ModelLoad).await?;

        Ok(Box::new(WorkerModel {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            checkpoint: checkpoint.title.clone(),
        }))
    }
}

pub struct WorkerModel {
    client: Client,
    base_url: String,
    checkpoint: String,
}

#[async_trait]
impl DiffusionModel for WorkerModel {
    fn name(&self) -> &str {
        &self.checkpoint
    }

    async fn txt2img(&self, params: &Txt2ImgParams) -> Result<DynamicImage> {
        log::debug!(
            "txt2img {}x{}, {} steps, guidance {}",
            params.width,
            params.height,
            params.num_inference_steps,
            params.guidance_scale
        );

        let response = self
            .client
            .post(format!("{}/sdapi/v1/txt2img", self.base_url))
            .json(&SdTxt2ImgRequest::from(params))
            .send()
            .await?;
        let response = check_status(response, ForgeError::Generation).await?;
        let reply: SdTxt2ImgResponse = serde_json::from_slice(&response.bytes().await?)?;

        let first = reply
            .images
            .first()
            .ok_or_else(|| ForgeError::Generation("No images generated".into()))?;
        decode_image(first)
    }
}
