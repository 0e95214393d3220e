#[cfg(feature = "bedrock")]
pub mod bedrock;
pub mod device;
pub mod traits;
pub mod worker;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Local};
use image::DynamicImage;
use std::path::PathBuf;
use tokio::sync::OnceCell;

#[cfg(feature = "bedrock")]
pub use bedrock::BedrockLoader;
pub use traits::{DiffusionModel, ModelLoader};
pub use worker::WorkerLoader;

use crate::{
    config::{BackendKind, ForgeConfig},
    error::{ForgeError, Result},
    logger,
    models::{ComputeDevice, GenerationRequest, PipelineSettings, Txt2ImgParams},
    output::ImageWriter,
    translate::LanguageTranslator,
};

/// Decodes a base64 encoded bitmap returned by a backend.
pub fn decode_image(encoded: &str) -> Result<DynamicImage> {
    let bytes = STANDARD.decode(encoded.trim())?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Source of the timestamps that go into output file names.
pub type Clock = Box<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Text-to-image front door. The model is loaded on first use and kept for
/// the lifetime of the generator.
pub struct ImageGenerator {
    model_id: String,
    device: ComputeDevice,
    loader: Box<dyn ModelLoader>,
    model: OnceCell<Box<dyn DiffusionModel>>,
    translator: LanguageTranslator,
    clock: Clock,
}

impl ImageGenerator {
    pub fn new(
        model_id: impl Into<String>,
        device: ComputeDevice,
        loader: Box<dyn ModelLoader>,
        translator: LanguageTranslator,
    ) -> Self {
        log::info!("Device: {}", device);
        Self {
            model_id: model_id.into(),
            device,
            loader,
            model: OnceCell::new(),
            translator,
            clock: Box::new(Local::now),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn from_config(config: &ForgeConfig) -> Result<Self> {
        let loader: Box<dyn ModelLoader> = match config.backend {
            BackendKind::Worker => Box::new(WorkerLoader::new(config.worker_url.clone())),
            #[cfg(feature = "bedrock")]
            BackendKind::Bedrock => Box::new(BedrockLoader::new(config.bedrock.clone())),
            #[cfg(not(feature = "bedrock"))]
            BackendKind::Bedrock => {
                return Err(ForgeError::Config(
                    "built without the `bedrock` feature".into(),
                ))
            }
        };

        Ok(Self::new(
            config.resolved_model_id(),
            device::select_device(config.device),
            loader,
            LanguageTranslator::from_config(&config.translator),
        ))
    }

    pub fn device(&self) -> ComputeDevice {
        self.device
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings::for_device(self.model_id.clone(), self.device)
    }

    /// Loads the model if needed. Load failures propagate.
    pub async fn load_model(&self) -> Result<&dyn DiffusionModel> {
        let model = self
            .model
            .get_or_try_init(|| async move {
                let _timer = logger::timer("model load");
                log::info!("Loading model {}...", self.model_id);
                match self.loader.load(&self.pipeline_settings()).await {
                    Ok(model) => {
                        log::info!("Model loaded: {}", model.name());
                        Ok(model)
                    }
                    Err(e) => {
                        log::error!("Model load failed: {}", e);
                        Err(e)
                    }
                }
            })
            .await?;
        Ok(&**model)
    }

    /// Generates and stores one image. `Ok(None)` means this image failed
    /// and the error was logged; `Err` only comes from model loading.
    pub async fn generate_image(&self, request: &GenerationRequest) -> Result<Option<PathBuf>> {
        let model = self.load_model().await?;

        match self.render(model, request).await {
            Ok(path) => Ok(Some(path)),
            Err(e) => {
                log::error!("Image generation failed: {}", e);
                Ok(None)
            }
        }
    }

    /// Runs `count` sequential attempts and keeps the successful paths in
    /// attempt order.
    pub async fn generate_multiple_images(
        &self,
        request: &GenerationRequest,
        count: usize,
    ) -> Result<Vec<PathBuf>> {
        let mut results = Vec::with_capacity(count);
        for i in 0..count {
            log::info!("Generating image {}/{}...", i + 1, count);
            if let Some(path) = self.generate_image(request).await? {
                results.push(path);
            }
        }
        Ok(results)
    }

    async fn render(
        &self,
        model: &dyn DiffusionModel,
        request: &GenerationRequest,
    ) -> Result<PathBuf> {
        request.validate()?;

        let prompt = if request.auto_translate {
            self.translator.translate_to_english(&request.prompt).await
        } else {
            request.prompt.clone()
        };
        log::info!("Generating image: '{}'", prompt);

        let params = Txt2ImgParams {
            prompt,
            negative_prompt: request.negative_prompt.clone(),
            width: request.width,
            height: request.height,
            num_inference_steps: request.num_inference_steps,
            guidance_scale: request.guidance_scale,
        };

        let image = {
            let _timer = logger::timer("inference");
            model.txt2img(&params).await?
        };

        if image.width() == 0 || image.height() == 0 {
            return Err(ForgeError::Generation("backend returned an empty bitmap".into()));
        }

        // The file keeps the user's wording, not the translation.
        ImageWriter::new(&request.output_dir).save_at(&image, &request.prompt, &(self.clock)())
    }
}
