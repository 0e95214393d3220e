use crate::{
    error::Result,
    models::{PipelineSettings, Txt2ImgParams},
};
use async_trait::async_trait;
use image::DynamicImage;

/// A loaded text-to-image pipeline.
#[async_trait]
pub trait DiffusionModel: Send + Sync {
    fn name(&self) -> &str;

    async fn txt2img(&self, params: &Txt2ImgParams) -> Result<DynamicImage>;
}

/// Builds a pipeline. Called at most once per generator.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, settings: &PipelineSettings) -> Result<Box<dyn DiffusionModel>>;
}
