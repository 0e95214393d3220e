pub mod config;
pub mod error;
pub mod generation;
pub mod logger;
pub mod models;
pub mod output;
pub mod text;
pub mod translate;
pub mod ui;

pub use config::{BackendKind, BedrockConfig, ForgeConfig, TranslatorConfig};
pub use error::{ForgeError, Result};
pub use generation::{DiffusionModel, ImageGenerator, ModelLoader};
pub use models::{
    ComputeDevice, GenerationRequest, PipelineSettings, QualityPreset, TranslationOutcome,
    Txt2ImgParams,
};
pub use output::ImageWriter;
pub use translate::{LanguageTranslator, TranslationService};
pub use ui::{GenerateForm, Outcome, Session};
