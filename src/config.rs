use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ForgeError, Result};
use crate::models::{ComputeDevice, DEFAULT_OUTPUT_DIR};

pub const DEFAULT_WORKER_URL: &str = "http://127.0.0.1:7860";
/// Checkpoint name of the Stable Diffusion 1.5 weights a fresh web UI install
/// downloads.
pub const DEFAULT_MODEL_ID: &str = "v1-5-pruned-emaonly";
pub const DEFAULT_BEDROCK_MODEL_ID: &str = "stability.stable-diffusion-xl-v1";
pub const DEFAULT_TRANSLATE_URL: &str = "https://libretranslate.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Worker,
    Bedrock,
}

impl BackendKind {
    /// Image size used when the user does not pick one. SDXL on Bedrock only
    /// accepts its fixed resolutions.
    pub fn default_size(&self) -> (u32, u32) {
        match self {
            BackendKind::Worker => (512, 512),
            BackendKind::Bedrock => (1024, 1024),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "worker" | "local" => Ok(BackendKind::Worker),
            "bedrock" => Ok(BackendKind::Bedrock),
            other => Err(ForgeError::Config(format!(
                "unknown backend '{}', expected 'worker' or 'bedrock'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            base_url: DEFAULT_TRANSLATE_URL.to_string(),
            api_key: None,
            source_lang: "tr".to_string(),
            target_lang: "en".to_string(),
        }
    }
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        TranslatorConfig {
            base_url: env::var("IMGFORGE_TRANSLATE_URL").unwrap_or(defaults.base_url),
            api_key: env::var("IMGFORGE_TRANSLATE_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            source_lang: env::var("IMGFORGE_SOURCE_LANG").unwrap_or(defaults.source_lang),
            target_lang: env::var("IMGFORGE_TARGET_LANG").unwrap_or(defaults.target_lang),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_languages(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_lang = source.into();
        self.target_lang = target.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        BedrockConfig {
            region: env::var("AWS_REGION")
                .or_else(|_| env::var("AWS_DEFAULT_REGION"))
                .ok(),
            access_key: env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ForgeConfig {
    pub backend: BackendKind,
    pub worker_url: String,
    pub model_id: Option<String>,
    /// `None` means probe the host.
    pub device: Option<ComputeDevice>,
    pub output_dir: PathBuf,
    pub translator: TranslatorConfig,
    pub bedrock: BedrockConfig,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        ForgeConfig {
            backend: BackendKind::Worker,
            worker_url: DEFAULT_WORKER_URL.to_string(),
            model_id: None,
            device: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            translator: TranslatorConfig::default(),
            bedrock: BedrockConfig::default(),
        }
    }
}

impl ForgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let backend = match env::var("IMGFORGE_BACKEND") {
            Ok(value) => value.parse::<BackendKind>()?,
            Err(_) => BackendKind::Worker,
        };
        let device = match env::var("IMGFORGE_DEVICE") {
            Ok(value) if value.eq_ignore_ascii_case("auto") || value.is_empty() => None,
            Ok(value) => Some(value.parse::<ComputeDevice>().map_err(ForgeError::Config)?),
            Err(_) => None,
        };

        Ok(ForgeConfig {
            backend,
            worker_url: env::var("IMGFORGE_WORKER_URL")
                .unwrap_or_else(|_| DEFAULT_WORKER_URL.to_string()),
            model_id: env::var("IMGFORGE_MODEL_ID").ok().filter(|id| !id.is_empty()),
            device,
            output_dir: env::var("IMGFORGE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            translator: TranslatorConfig::from_env(),
            bedrock: BedrockConfig::from_env(),
        })
    }

    /// Model id in effect for the selected backend.
    pub fn resolved_model_id(&self) -> &str {
        match (&self.model_id, self.backend) {
            (Some(id), _) => id.as_str(),
            (None, BackendKind::Worker) => DEFAULT_MODEL_ID,
            (None, BackendKind::Bedrock) => DEFAULT_BEDROCK_MODEL_ID,
        }
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_worker_url(mut self, url: impl Into<String>) -> Self {
        self.worker_url = url.into();
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_device(mut self, device: ComputeDevice) -> Self {
        self.device = Some(device);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_translator(mut self, config: TranslatorConfig) -> Self {
        self.translator = config;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self
    }
}
