use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ForgeError, Result};

pub const DEFAULT_NEGATIVE_PROMPT: &str = "blurry, low quality, distorted, ugly";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Three-tier quality selector mapped to (steps, guidance scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Fast,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [QualityPreset::Fast, QualityPreset::Medium, QualityPreset::High];

    pub fn steps(&self) -> u32 {
        match self {
            QualityPreset::Fast => 15,
            QualityPreset::Medium => 20,
            QualityPreset::High => 30,
        }
    }

    pub fn guidance_scale(&self) -> f32 {
        match self {
            QualityPreset::Fast => 6.0,
            QualityPreset::Medium => 7.5,
            QualityPreset::High => 9.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Fast => "fast",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(QualityPreset::Fast),
            "medium" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(format!("unknown quality preset '{}'", other)),
        }
    }
}

/// A single user action. Built with the `with_*` methods and handed to the
/// generator by reference, never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub output_dir: PathBuf,
    pub auto_translate: bool,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            width: 512,
            height: 512,
            num_inference_steps: QualityPreset::Medium.steps(),
            guidance_scale: QualityPreset::Medium.guidance_scale(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            auto_translate: true,
        }
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = negative_prompt.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.num_inference_steps = steps;
        self
    }

    pub fn with_guidance_scale(mut self, scale: f32) -> Self {
        self.guidance_scale = scale;
        self
    }

    pub fn with_quality(self, quality: QualityPreset) -> Self {
        self.with_steps(quality.steps())
            .with_guidance_scale(quality.guidance_scale())
    }

    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_auto_translate(mut self, enabled: bool) -> Self {
        self.auto_translate = enabled;
        self
    }

    /// Rejects parameters the backend cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ForgeError::Generation(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.num_inference_steps == 0 {
            return Err(ForgeError::Generation(
                "step count must be positive".into(),
            ));
        }
        if !(self.guidance_scale.is_finite() && self.guidance_scale > 0.0) {
            return Err(ForgeError::Generation(format!(
                "guidance scale must be positive, got {}",
                self.guidance_scale
            )));
        }
        Ok(())
    }
}
