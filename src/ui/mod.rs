pub mod render;

use std::fs;
use std::path::{Path, PathBuf};

pub use render::{render_examples, render_outcome, render_presets};

use crate::{
    error::{ForgeError, Result},
    generation::ImageGenerator,
    models::{GenerationRequest, QualityPreset, DEFAULT_NEGATIVE_PROMPT, DEFAULT_OUTPUT_DIR},
};

pub const MAX_IMAGE_COUNT: u8 = 4;

pub const EXAMPLE_PROMPTS: [&str; 6] = [
    "gün batımında sahil manzarası",
    "kar yağan dağda ahşap kulübe",
    "uzayda yüzen renkli kediler",
    "cyberpunk tarzı neon şehir",
    "fantastik orman ile peri ışıkları",
    "Van Gogh tarzında ayçiçeği tarlası",
];

/// Everything the user filled in for one "generate" action.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateForm {
    pub prompt: String,
    pub negative_prompt: String,
    pub quality: QualityPreset,
    pub count: u8,
    pub width: u32,
    pub height: u32,
    pub output_dir: PathBuf,
    pub auto_translate: bool,
}

impl GenerateForm {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            quality: QualityPreset::default(),
            count: 1,
            width: 512,
            height: 512,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            auto_translate: true,
        }
    }

    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest::new(self.prompt.clone())
            .with_negative_prompt(self.negative_prompt.clone())
            .with_quality(self.quality)
            .with_size(self.width, self.height)
            .with_output_dir(&self.output_dir)
            .with_auto_translate(self.auto_translate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Warning(String),
    Error(String),
}

/// One displayed image with its download handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCard {
    pub path: PathBuf,
    pub caption: String,
    pub file_name: String,
    pub size_bytes: u64,
}

impl ImageCard {
    fn from_path(path: PathBuf, caption: String) -> Result<Self> {
        let size_bytes = fs::metadata(&path)?.len();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path,
            caption,
            file_name,
            size_bytes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub banner: Banner,
    pub images: Vec<ImageCard>,
}

impl Outcome {
    fn banner(banner: Banner) -> Self {
        Self {
            banner,
            images: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.banner, Banner::Success(_))
    }

    /// Process exit status for this outcome: 0 only when images were made.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Holds the generator, and with it the loaded model, across submissions.
pub struct Session {
    generator: ImageGenerator,
}

impl Session {
    pub fn new(generator: ImageGenerator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &ImageGenerator {
        &self.generator
    }

    /// Never fails: every problem ends up in the banner.
    pub async fn submit(&self, form: &GenerateForm) -> Outcome {
        if form.prompt.trim().is_empty() {
            log::warn!("Empty prompt submitted");
            return Outcome::banner(Banner::Warning("Please enter a description!".into()));
        }

        match self.run(form).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Request failed: {}", e);
                Outcome::banner(Banner::Error(format!("Error: {}", e)))
            }
        }
    }

    async fn run(&self, form: &GenerateForm) -> Result<Outcome> {
        if form.count == 0 || form.count > MAX_IMAGE_COUNT {
            return Err(ForgeError::Config(format!(
                "image count must be between 1 and {}, got {}",
                MAX_IMAGE_COUNT, form.count
            )));
        }

        let request = form.to_request();

        if form.count == 1 {
            return Ok(match self.generator.generate_image(&request).await? {
                Some(path) => Outcome {
                    banner: Banner::Success("Image generated successfully!".into()),
                    images: vec![ImageCard::from_path(path, format!("Prompt: {}", form.prompt))?],
                },
                None => Outcome::banner(Banner::Error("Image generation failed!".into())),
            });
        }

        let paths = self
            .generator
            .generate_multiple_images(&request, form.count as usize)
            .await?;
        if paths.is_empty() {
            return Ok(Outcome::banner(Banner::Error(
                "Image generation failed for every variation!".into(),
            )));
        }

        let banner = Banner::Success(format!("{} images generated successfully!", paths.len()));
        let images = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| ImageCard::from_path(path, format!("Variation {}", i + 1)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Outcome { banner, images })
    }
}

/// Copies every image of an outcome into `dir`.
pub fn download_images(images: &[ImageCard], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut copied = Vec::with_capacity(images.len());
    for card in images {
        let target = dir.join(&card.file_name);
        fs::copy(&card.path, &target)?;
        log::info!("📥 Downloaded {} to {}", card.file_name, target.display());
        copied.push(target);
    }
    Ok(copied)
}
