use chrono::{DateTime, Local, TimeZone};
use image::{DynamicImage, ImageFormat};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{error::Result, text::clean_filename};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `{YYYYMMDD_HHMMSS}_{slug}.png`. Two calls in the same second with the
/// same prompt give the same name; the later write wins.
pub fn build_filename<Tz>(timestamp: &DateTime<Tz>, prompt: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}_{}.png",
        timestamp.format(TIMESTAMP_FORMAT),
        clean_filename(prompt)
    )
}

/// Writes generated bitmaps as PNG files into one directory.
#[derive(Debug, Clone)]
pub struct ImageWriter {
    output_dir: PathBuf,
}

impl ImageWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    pub fn path_for<Tz>(&self, timestamp: &DateTime<Tz>, prompt: &str) -> PathBuf
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.output_dir.join(build_filename(timestamp, prompt))
    }

    pub fn save(&self, image: &DynamicImage, prompt: &str) -> Result<PathBuf> {
        self.save_at(image, prompt, &Local::now())
    }

    pub fn save_at<Tz>(
        &self,
        image: &DynamicImage,
        prompt: &str,
        timestamp: &DateTime<Tz>,
    ) -> Result<PathBuf>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.ensure_dir()?;
        let path = self.path_for(timestamp, prompt);
        image.save_with_format(&path, ImageFormat::Png)?;
        log::info!("Image saved: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    #[test]
    fn test_build_filename_format() {
        assert_eq!(
            build_filename(&fixed_time(), "gün batımında sahil!"),
            "20240309_070501_gun_batiminda_sahil.png"
        );
        assert_eq!(build_filename(&fixed_time(), ""), "20240309_070501_.png");
    }

    #[test]
    fn test_same_second_same_prompt_collides() {
        let a = build_filename(&fixed_time(), "kar yağan dağ");
        let b = build_filename(&fixed_time(), "kar yağan dağ");
        assert_eq!(a, b);

        let later = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap();
        assert_ne!(a, build_filename(&later, "kar yağan dağ"));
        assert_ne!(a, build_filename(&fixed_time(), "kar yağan dağlar"));
    }

    #[test]
    fn test_save_creates_directory_and_png() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let writer = ImageWriter::new(temp.path().join("a").join("b"));
        let image = DynamicImage::new_rgb8(4, 3);

        let path = writer.save_at(&image, "küçük kare", &fixed_time())?;
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("20240309_070501_kucuk_kare.png")
        );

        let reloaded = image::open(&path)?;
        assert_eq!((reloaded.width(), reloaded.height()), (4, 3));

        // Idempotent directory creation, same name overwrites.
        let again = writer.save_at(&image, "küçük kare", &fixed_time())?;
        assert_eq!(again, path);
        assert_eq!(fs::read_dir(writer.output_dir())?.count(), 1);
        Ok(())
    }
}
