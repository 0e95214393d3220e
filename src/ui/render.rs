use colored::*;
use std::io::{self, Write};

use super::{Banner, Outcome, EXAMPLE_PROMPTS};
use crate::models::QualityPreset;

fn human_size(bytes: u64) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{} B", b),
    }
}

fn paint(text: String, color: Color, colors: bool) -> String {
    if colors {
        text.color(color).bold().to_string()
    } else {
        text
    }
}

pub fn render_outcome(outcome: &Outcome, out: &mut impl Write, colors: bool) -> io::Result<()> {
    let line = match &outcome.banner {
        Banner::Success(message) => paint(format!("✅ {}", message), Color::Green, colors),
        Banner::Warning(message) => paint(format!("⚠️  {}", message), Color::Yellow, colors),
        Banner::Error(message) => paint(format!("❌ {}", message), Color::Red, colors),
    };
    writeln!(out, "{}", line)?;

    for (i, card) in outcome.images.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "🖼️  {}", card.caption)?;
        writeln!(out, "   {}", card.path.display())?;
        writeln!(
            out,
            "   📥 Download {}: {} ({}, image/png)",
            i + 1,
            card.file_name,
            human_size(card.size_bytes)
        )?;
    }

    if outcome.is_success() {
        writeln!(out)?;
        writeln!(
            out,
            "💡 Tip: more detailed descriptions give better results, e.g. 'fluffy orange cat sitting on a windowsill' instead of 'cat'."
        )?;
    }
    Ok(())
}

pub fn render_examples(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "🎨 Example prompts:")?;
    for example in EXAMPLE_PROMPTS {
        writeln!(out, "  - {}", example)?;
    }
    Ok(())
}

pub fn render_presets(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "⚙️  Quality presets:")?;
    for preset in QualityPreset::ALL {
        writeln!(
            out,
            "  {:<7} {} steps, guidance {}",
            preset.as_str(),
            preset.steps(),
            preset.guidance_scale()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::ImageCard;
    use std::path::PathBuf;

    fn rendered(outcome: &Outcome) -> String {
        let mut buffer = Vec::new();
        render_outcome(outcome, &mut buffer, false).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_render_success_with_download_entries() {
        let outcome = Outcome {
            banner: Banner::Success("Image generated successfully!".into()),
            images: vec![ImageCard {
                path: PathBuf::from("outputs/20240309_070501_red_fox.png"),
                caption: "Prompt: red fox".into(),
                file_name: "20240309_070501_red_fox.png".into(),
                size_bytes: 2048,
            }],
        };
        let text = rendered(&outcome);
        assert!(text.starts_with("✅ Image generated successfully!"));
        assert!(text.contains("📥 Download 1: 20240309_070501_red_fox.png (2.0 KB, image/png)"));
        assert!(text.contains("💡 Tip"));
    }

    #[test]
    fn test_render_warning_has_no_tip() {
        let outcome = Outcome {
            banner: Banner::Warning("Please enter a description!".into()),
            images: Vec::new(),
        };
        let text = rendered(&outcome);
        assert_eq!(text, "⚠️  Please enter a description!\n");
    }

    #[test]
    fn test_render_presets_and_examples() {
        let mut buffer = Vec::new();
        render_presets(&mut buffer).unwrap();
        render_examples(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("fast    15 steps, guidance 6"));
        assert!(text.contains("high    30 steps, guidance 9"));
        assert!(text.contains("  - cyberpunk tarzı neon şehir"));
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }
}
