use clap::{Args, Parser, Subcommand};
use imgforge::{
    config::{BackendKind, ForgeConfig},
    logger::{self, LogLevel, LoggerConfig},
    models::{ComputeDevice, QualityPreset, DEFAULT_NEGATIVE_PROMPT},
    ui::{self, GenerateForm, Session},
    ImageGenerator,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "imgforge",
    version,
    about = "Turn Turkish or English descriptions into images"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Debug logging with file locations
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate one or more images from a description
    Generate(GenerateArgs),
    /// Show example prompts
    Examples,
    /// Show the quality presets
    Presets,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// What the image should show
    prompt: String,

    #[arg(long, short, value_enum, default_value_t = QualityArg::Medium)]
    quality: QualityArg,

    /// Number of variations
    #[arg(long, short = 'n', default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=4))]
    count: u8,

    /// Attributes to avoid
    #[arg(long, default_value = DEFAULT_NEGATIVE_PROMPT)]
    negative_prompt: String,

    /// Defaults to 512, or 1024 on Bedrock
    #[arg(long)]
    width: Option<u32>,

    /// Defaults to 512, or 1024 on Bedrock
    #[arg(long)]
    height: Option<u32>,

    /// Defaults to IMGFORGE_OUTPUT_DIR or ./outputs
    #[arg(long, short)]
    output_dir: Option<PathBuf>,

    /// Send the prompt to the model as typed
    #[arg(long)]
    no_translate: bool,

    /// Copy the generated files here
    #[arg(long)]
    download_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    #[arg(long)]
    model: Option<String>,

    #[arg(long, value_enum)]
    device: Option<DeviceArg>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum QualityArg {
    Fast,
    Medium,
    High,
}

impl From<QualityArg> for QualityPreset {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Fast => QualityPreset::Fast,
            QualityArg::Medium => QualityPreset::Medium,
            QualityArg::High => QualityPreset::High,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum BackendArg {
    Worker,
    Bedrock,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum DeviceArg {
    Cuda,
    Cpu,
}

fn logger_config(cli: &Cli) -> LoggerConfig {
    let mut config = if cli.json_logs {
        LoggerConfig::production()
    } else if cli.verbose {
        LoggerConfig::development()
    } else {
        LoggerConfig::default()
    };
    if cli.verbose {
        config = config.with_level(LogLevel::Debug);
    }
    if let Some(path) = &cli.log_file {
        config = config.with_file_output(path.clone());
    }
    config
}

fn apply_overrides(mut config: ForgeConfig, args: &GenerateArgs) -> ForgeConfig {
    if let Some(backend) = args.backend {
        config = config.with_backend(match backend {
            BackendArg::Worker => BackendKind::Worker,
            BackendArg::Bedrock => BackendKind::Bedrock,
        });
    }
    if let Some(model) = &args.model {
        config = config.with_model_id(model.clone());
    }
    if let Some(device) = args.device {
        config = config.with_device(match device {
            DeviceArg::Cuda => ComputeDevice::Cuda,
            DeviceArg::Cpu => ComputeDevice::Cpu,
        });
    }
    if let Some(dir) = &args.output_dir {
        config = config.with_output_dir(dir.clone());
    }
    config
}

async fn generate(args: GenerateArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = apply_overrides(ForgeConfig::from_env()?, &args);
    logger::log_config_info(&config);
    let (default_width, default_height) = config.backend.default_size();

    let session = Session::new(ImageGenerator::from_config(&config)?);
    let form = GenerateForm {
        prompt: args.prompt,
        negative_prompt: args.negative_prompt,
        quality: args.quality.into(),
        count: args.count,
        width: args.width.unwrap_or(default_width),
        height: args.height.unwrap_or(default_height),
        output_dir: config.output_dir.clone(),
        auto_translate: !args.no_translate,
    };

    let outcome = session.submit(&form).await;
    let mut stdout = io::stdout().lock();
    ui::render_outcome(&outcome, &mut stdout, true)?;

    if let Some(dir) = &args.download_dir {
        if let Err(e) = ui::download_images(&outcome.images, dir) {
            log::error!("Download failed: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::from(outcome.exit_code()))
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logger::init_with_config(logger_config(&cli))?;

    match dotenv::dotenv() {
        Ok(path) => log::debug!("Loaded {}", path.display()),
        Err(_) => log::debug!("No .env file found, using system environment variables"),
    }

    match cli.command {
        Command::Generate(args) => generate(args).await,
        Command::Examples => {
            ui::render_examples(&mut io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Presets => {
            ui::render_presets(&mut io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
