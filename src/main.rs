use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use watermarker::config::Config;
use watermarker::logging::LogFormat;
use watermarker::watermark::Watermarker;

const DEFAULT_CONFIG_PATH: &str = "watermarker.yaml";

/// Watermarker - stamp grayscale text onto images
#[derive(Parser, Debug)]
#[command(name = "watermarker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Image to watermark
    source: PathBuf,

    /// Output file; the extension selects the format
    destination: PathBuf,

    /// Watermark text. Lines are separated by CRLF
    #[arg(required_unless_present = "text_file", conflicts_with = "text_file")]
    text: Option<String>,

    /// Read the watermark text from a file instead
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Font file
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font size in points
    #[arg(long)]
    font_size: Option<f32>,

    /// Resolution in dots per inch
    #[arg(long)]
    dpi: Option<f32>,

    /// Text gray level, 0 (black) to 255 (white)
    #[arg(long)]
    grayscale: Option<u8>,

    /// Overlay x offset
    #[arg(short = 'x', long, allow_negative_numbers = true)]
    start_x: Option<i32>,

    /// Overlay y offset
    #[arg(short = 'y', long, allow_negative_numbers = true)]
    start_y: Option<i32>,

    /// Output width, 0 keeps the source width
    #[arg(long)]
    width: Option<u32>,

    /// Output height, 0 scales with the width
    #[arg(long)]
    height: Option<u32>,

    /// Log output format (text or json)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Args {
    /// Command-line values override the settings file.
    fn apply_overrides(&self, config: &mut Config) {
        let wm = &mut config.watermark;
        if let Some(font) = &self.font {
            wm.font_path = font.clone();
        }
        if let Some(size) = self.font_size {
            wm.font_size = size;
        }
        if let Some(dpi) = self.dpi {
            wm.dpi = dpi;
        }
        if let Some(gray) = self.grayscale {
            wm.grayscale = gray;
        }
        if let Some(x) = self.start_x {
            wm.start_x = x;
        }
        if let Some(y) = self.start_y {
            wm.start_y = y;
        }
        if let Some(width) = self.width {
            wm.resize_width = width;
        }
        if let Some(height) = self.height {
            wm.resize_height = height;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }

    fn watermark_text(&self) -> Result<String> {
        match (&self.text, &self.text_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read text file {}", path.display())),
            (None, None) => bail!("No watermark text given"),
        }
    }
}

fn load_config(args: &Args) -> Result<Config, String> {
    // The default config file is optional
    let mut config = if args.config.as_os_str() == DEFAULT_CONFIG_PATH && !args.config.exists() {
        Config::default()
    } else {
        Config::from_file(&args.config)?
    };

    args.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let text = args.watermark_text()?;

    let watermarker = Watermarker::from_settings(&config.watermark)
        .context("Failed to create watermarker")?;

    watermarker
        .apply(&args.source, &args.destination, &text)
        .with_context(|| {
            format!(
                "Failed to watermark {} into {}",
                args.source.display(),
                args.destination.display()
            )
        })?;

    Ok(())
}

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    // Initialize logging subsystem
    if let Err(e) =
        watermarker::logging::init_subscriber(config.logging.format, &config.logging.level)
    {
        eprintln!("Failed to initialize logging subsystem: {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        config_file = %args.config.display(),
        source = %args.source.display(),
        destination = %args.destination.display(),
        font = %config.watermark.font_path.display(),
        font_size = config.watermark.font_size,
        dpi = config.watermark.dpi,
        "Configuration loaded successfully"
    );

    match run(&args, &config) {
        Ok(()) => tracing::info!(destination = %args.destination.display(), "Watermark applied"),
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Watermarking failed");
            std::process::exit(1);
        }
    }
}
