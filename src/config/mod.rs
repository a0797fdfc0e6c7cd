// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::LogFormat;
use crate::watermark::{
    validate_font_scale, DEFAULT_DPI, DEFAULT_FONT_PATH, DEFAULT_FONT_SIZE, DEFAULT_GRAYSCALE,
};

/// Top-level settings file.
///
/// Every section is optional; missing values fall back to the defaults of
/// [`crate::watermark::Watermarker::new_default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub watermark: WatermarkSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_font_path() -> PathBuf {
    PathBuf::from(DEFAULT_FONT_PATH)
}

fn default_grayscale() -> u8 {
    DEFAULT_GRAYSCALE
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_dpi() -> f32 {
    DEFAULT_DPI
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Watermark text and placement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkSettings {
    /// Path to a TrueType/OpenType font file
    #[serde(default = "default_font_path")]
    pub font_path: PathBuf,

    /// Text gray level, 0 (black) to 255 (white)
    #[serde(default = "default_grayscale")]
    pub grayscale: u8,

    /// Font size in points (default: 14)
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Resolution used to convert points to pixels (default: 72)
    #[serde(default = "default_dpi")]
    pub dpi: f32,

    /// Overlay top-left x, may be negative
    #[serde(default)]
    pub start_x: i32,

    /// Overlay top-left y, may be negative
    #[serde(default)]
    pub start_y: i32,

    /// Output width, 0 keeps the source width
    #[serde(default)]
    pub resize_width: u32,

    /// Output height, 0 scales with the width
    #[serde(default)]
    pub resize_height: u32,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            font_path: default_font_path(),
            grayscale: default_grayscale(),
            font_size: default_font_size(),
            dpi: default_dpi(),
            start_x: 0,
            start_y: 0,
            resize_width: 0,
            resize_height: 0,
        }
    }
}

impl WatermarkSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.font_path.as_os_str().is_empty() {
            return Err("Watermark 'font_path' cannot be empty".to_string());
        }

        validate_font_scale(self.font_size, self.dpi).map_err(|e| format!("Watermark {}", e))
    }
}

/// Log output settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        // An empty document is a valid, all-defaults config
        if substituted.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.watermark.validate()?;

        if self.logging.level.trim().is_empty() {
            return Err("Logging level cannot be empty".to_string());
        }

        Ok(())
    }
}
