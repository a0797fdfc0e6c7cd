//! Watermark error types.
//!
//! Defines errors that can occur while building a watermarker or applying a
//! watermark to an image file.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during watermark processing.
#[derive(Error, Debug)]
pub enum WatermarkError {
    /// Font file could not be read
    #[error("Failed to read font {}: {source}", path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Font bytes are not a usable TrueType/OpenType font
    #[error("Failed to parse font {}", path.display())]
    FontParse { path: PathBuf },

    /// Invalid watermarker settings
    #[error("Watermark configuration error: {0}")]
    InvalidConfig(String),

    /// Source image could not be decoded
    #[error("Failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A line of watermark text could not be rendered
    #[error("Failed to render text line {line:?}: {reason}")]
    Render { line: String, reason: String },

    /// Destination file could not be created or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination extension does not map to a writable image format
    #[error("Unsupported output format for {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Resampling the source image failed
    #[error("Failed to resize image: {0}")]
    Resize(String),

    /// Encoding the watermarked image failed
    #[error("Failed to encode image {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl WatermarkError {
    pub(crate) fn render(line: &str, reason: impl Into<String>) -> Self {
        Self::Render {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}
