//! Output format selection.
//!
//! The output format is inferred from the destination file extension and
//! checked against the formats this crate can encode, so an unsupported
//! destination is rejected before any file is created.

use super::WatermarkError;
use image::ImageFormat;
use std::path::Path;

/// Formats the watermarker will write.
pub const SUPPORTED_OUTPUT_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// Infer and validate the output format for `path` from its extension.
pub fn output_format(path: &Path) -> Result<ImageFormat, WatermarkError> {
    let unsupported = || WatermarkError::UnsupportedFormat {
        path: path.to_path_buf(),
    };

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(unsupported)?;

    let format = ImageFormat::from_extension(extension).ok_or_else(unsupported)?;

    if SUPPORTED_OUTPUT_FORMATS.contains(&format) && format.writing_enabled() {
        Ok(format)
    } else {
        Err(unsupported())
    }
}

/// Whether encoded images of this format keep an alpha channel.
pub fn supports_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg | ImageFormat::Bmp)
}
