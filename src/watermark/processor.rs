//! Image decoding, resizing and encoding for the watermark pipeline.
//!
//! Handles the raster side of a watermark call: decode → resize → encode

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::{DynamicImage, ImageError, ImageFormat, RgbaImage};
use std::io::{Seek, Write};
use std::num::NonZeroU32;
use std::path::Path;

use super::format::supports_alpha;
use super::position::ImageDimensions;
use super::WatermarkError;

/// Requested output size. A zero dimension means "not set".
///
/// - width unset: the source width is kept
/// - height unset: the height follows the resolved width proportionally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeTarget {
    pub width: u32,
    pub height: u32,
}

impl ResizeTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Leave the source size unchanged.
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// Resolve the target against a source of the given size.
    pub fn resolve(&self, source: ImageDimensions) -> ImageDimensions {
        let width = if self.width == 0 {
            source.width
        } else {
            self.width
        };

        let height = if self.height != 0 {
            self.height
        } else if width == source.width || source.width == 0 {
            source.height
        } else {
            let scaled = u64::from(source.height) * u64::from(width);
            let rounded = (scaled + u64::from(source.width) / 2) / u64::from(source.width);
            rounded.clamp(1, u64::from(u32::MAX)) as u32
        };

        ImageDimensions::new(width, height)
    }
}

/// Decode the image stored at `path`, guessing the format from its content.
pub fn decode_image(path: &Path) -> Result<DynamicImage, WatermarkError> {
    let decode_err = |source: ImageError| WatermarkError::Decode {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)
}

/// Resize `img` to the size requested by `target`, returning RGBA pixels.
///
/// No resampling happens when the resolved size equals the source size.
pub fn resize_to_target(img: &DynamicImage, target: ResizeTarget) -> Result<RgbaImage, WatermarkError> {
    let source = ImageDimensions::new(img.width(), img.height());
    let resolved = target.resolve(source);

    if resolved == source {
        return Ok(img.to_rgba8());
    }

    resize_image(img, resolved.width, resolved.height)
}

/// Resize image using fast-image-resize with Lanczos3 filter
fn resize_image(img: &DynamicImage, target_w: u32, target_h: u32) -> Result<RgbaImage, WatermarkError> {
    let src_width = NonZeroU32::new(img.width())
        .ok_or_else(|| WatermarkError::Resize("Source width is 0".to_string()))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| WatermarkError::Resize("Source height is 0".to_string()))?;
    let dst_width = NonZeroU32::new(target_w)
        .ok_or_else(|| WatermarkError::Resize("Target width is 0".to_string()))?;
    let dst_height = NonZeroU32::new(target_h)
        .ok_or_else(|| WatermarkError::Resize("Target height is 0".to_string()))?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| WatermarkError::Resize(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| WatermarkError::Resize(format!("Resize operation failed: {:?}", e)))?;

    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| WatermarkError::Resize("Failed to create output image buffer".to_string()))
}

/// Encode `image` as `format` into `writer`.
///
/// Formats without an alpha channel receive an RGB conversion first.
/// `path` only labels errors.
pub fn encode_image<W: Write + Seek>(
    image: RgbaImage,
    format: ImageFormat,
    writer: &mut W,
    path: &Path,
) -> Result<(), WatermarkError> {
    let image = if supports_alpha(format) {
        DynamicImage::ImageRgba8(image)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image).to_rgb8())
    };

    image
        .write_to(writer, format)
        .map_err(|source| WatermarkError::Encode {
            path: path.to_path_buf(),
            source,
        })
}
