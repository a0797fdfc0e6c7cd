//! The reusable text watermarker.
//!
//! A [`Watermarker`] loads its font once and can then stamp any number of
//! images. Applying a watermark only borrows it immutably; the start point is
//! the single field that can change after construction.

use super::compositor::composite;
use super::font::{load_font, validate_font_scale};
use super::format::output_format;
use super::position::PlacementPosition;
use super::processor::{decode_image, encode_image, resize_to_target, ResizeTarget};
use super::text_renderer::{overlay_height, render_overlay, TextStyle};
use super::WatermarkError;
use crate::config::WatermarkSettings;
use ab_glyph::FontVec;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default text gray level (black).
pub const DEFAULT_GRAYSCALE: u8 = 0;
/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;
/// Default resolution.
pub const DEFAULT_DPI: f32 = 72.0;
/// Font used by [`Watermarker::new_default`], relative to the working directory.
pub const DEFAULT_FONT_PATH: &str = "assets/fonts/DejaVuSansMono.ttf";

/// Text watermark settings bound to a parsed font.
pub struct Watermarker {
    font: FontVec,
    font_path: PathBuf,
    font_size: f32,
    dpi: f32,
    grayscale: u8,
    start_point: PlacementPosition,
    resize: ResizeTarget,
}

impl std::fmt::Debug for Watermarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watermarker")
            .field("font_path", &self.font_path)
            .field("font_size", &self.font_size)
            .field("dpi", &self.dpi)
            .field("grayscale", &self.grayscale)
            .field("start_point", &self.start_point)
            .field("resize", &self.resize)
            .finish()
    }
}

impl Watermarker {
    /// Create a watermarker with black 14pt text at 72 DPI, placed at the
    /// top-left corner, without resizing, using the bundled default font.
    pub fn new_default() -> Result<Self, WatermarkError> {
        Self::new(
            DEFAULT_FONT_PATH,
            DEFAULT_GRAYSCALE,
            DEFAULT_FONT_SIZE,
            DEFAULT_DPI,
            PlacementPosition::default(),
            0,
            0,
        )
    }

    /// Create a watermarker, loading the font at `font_path`.
    ///
    /// `resize_width` and `resize_height` of 0 leave that dimension unset.
    pub fn new(
        font_path: impl AsRef<Path>,
        grayscale: u8,
        font_size: f32,
        dpi: f32,
        start_point: PlacementPosition,
        resize_width: u32,
        resize_height: u32,
    ) -> Result<Self, WatermarkError> {
        validate_font_scale(font_size, dpi).map_err(WatermarkError::InvalidConfig)?;

        let font_path = font_path.as_ref().to_path_buf();
        let font = load_font(&font_path)?;

        tracing::debug!(
            font = %font_path.display(),
            font_size,
            dpi,
            grayscale,
            "Loaded watermark font"
        );

        Ok(Self {
            font,
            font_path,
            font_size,
            dpi,
            grayscale,
            start_point,
            resize: ResizeTarget::new(resize_width, resize_height),
        })
    }

    /// Create a watermarker from file-based settings.
    pub fn from_settings(settings: &WatermarkSettings) -> Result<Self, WatermarkError> {
        Self::new(
            &settings.font_path,
            settings.grayscale,
            settings.font_size,
            settings.dpi,
            PlacementPosition::new(settings.start_x, settings.start_y),
            settings.resize_width,
            settings.resize_height,
        )
    }

    /// Move the overlay's top-left corner. Any coordinates are accepted.
    pub fn set_start_point(&mut self, x: i32, y: i32) {
        self.start_point = PlacementPosition::new(x, y);
    }

    pub fn start_point(&self) -> PlacementPosition {
        self.start_point
    }

    pub fn font(&self) -> &FontVec {
        &self.font
    }

    pub fn font_path(&self) -> &Path {
        &self.font_path
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    pub fn grayscale(&self) -> u8 {
        self.grayscale
    }

    /// The configured resize target used by [`apply`](Self::apply).
    pub fn resize_target(&self) -> ResizeTarget {
        self.resize
    }

    /// Text style derived from the configured font size, DPI and gray level.
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_size: self.font_size,
            dpi: self.dpi,
            grayscale: self.grayscale,
        }
    }

    /// Height of the overlay this watermarker renders.
    pub fn overlay_height(&self) -> u32 {
        overlay_height(self.font_size, self.dpi)
    }

    /// Watermark `src` with `text` and write the result to `dst`, using the
    /// configured resize target.
    pub fn apply(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        text: &str,
    ) -> Result<(), WatermarkError> {
        self.apply_with(src, dst, text, self.resize)
    }

    /// Watermark `src` with `text` and write the result to `dst`, resizing
    /// according to `resize` for this call only.
    ///
    /// The output format follows the extension of `dst`. The destination is
    /// created (or truncated) before the source is decoded.
    pub fn apply_with(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        text: &str,
        resize: ResizeTarget,
    ) -> Result<(), WatermarkError> {
        let src = src.as_ref();
        let dst = dst.as_ref();

        let format = output_format(dst)?;

        let file = File::create(dst).map_err(|source| WatermarkError::Io {
            path: dst.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        let origin = decode_image(src)?;
        tracing::debug!(
            src = %src.display(),
            width = origin.width(),
            height = origin.height(),
            "Decoded source image"
        );

        // Base layer: verbatim copy of the (resized) source pixels
        let mut canvas = resize_to_target(&origin, resize)?;
        drop(origin);

        let overlay = render_overlay(
            &self.font,
            &self.text_style(),
            text,
            canvas.width(),
            self.overlay_height(),
        )?;

        composite(&mut canvas, &overlay, self.start_point);

        let (width, height) = canvas.dimensions();
        encode_image(canvas, format, &mut writer, dst)?;
        writer.flush().map_err(|source| WatermarkError::Io {
            path: dst.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            dst = %dst.display(),
            width,
            height,
            format = ?format,
            "Wrote watermarked image"
        );

        Ok(())
    }
}
