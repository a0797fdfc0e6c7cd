//! Text watermark rendering.
//!
//! Renders watermark text onto a transparent RGBA overlay that is later
//! composited onto the target image.
//!
//! # Layout
//!
//! - Lines are separated by the literal `"\r\n"` sequence only. A bare `'\n'`
//!   does not start a new line.
//! - The first line starts 10 pixels from the left edge with its baseline one
//!   em below the top edge.
//! - Each following baseline is 1.5 em lower.
//!
//! The em is the configured font size converted to pixels at the configured
//! DPI. Nothing is wrapped or centred; glyphs falling outside the overlay are
//! clipped.
//!
//! # Example
//!
//! ```ignore
//! use watermarker::watermark::text_renderer::{render_overlay, TextStyle};
//!
//! let style = TextStyle { font_size: 14.0, dpi: 72.0, grayscale: 0 };
//! let overlay = render_overlay(&font, &style, "SAMPLE", 800, 15)?;
//! ```

use super::compositor::blend_over;
use super::font::{pt_to_px, px_scale};
use super::WatermarkError;
use ab_glyph::{point, Font, GlyphId, ScaleFont};
use image::{Rgba, RgbaImage};

/// Separator between watermark lines.
pub const LINE_SEPARATOR: &str = "\r\n";

/// Horizontal inset of every line, in pixels.
pub const TEXT_INSET_X: f32 = 10.0;

/// Baseline-to-baseline distance as a multiple of the font size.
pub const LINE_SPACING: f32 = 1.5;

/// How the watermark text is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: f32,
    /// Dots per inch used to convert points to pixels.
    pub dpi: f32,
    /// Gray level of the text, 0 is black and 255 is white.
    pub grayscale: u8,
}

/// Where a single line of text is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout<'a> {
    pub text: &'a str,
    /// Pen x position of the first glyph.
    pub x: f32,
    /// Baseline y position.
    pub baseline: f32,
}

/// Split watermark text into lines on `"\r\n"`.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split(LINE_SEPARATOR).collect()
}

/// Height of the overlay for a given font size: one em plus one pixel.
pub fn overlay_height(font_size: f32, dpi: f32) -> u32 {
    (pt_to_px(font_size, dpi).ceil() as u32).saturating_add(1)
}

/// Compute the starting pen position of every line.
pub fn layout_lines(text: &str, font_size: f32, dpi: f32) -> Vec<LineLayout<'_>> {
    let em = pt_to_px(font_size, dpi);
    let advance = em * LINE_SPACING;

    split_lines(text)
        .into_iter()
        .enumerate()
        .map(|(index, line)| LineLayout {
            text: line,
            x: TEXT_INSET_X,
            baseline: em + advance * index as f32,
        })
        .collect()
}

/// Render text onto a fully transparent `width` x `height` overlay.
///
/// Fails on the first line containing a character the font cannot draw.
pub fn render_overlay<F: Font>(
    font: &F,
    style: &TextStyle,
    text: &str,
    width: u32,
    height: u32,
) -> Result<RgbaImage, WatermarkError> {
    let mut overlay = RgbaImage::new(width, height);

    for line in layout_lines(text, style.font_size, style.dpi) {
        draw_line(&mut overlay, font, style, &line)?;
    }

    Ok(overlay)
}

fn draw_line<F: Font>(
    canvas: &mut RgbaImage,
    font: &F,
    style: &TextStyle,
    line: &LineLayout<'_>,
) -> Result<(), WatermarkError> {
    let scale = px_scale(font, style.font_size, style.dpi)
        .map_err(|e| WatermarkError::render(line.text, e.to_string()))?;
    let scaled_font = font.as_scaled(scale);

    let canvas_width = canvas.width() as i64;
    let canvas_height = canvas.height() as i64;
    let gray = style.grayscale;

    let mut cursor_x = line.x;
    let mut prev_glyph: Option<GlyphId> = None;

    for c in line.text.chars() {
        // Control characters (including a lone '\n') take no space
        if c.is_control() {
            continue;
        }

        let glyph_id = scaled_font.glyph_id(c);
        if glyph_id.0 == 0 {
            return Err(WatermarkError::render(
                line.text,
                format!("font has no glyph for {:?}", c),
            ));
        }

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, point(cursor_x, line.baseline));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let min_x = bounds.min.x as i64;
            let min_y = bounds.min.y as i64;

            outlined.draw(|px, py, coverage| {
                let x = min_x + px as i64;
                let y = min_y + py as i64;

                if x >= 0 && y >= 0 && x < canvas_width && y < canvas_height {
                    let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    let pixel = Rgba([gray, gray, gray, alpha]);

                    // Overlapping glyph edges accumulate coverage
                    let existing = *canvas.get_pixel(x as u32, y as u32);
                    canvas.put_pixel(x as u32, y as u32, blend_over(existing, pixel));
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    Ok(())
}
