//! Font loading and point/pixel conversions.

use super::WatermarkError;
use ab_glyph::{Font, FontVec, PxScale};
use std::path::Path;

/// Points per inch. Font sizes are given in points and scaled by DPI.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Largest accepted em size in pixels. The overlay is one em tall.
pub const MAX_EM_PX: f32 = 4096.0;

/// Read a font file and parse it into an owned font.
///
/// Every call reads the file again; callers keep the returned font around.
pub fn load_font(path: impl AsRef<Path>) -> Result<FontVec, WatermarkError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| WatermarkError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;

    FontVec::try_from_vec(bytes).map_err(|_| WatermarkError::FontParse {
        path: path.to_path_buf(),
    })
}

/// Convert a length in points to pixels at the given DPI.
pub fn pt_to_px(points: f32, dpi: f32) -> f32 {
    points * dpi / POINTS_PER_INCH
}

/// Check that `points` at `dpi` is a usable em size.
///
/// Both values must be finite and positive, and the em may not exceed
/// [`MAX_EM_PX`].
pub fn validate_font_scale(points: f32, dpi: f32) -> Result<(), String> {
    if !points.is_finite() || points <= 0.0 {
        return Err(format!("font size must be a positive number, got {}", points));
    }
    if !dpi.is_finite() || dpi <= 0.0 {
        return Err(format!("dpi must be a positive number, got {}", dpi));
    }

    let em = pt_to_px(points, dpi);
    if !em.is_finite() || em > MAX_EM_PX {
        return Err(format!(
            "font size {}pt at {} dpi is {}px per em, above the {}px limit",
            points, dpi, em, MAX_EM_PX
        ));
    }

    Ok(())
}

/// Glyph scale for a font rendered at `points` on a `dpi` device.
///
/// `PxScale` is relative to the font's ascent-descent height rather than the
/// em square, so the pixels-per-em value is rescaled by `height / units_per_em`.
pub fn px_scale<F: Font>(font: &F, points: f32, dpi: f32) -> Result<PxScale, WatermarkError> {
    let units_per_em = font.units_per_em().ok_or_else(|| {
        WatermarkError::InvalidConfig("font reports an invalid units-per-em".to_string())
    })?;
    let px_per_em = pt_to_px(points, dpi);
    Ok(PxScale::from(px_per_em * font.height_unscaled() / units_per_em))
}
