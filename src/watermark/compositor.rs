//! Alpha compositing of the text overlay onto the base image.
//!
//! Uses the Porter-Duff "over" operator. Fully transparent overlay pixels
//! leave the base pixel untouched, so the base image only changes where
//! glyphs were drawn.

use super::position::{visible_region, ImageDimensions, PlacementPosition};
use image::{Rgba, RgbaImage};

/// Composite `overlay` onto `base` with its top-left corner at `position`.
///
/// Parts of the overlay outside the base are ignored.
pub fn composite(base: &mut RgbaImage, overlay: &RgbaImage, position: PlacementPosition) {
    let base_dims = ImageDimensions::new(base.width(), base.height());
    let overlay_dims = ImageDimensions::new(overlay.width(), overlay.height());

    let Some(region) = visible_region(position, &base_dims, &overlay_dims) else {
        return;
    };

    for ty in region.y_start..region.y_end {
        for tx in region.x_start..region.x_end {
            // Source coordinates in the overlay
            let ox = (i64::from(tx) - i64::from(position.x)) as u32;
            let oy = (i64::from(ty) - i64::from(position.y)) as u32;

            let fg = *overlay.get_pixel(ox, oy);
            if fg[3] == 0 {
                continue;
            }

            let bg = *base.get_pixel(tx, ty);
            base.put_pixel(tx, ty, blend_over(bg, fg));
        }
    }
}

/// Blend two pixels: result = foreground + background * (1 - foreground.alpha)
pub fn blend_over(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    if foreground[3] == 0 {
        return background;
    }
    if foreground[3] == 255 {
        return foreground;
    }

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
