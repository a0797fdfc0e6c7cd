//! Overlay placement.
//!
//! The overlay is placed by its top-left corner. The corner may sit anywhere,
//! including at negative coordinates or past the image edges; only the part
//! of the overlay that overlaps the image is composited.

/// Width and height of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of the overlay in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Half-open pixel rectangle `[x_start, x_end) x [y_start, y_end)` in image
/// coordinates where the overlay and the image overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRegion {
    pub x_start: u32,
    pub y_start: u32,
    pub x_end: u32,
    pub y_end: u32,
}

/// Compute the overlap between an overlay placed at `pos` and the image.
///
/// Returns `None` when nothing of the overlay lands on the image.
pub fn visible_region(
    pos: PlacementPosition,
    image: &ImageDimensions,
    overlay: &ImageDimensions,
) -> Option<VisibleRegion> {
    // i64 so that extreme start points cannot overflow
    let x0 = i64::from(pos.x);
    let y0 = i64::from(pos.y);

    let x_start = x0.max(0);
    let y_start = y0.max(0);
    let x_end = (x0 + i64::from(overlay.width)).min(i64::from(image.width));
    let y_end = (y0 + i64::from(overlay.height)).min(i64::from(image.height));

    if x_start >= x_end || y_start >= y_end {
        return None;
    }

    Some(VisibleRegion {
        x_start: x_start as u32,
        y_start: y_start as u32,
        x_end: x_end as u32,
        y_end: y_end as u32,
    })
}

/// Check if any part of the overlay is visible on the image.
pub fn is_visible(
    pos: PlacementPosition,
    image: &ImageDimensions,
    overlay: &ImageDimensions,
) -> bool {
    visible_region(pos, image, overlay).is_some()
}
