//! Text watermarking for raster images.
//!
//! A [`Watermarker`] renders a line-based grayscale text overlay and
//! composites it onto an image read from disk, writing the result to a new
//! file.
//!
//! # Pipeline
//!
//! 1. Infer and validate the output format from the destination extension
//! 2. Create the destination file
//! 3. Decode the source image
//! 4. Resize it (Lanczos3) when a resize target is set
//! 5. Render the text onto a transparent overlay as wide as the image
//! 6. Composite the overlay at the start point ("over" operator)
//! 7. Encode into the destination
//!
//! # Example
//!
//! ```ignore
//! use watermarker::watermark::Watermarker;
//!
//! let mut wm = Watermarker::new_default()?;
//! wm.set_start_point(20, 20);
//! wm.apply("photo.jpg", "photo-marked.png", "Copyright 2025\r\nExample Ltd")?;
//! ```

pub mod compositor;
pub mod error;
pub mod font;
pub mod format;
pub mod position;
pub mod processor;
pub mod text_renderer;
pub mod watermarker;

// Re-export main types for convenience
pub use compositor::{blend_over, composite};
pub use error::WatermarkError;
pub use font::{load_font, pt_to_px, px_scale, validate_font_scale, MAX_EM_PX};
pub use format::{output_format, SUPPORTED_OUTPUT_FORMATS};
pub use position::{is_visible, visible_region, ImageDimensions, PlacementPosition, VisibleRegion};
pub use processor::{decode_image, encode_image, resize_to_target, ResizeTarget};
pub use text_renderer::{
    layout_lines, overlay_height, render_overlay, split_lines, LineLayout, TextStyle,
    LINE_SEPARATOR,
};
pub use watermarker::{
    Watermarker, DEFAULT_DPI, DEFAULT_FONT_PATH, DEFAULT_FONT_SIZE, DEFAULT_GRAYSCALE,
};
