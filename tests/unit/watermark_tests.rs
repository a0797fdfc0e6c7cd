// Watermark pipeline tests
//
// These tests drive Watermarker end to end through real files in a scratch
// directory: decode → resize → overlay → composite → encode.

use image::{GenericImageView, ImageFormat, Rgba, RgbaImage};
use rstest::rstest;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use watermarker::watermark::{
    PlacementPosition, ResizeTarget, WatermarkError, Watermarker, DEFAULT_FONT_PATH,
};

const FONT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSansMono.ttf");

const BACKGROUND: Rgba<u8> = Rgba([250, 240, 230, 255]);

fn watermarker(font_size: f32, resize_width: u32, resize_height: u32) -> Watermarker {
    Watermarker::new(
        FONT_PATH,
        0,
        font_size,
        72.0,
        PlacementPosition::default(),
        resize_width,
        resize_height,
    )
    .expect("bundled font should load")
}

/// Write a solid opaque PNG and return its path.
fn write_source(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.path().join(name);
    RgbaImage::from_pixel(width, height, BACKGROUND)
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

fn changed_pixels(before: &RgbaImage, after: &RgbaImage) -> Vec<(u32, u32)> {
    before
        .enumerate_pixels()
        .filter(|(x, y, p)| after.get_pixel(*x, *y) != *p)
        .map(|(x, y, _)| (x, y))
        .collect()
}

fn open_rgba(path: &Path) -> RgbaImage {
    image::open(path).unwrap().to_rgba8()
}

// Test: construction with a valid font succeeds, an invalid one fails

#[test]
fn test_construct_with_valid_font() {
    let wm = watermarker(14.0, 0, 0);
    assert!(wm.font_path().ends_with("DejaVuSansMono.ttf"));
}

#[test]
fn test_default_constructor_uses_bundled_font() {
    // Integration tests run from the package root, where the default font lives
    let wm = Watermarker::new_default().unwrap();

    assert_eq!(wm.font_path(), Path::new(DEFAULT_FONT_PATH));
    assert_eq!(wm.grayscale(), 0);
    assert_eq!(wm.font_size(), 14.0);
    assert_eq!(wm.dpi(), 72.0);
    assert_eq!(wm.start_point(), PlacementPosition::new(0, 0));
    assert_eq!(wm.resize_target(), ResizeTarget::unchanged());
}

#[test]
fn test_construct_with_missing_font_fails() {
    let err = Watermarker::new(
        "/no/such/font.ttf",
        0,
        14.0,
        72.0,
        PlacementPosition::default(),
        0,
        0,
    )
    .unwrap_err();
    assert!(matches!(err, WatermarkError::FontRead { .. }));
}

#[test]
fn test_construct_with_corrupt_font_fails() {
    let dir = TempDir::new().unwrap();
    let font = dir.path().join("corrupt.ttf");
    std::fs::write(&font, vec![0u8; 512]).unwrap();

    let err = Watermarker::new(&font, 0, 14.0, 72.0, PlacementPosition::default(), 0, 0)
        .unwrap_err();
    assert!(matches!(err, WatermarkError::FontParse { .. }));
}

// Test: start point round-trips exactly, including out-of-bounds values

#[test]
fn test_set_start_point_round_trips() {
    let mut wm = watermarker(14.0, 0, 0);
    for (x, y) in [(0, 0), (15, 25), (-100, -1), (i32::MAX, i32::MIN)] {
        wm.set_start_point(x, y);
        assert_eq!(wm.start_point(), PlacementPosition::new(x, y));
    }
}

// Test: the example scenario - default settings, 800x600 source, "SAMPLE"

#[test]
fn test_sample_on_800x600_changes_only_top_left_band() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 800, 600);
    let dst = dir.path().join("marked.png");

    let wm = watermarker(14.0, 0, 0);
    wm.apply(&src, &dst, "SAMPLE").unwrap();

    let after = open_rgba(&dst);
    assert_eq!(after.dimensions(), (800, 600));

    let changed = changed_pixels(&open_rgba(&src), &after);
    assert!(!changed.is_empty(), "watermark should change some pixels");

    // Overlay is 15 px tall and "SAMPLE" at 14px mono is about 50 px wide
    let overlay_height = wm.overlay_height();
    assert!(changed.iter().all(|&(x, y)| y < overlay_height && (10..100).contains(&x)));
}

#[test]
fn test_glyph_pixels_use_configured_gray() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 200, 40);
    let dst = dir.path().join("marked.png");

    // Large enough that the H stems cover whole pixels
    let wm = Watermarker::new(FONT_PATH, 0, 28.0, 72.0, PlacementPosition::default(), 0, 0)
        .unwrap();
    wm.apply(&src, &dst, "HHHH").unwrap();

    // Fully covered stem pixels are exactly black
    let after = open_rgba(&dst);
    assert!(after.pixels().any(|p| *p == Rgba([0, 0, 0, 255])));
    // Output stays opaque
    assert!(after.pixels().all(|p| p[3] == 255));
}

// Test: overlay pixels that carry no glyph never alter the base image

#[test]
fn test_offset_overlay_only_changes_region_below_start_point() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 300, 200);
    let dst = dir.path().join("marked.png");

    let mut wm = watermarker(14.0, 0, 0);
    wm.set_start_point(40, 100);
    wm.apply(&src, &dst, "OFFSET").unwrap();

    let changed = changed_pixels(&open_rgba(&src), &open_rgba(&dst));
    assert!(!changed.is_empty());
    assert!(changed
        .iter()
        .all(|&(x, y)| x >= 50 && (100..100 + wm.overlay_height()).contains(&y)));
}

#[test]
fn test_start_point_outside_image_leaves_pixels_unchanged() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 120, 80);
    let dst = dir.path().join("marked.png");

    let mut wm = watermarker(14.0, 0, 0);
    wm.set_start_point(5000, -5000);
    wm.apply(&src, &dst, "GONE").unwrap();

    assert_eq!(open_rgba(&src), open_rgba(&dst));
}

#[test]
fn test_empty_text_copies_source() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 64, 64);
    let dst = dir.path().join("marked.png");

    watermarker(14.0, 0, 0).apply(&src, &dst, "").unwrap();

    assert_eq!(open_rgba(&src), open_rgba(&dst));
}

// Test: resize rules

#[test]
fn test_zero_resize_width_keeps_source_width() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 320, 240);
    let dst = dir.path().join("marked.png");

    watermarker(14.0, 0, 0).apply(&src, &dst, "KEEP").unwrap();

    assert_eq!(image::open(&dst).unwrap().dimensions(), (320, 240));
}

#[test]
fn test_nonzero_resize_width_sets_exact_width() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 320, 240);
    let dst = dir.path().join("marked.png");

    watermarker(14.0, 160, 0).apply(&src, &dst, "HALF").unwrap();

    // Height follows the width proportionally
    assert_eq!(image::open(&dst).unwrap().dimensions(), (160, 120));
}

#[test]
fn test_resize_width_and_height_are_exact() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 320, 240);
    let dst = dir.path().join("marked.png");

    watermarker(14.0, 100, 50).apply(&src, &dst, "EXACT").unwrap();

    assert_eq!(image::open(&dst).unwrap().dimensions(), (100, 50));
}

#[test]
fn test_apply_with_override_does_not_touch_configuration() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 320, 240);
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");

    let wm = watermarker(14.0, 0, 0);
    wm.apply_with(&src, &first, "ONE", ResizeTarget::new(64, 0))
        .unwrap();
    wm.apply(&src, &second, "TWO").unwrap();

    assert_eq!(wm.resize_target(), ResizeTarget::unchanged());
    assert_eq!(image::open(&first).unwrap().dimensions(), (64, 48));
    assert_eq!(image::open(&second).unwrap().dimensions(), (320, 240));
}

#[test]
fn test_reused_watermarker_keeps_source_width_per_call() {
    let dir = TempDir::new().unwrap();
    let wide = write_source(&dir, "wide.png", 400, 100);
    let narrow = write_source(&dir, "narrow.png", 100, 100);
    let out_wide = dir.path().join("wide-out.png");
    let out_narrow = dir.path().join("narrow-out.png");

    let wm = watermarker(14.0, 0, 0);
    wm.apply(&wide, &out_wide, "A").unwrap();
    wm.apply(&narrow, &out_narrow, "B").unwrap();

    assert_eq!(image::open(&out_wide).unwrap().width(), 400);
    assert_eq!(image::open(&out_narrow).unwrap().width(), 100);
}

// Test: multi-line text

#[test]
fn test_crlf_lines_are_clipped_to_overlay_height() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 300, 200);
    let one = dir.path().join("one.png");
    let two = dir.path().join("two.png");

    let wm = watermarker(14.0, 0, 0);
    wm.apply(&src, &one, "FIRST").unwrap();
    wm.apply(&src, &two, "FIRST\r\nSECOND").unwrap();

    // The second line lies below the one-line overlay and is clipped away
    assert_eq!(open_rgba(&one), open_rgba(&two));
}

#[test]
fn test_lf_only_text_renders_as_one_line() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 300, 60);
    let joined = dir.path().join("joined.png");
    let plain = dir.path().join("plain.png");

    let wm = watermarker(14.0, 0, 0);
    wm.apply(&src, &joined, "AB\nCD").unwrap();
    wm.apply(&src, &plain, "ABCD").unwrap();

    // '\n' is not a separator and takes no space
    assert_eq!(open_rgba(&joined), open_rgba(&plain));
}

// Test: overlay height follows the configured font size

#[test]
fn test_larger_font_size_marks_taller_band() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 400, 200);
    let small = dir.path().join("small.png");
    let large = dir.path().join("large.png");

    let small_wm = watermarker(14.0, 0, 0);
    let large_wm = watermarker(40.0, 0, 0);
    small_wm.apply(&src, &small, "HH").unwrap();
    large_wm.apply(&src, &large, "HH").unwrap();

    let before = open_rgba(&src);
    let max_row = |path: &Path| {
        changed_pixels(&before, &open_rgba(path))
            .into_iter()
            .map(|(_, y)| y)
            .max()
            .unwrap()
    };

    assert!(max_row(&small) < small_wm.overlay_height());
    assert!(max_row(&large) > small_wm.overlay_height());
    assert!(max_row(&large) < large_wm.overlay_height());
}

// Test: output formats

#[test]
fn test_jpeg_output_decodes() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 200, 100);
    let dst = dir.path().join("marked.jpg");

    watermarker(14.0, 0, 0).apply(&src, &dst, "JPEG").unwrap();

    let decoded = image::open(&dst).unwrap();
    assert_eq!(decoded.dimensions(), (200, 100));
    assert_eq!(image::ImageFormat::from_path(&dst).unwrap(), ImageFormat::Jpeg);
}

#[rstest]
#[case::gif("marked.gif", ImageFormat::Gif)]
#[case::webp("marked.webp", ImageFormat::WebP)]
#[case::bmp("marked.bmp", ImageFormat::Bmp)]
fn test_output_encodes_in_extension_format(#[case] name: &str, #[case] format: ImageFormat) {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 120, 40);
    let dst = dir.path().join(name);

    watermarker(14.0, 0, 0).apply(&src, &dst, "MARK").unwrap();

    let bytes = std::fs::read(&dst).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), format);
    let decoded = image::open(&dst).unwrap();
    assert_eq!(decoded.dimensions(), (120, 40));
    // The text is drawn in black on the left edge of the first row band
    let marked = decoded.to_rgba8();
    assert!((10..60).any(|x| (0..15).any(|y| marked.get_pixel(x, y)[0] < 128)));
}

#[test]
fn test_jpeg_source_is_decoded_by_content() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("photo.dat");
    image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(50, 40, BACKGROUND))
        .to_rgb8()
        .save_with_format(&src, ImageFormat::Jpeg)
        .unwrap();
    let dst = dir.path().join("marked.png");

    watermarker(14.0, 0, 0).apply(&src, &dst, "X").unwrap();

    assert_eq!(image::open(&dst).unwrap().dimensions(), (50, 40));
}

#[test]
fn test_unsupported_extension_fails_before_creating_file() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 50, 50);
    let dst = dir.path().join("marked.xyz");

    let err = watermarker(14.0, 0, 0).apply(&src, &dst, "X").unwrap_err();

    assert!(matches!(err, WatermarkError::UnsupportedFormat { .. }));
    assert!(!dst.exists());
}

// Test: error paths

#[test]
fn test_unwritable_destination_is_io_error() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 50, 50);
    let dst = dir.path().join("missing-dir").join("marked.png");

    let err = watermarker(14.0, 0, 0).apply(&src, &dst, "X").unwrap_err();
    assert!(matches!(err, WatermarkError::Io { .. }));
}

#[test]
fn test_corrupt_source_is_decode_error() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("broken.png");
    std::fs::write(&src, b"not an image at all").unwrap();
    let dst = dir.path().join("marked.png");

    let err = watermarker(14.0, 0, 0).apply(&src, &dst, "X").unwrap_err();
    assert!(matches!(err, WatermarkError::Decode { .. }));
}

#[test]
fn test_missing_source_is_decode_error() {
    let dir = TempDir::new().unwrap();
    let dst = dir.path().join("marked.png");

    let err = watermarker(14.0, 0, 0)
        .apply(dir.path().join("absent.png"), &dst, "X")
        .unwrap_err();
    assert!(matches!(err, WatermarkError::Decode { .. }));
}

#[test]
fn test_unrenderable_line_is_render_error() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "source.png", 50, 50);
    let dst = dir.path().join("marked.png");

    let err = watermarker(14.0, 0, 0)
        .apply(&src, &dst, "ok\r\n\u{10FFFD}")
        .unwrap_err();

    match err {
        WatermarkError::Render { line, .. } => assert_eq!(line, "\u{10FFFD}"),
        other => panic!("expected render error, got {:?}", other),
    }
}
