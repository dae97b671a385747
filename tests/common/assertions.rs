//! Assertion helpers for tests.

use pixel_grid::PixelBuffer;
use pretty_assertions::assert_eq;
use std::path::Path;

use repixel::services::load_png;

/// Assert `buffer` has the given dimensions
pub fn assert_size(buffer: &PixelBuffer, width: usize, height: usize) {
    assert_eq!(
        (buffer.width(), buffer.height()),
        (width, height),
        "Expected a {}x{} image",
        width,
        height
    );
}

/// Assert every pixel of `buffer` equals `expected(x, y)`
pub fn assert_pixels<F>(buffer: &PixelBuffer, expected: F)
where
    F: Fn(usize, usize) -> pixel_grid::Rgba,
{
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            assert_eq!(
                buffer.pixel(x, y),
                expected(x, y),
                "Pixel ({}, {}) differs",
                x,
                y
            );
        }
    }
}

/// Assert `path` is a PNG file and return its decoded pixels
pub fn assert_png_file(path: &Path) -> PixelBuffer {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Expected PNG at {}: {}", path.display(), e));
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G']),
        "Expected PNG signature, got {:?}",
        &bytes[..8.min(bytes.len())]
    );
    load_png(path).expect("PNG should decode")
}

/// Count the fully transparent pixels of `buffer`
pub fn transparent_count(buffer: &PixelBuffer) -> usize {
    buffer
        .as_bytes()
        .chunks_exact(4)
        .filter(|px| px[3] == 0)
        .count()
}
