//! Test fixtures and constants.

use pixel_grid::{PixelBuffer, Rgba};
use std::path::{Path, PathBuf};

use repixel::services::save_png;

/// Colors used by the fixture sprites
pub mod colors {
    use pixel_grid::Rgba;

    /// Background that tests exclude
    pub const MAGENTA: Rgba = Rgba::opaque(255, 0, 255);

    /// Four-color palette with no two entries within tolerance 10
    pub const PALETTE: [Rgba; 4] = [
        Rgba::opaque(20, 12, 28),
        Rgba::opaque(208, 70, 72),
        Rgba::opaque(109, 170, 44),
        Rgba::opaque(222, 238, 214),
    ];
}

/// The art pixel at `(x, y)` of the diagonal fixture sprite
pub fn art_pixel(x: usize, y: usize) -> Rgba {
    colors::PALETTE[(x + y) % 4]
}

/// `cols x rows` diagonal sprite, every art pixel scaled to `scale x scale`
pub fn scaled_sprite(cols: usize, rows: usize, scale: usize) -> PixelBuffer {
    PixelBuffer::from_fn(cols * scale, rows * scale, |x, y| {
        art_pixel(x / scale, y / scale)
    })
}

/// Sprite on a magenta background: a `cols x rows` sprite scaled by `scale`
/// with a one-art-pixel magenta border on every side
pub fn sprite_on_background(cols: usize, rows: usize, scale: usize) -> PixelBuffer {
    PixelBuffer::from_fn((cols + 2) * scale, (rows + 2) * scale, |x, y| {
        let (col, row) = (x / scale, y / scale);
        if col == 0 || row == 0 || col > cols || row > rows {
            colors::MAGENTA
        } else {
            art_pixel(col - 1, row - 1)
        }
    })
}

/// Two sprites side by side, the left scaled 4x and the right 8x
pub fn sprite_sheet() -> PixelBuffer {
    let left = scaled_sprite(4, 4, 4);
    let right = scaled_sprite(2, 2, 8);
    PixelBuffer::from_fn(32, 16, |x, y| {
        if x < 16 {
            left.pixel(x, y)
        } else {
            right.pixel(x - 16, y)
        }
    })
}

/// Write `buffer` as a PNG into `dir` and return its path
pub fn write_png(dir: &Path, name: &str, buffer: &PixelBuffer) -> PathBuf {
    let path = dir.join(name);
    save_png(&path, buffer, false).expect("fixture PNG should be writable");
    path
}
