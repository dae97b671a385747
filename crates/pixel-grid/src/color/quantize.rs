//! Bit-depth reduction and tolerance matching.

use super::rgb::Rgb;

/// Bit depth at which [`reduce_color`] becomes the identity.
pub const FULL_BIT_DEPTH: u8 = 8;

/// Reduce a color to `bits` bits per channel.
///
/// At `bits >= 8` the RGB channels are returned unchanged (alpha, if the input
/// had any, is dropped). Below that each channel is mapped to the *midpoint*
/// of its bucket: with `factor = 256 / 2^bits`,
/// `c -> min(255, (c / factor) * factor + factor / 2)`.
///
/// # Example
/// ```
/// use pixel_grid::{reduce_color, Rgb, Rgba};
///
/// assert_eq!(reduce_color(Rgb::new(128, 64, 200), 4), Rgb::new(136, 72, 200));
/// assert_eq!(reduce_color(Rgba::new(1, 2, 3, 4), 8), Rgb::new(1, 2, 3));
/// ```
pub fn reduce_color<C: Into<Rgb>>(color: C, bits: u8) -> Rgb {
    let color = color.into();
    if bits >= FULL_BIT_DEPTH {
        return color;
    }

    let levels = 1u32 << bits;
    let factor = 256 / levels;
    let reduce = |c: u8| -> u8 {
        let c = c as u32;
        ((c / factor) * factor + factor / 2).min(255) as u8
    };

    Rgb::new(reduce(color.r), reduce(color.g), reduce(color.b))
}

/// True iff every channel differs by at most `tolerance`.
///
/// This is a per-channel (Chebyshev) comparison, not a Euclidean distance;
/// `tolerance == 0` requires exact equality.
#[inline]
pub fn colors_similar(a: Rgb, b: Rgb, tolerance: u8) -> bool {
    a.r.abs_diff(b.r) <= tolerance
        && a.g.abs_diff(b.g) <= tolerance
        && a.b.abs_diff(b.b) <= tolerance
}
