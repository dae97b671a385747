//! Row-major RGBA8 image storage.
//!
//! [`PixelBuffer`] is the read-only source for every detection and sampling
//! call, and the fresh output of every transform. Decoding files into it is
//! the caller's job.

use crate::color::Rgba;
use crate::error::GridError;

/// A `width x height` image of 8-bit RGBA samples in row-major order.
///
/// # Example
///
/// ```
/// use pixel_grid::{PixelBuffer, Rgba};
///
/// let buffer = PixelBuffer::from_fn(3, 2, |x, y| Rgba::opaque(x as u8, y as u8, 0));
/// assert_eq!(buffer.width(), 3);
/// assert_eq!(buffer.pixel(2, 1), Rgba::opaque(2, 1, 0));
/// assert_eq!(buffer.as_bytes().len(), 3 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes.
    ///
    /// Fails with [`GridError::BufferSize`] unless
    /// `data.len() == width * height * 4`. A product that overflows `usize`
    /// is reported as `expected: usize::MAX`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, GridError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(GridError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        let data = color.to_bytes().repeat(width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// A fully transparent buffer.
    pub fn transparent(width: usize, height: usize) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Rgba,
    {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y).to_bytes());
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Read one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} buffer",
            x,
            y,
            self.width,
            self.height
        );
        let i = (y * self.width + x) * 4;
        Rgba::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        )
    }

    /// Read the pixel nearest to `(x, y)`, clamping both coordinates into
    /// the buffer. The buffer must not be empty.
    #[inline]
    pub fn pixel_clamped(&self, x: usize, y: usize) -> Rgba {
        self.pixel(x.min(self.width - 1), y.min(self.height - 1))
    }

    /// Overwrite one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        assert!(x < self.width && y < self.height);
        let i = (y * self.width + x) * 4;
        self.data[i..i + 4].copy_from_slice(&color.to_bytes());
    }

    /// One row of raw RGBA bytes.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.width * 4;
        &self.data[y * stride..(y + 1) * stride]
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Copy out the region between two corners.
    ///
    /// Corners are normalised (either order works) and clamped to the buffer;
    /// the far edges are exclusive. Fails with [`GridError::EmptyResult`] if
    /// nothing remains after clamping.
    pub fn crop(&self, x1: usize, y1: usize, x2: usize, y2: usize) -> Result<Self, GridError> {
        let (left, right) = (x1.min(x2).min(self.width), x1.max(x2).min(self.width));
        let (top, bottom) = (y1.min(y2).min(self.height), y1.max(y2).min(self.height));
        let (width, height) = (right - left, bottom - top);
        if width == 0 || height == 0 {
            return Err(GridError::EmptyResult { width, height });
        }

        let mut data = Vec::with_capacity(width * height * 4);
        for y in top..bottom {
            let row = self.row(y);
            data.extend_from_slice(&row[left * 4..right * 4]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            GridError::BufferSize {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_from_raw_overflowing_dimensions() {
        let err = PixelBuffer::from_raw(usize::MAX, 2, vec![0; 8]).unwrap_err();
        assert_eq!(
            err,
            GridError::BufferSize {
                expected: usize::MAX,
                actual: 8
            }
        );
    }

    #[test]
    fn test_from_raw_reads_back() {
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let buffer = PixelBuffer::from_raw(2, 1, data.clone()).unwrap();
        assert_eq!(buffer.pixel(1, 0), Rgba::new(5, 6, 7, 8));
        assert_eq!(buffer.into_raw(), data);
    }

    #[test]
    fn test_set_pixel() {
        let mut buffer = PixelBuffer::transparent(3, 3);
        buffer.set_pixel(1, 2, Rgba::opaque(9, 9, 9));
        assert_eq!(buffer.pixel(1, 2), Rgba::opaque(9, 9, 9));
        assert_eq!(buffer.pixel(2, 1), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_pixel_clamped() {
        let buffer = PixelBuffer::from_fn(2, 2, |x, y| Rgba::opaque(x as u8, y as u8, 0));
        assert_eq!(buffer.pixel_clamped(10, 0), Rgba::opaque(1, 0, 0));
        assert_eq!(buffer.pixel_clamped(0, 99), Rgba::opaque(0, 1, 0));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_pixel_out_of_bounds_panics() {
        PixelBuffer::transparent(2, 2).pixel(2, 0);
    }

    #[test]
    fn test_crop_normalises_corners() {
        let buffer = PixelBuffer::from_fn(4, 4, |x, y| Rgba::opaque(x as u8, y as u8, 0));
        let crop = buffer.crop(3, 3, 1, 1).unwrap();
        assert_eq!((crop.width(), crop.height()), (2, 2));
        assert_eq!(crop.pixel(0, 0), Rgba::opaque(1, 1, 0));
        assert_eq!(crop.pixel(1, 1), Rgba::opaque(2, 2, 0));
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let buffer = PixelBuffer::transparent(4, 3);
        let crop = buffer.crop(2, 1, 100, 100).unwrap();
        assert_eq!((crop.width(), crop.height()), (2, 2));
    }

    #[test]
    fn test_crop_empty_region() {
        let buffer = PixelBuffer::transparent(4, 4);
        assert!(matches!(
            buffer.crop(2, 0, 2, 4),
            Err(GridError::EmptyResult { width: 0, .. })
        ));
        assert!(buffer.crop(10, 10, 20, 20).is_err());
    }
}
