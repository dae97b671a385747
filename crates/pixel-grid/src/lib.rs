//! pixel-grid: recover the true pixels of upscaled pixel art
//!
//! Pixel art is often distributed at the wrong scale: every art pixel has
//! become a block of identical screen pixels, sometimes with uneven block
//! sizes after a non-integer resize. This library finds the block grid and
//! reads one sample per cell to get the original image back.
//!
//! # Quick Start
//!
//! ```
//! use pixel_grid::{detect_pixel_size, transform_uniform, PixelBuffer, Rgba, SampleOptions};
//!
//! // 4x4 checkerboard scaled 8x
//! let buffer = PixelBuffer::from_fn(32, 32, |x, y| {
//!     if (x / 8 + y / 8) % 2 == 0 { Rgba::opaque(0, 0, 0) } else { Rgba::opaque(255, 255, 255) }
//! });
//!
//! let size = detect_pixel_size(&buffer, 128, 0.95);
//! assert_eq!(size, 8);
//!
//! let restored = transform_uniform(&buffer, size, 0, 0, &SampleOptions::default()).unwrap();
//! assert_eq!((restored.width(), restored.height()), (4, 4));
//! ```
//!
//! # Custom Grids
//!
//! When the blocks are not all the same size, seed a [`GridModel`] from a
//! uniform layout, move individual cut lines, mark cells, and sample with
//! [`transform_custom`]:
//!
//! ```
//! use pixel_grid::{transform_custom, GridModel, PixelBuffer, Rgba, SampleOptions};
//!
//! let buffer = PixelBuffer::filled(20, 10, Rgba::opaque(9, 9, 9));
//! let mut grid = GridModel::from_uniform(20, 10, 5, 0, 0).unwrap();
//! grid.move_x_line(1, 7, 2);
//! grid.toggle_cell(0, 0);
//!
//! let out = transform_custom(&buffer, &grid, &SampleOptions::default()).unwrap();
//! assert_eq!(out.pixel(0, 0), Rgba::TRANSPARENT);
//! assert_eq!(out.pixel(1, 0), Rgba::opaque(9, 9, 9));
//! ```
//!
//! # Override Precedence
//!
//! A cell is in one of three [`CellState`]s. Manual flags always win:
//!
//! | State | Result |
//! |-------|--------|
//! | `Excluded` | transparent, color not inspected |
//! | `Included` | sampled color, even if it matches an exclusion color |
//! | `Default` | transparent if the quantized color matches an exclusion color |
//!
//! The uniform sampler has no overrides; every cell is `Default`.
//!
//! Nothing in this crate logs, performs I/O or spawns threads. Every call is
//! a pure function of its arguments.

pub mod buffer;
pub mod color;
pub mod detect;
mod error;
pub mod grid;
pub mod sample;

mod domain_tests;

pub use buffer::PixelBuffer;
pub use color::{
    colors_similar, reduce_color, ExclusionSpec, ParseColorError, Rgb, Rgba, DEFAULT_TOLERANCE,
    FULL_BIT_DEPTH, MAX_EXCLUDED_COLORS,
};
pub use detect::{
    candidate_sizes, detect, detect_pixel_size, uniform_fraction, DetectOptions, Detection,
    CANONICAL_SIZES,
};
pub use error::GridError;
pub use grid::{point_in_polygon, Cell, CellBounds, CellState, Contour, GridModel, Point, Rect};
pub use sample::{
    decide, preview_custom, transform_custom, transform_uniform, CellDecision, CellPreview,
    SampleOptions,
};
