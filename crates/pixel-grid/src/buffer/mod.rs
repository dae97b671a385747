//! The RGBA pixel buffer consumed and produced by the samplers.

mod pixel_buffer;

pub use pixel_buffer::PixelBuffer;
