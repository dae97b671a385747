pub mod image_io;
pub mod pipeline;

pub use image_io::{decode_png, encode_png, load_png, optimize_png, save_png};
pub use pipeline::{CellSizeSource, RegionPlan, RestorePipeline};
