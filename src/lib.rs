//! Repixel - recover the original pixels of upscaled pixel art
//!
//! Command-line shell around the `pixel-grid` library: configuration,
//! PNG I/O, editing sessions and the restore pipeline.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod services;
