pub mod config;
pub mod session;

pub use config::{AppConfig, DetectionConfig, EditorConfig, OutputConfig, SamplingConfig};
pub use session::{
    Edit, EditLimits, GridSnapshot, RegionConfig, RegionRect, Session, SessionFormat,
};
