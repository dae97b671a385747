use pixel_grid::{DetectOptions, ExclusionSpec, Rgb, SampleOptions, MAX_EXCLUDED_COLORS};
use serde::Deserialize;
use std::path::Path;

use crate::error::AppError;

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "REPIXEL_CONFIG";

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub sampling: SamplingConfig,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Grid-size detection and the fallback used when detection finds nothing
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Largest block size tried
    #[serde(default = "default_max_check")]
    pub max_check: usize,

    /// Fraction of sampled blocks that must be uniform
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Blocks sampled per candidate size
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,

    /// Fallback grid aims for roughly this many cells across the short side
    #[serde(default = "default_fallback_min_cells")]
    pub fallback_min_cells: usize,

    /// Upper bound for the fallback cell size
    #[serde(default = "default_fallback_max_size")]
    pub fallback_max_size: usize,

    /// Lower bound for the fallback cell size
    #[serde(default = "default_min_size")]
    pub min_size: usize,
}

fn default_max_check() -> usize {
    128
}

fn default_threshold() -> f64 {
    0.95
}

fn default_max_samples() -> usize {
    100
}

fn default_fallback_min_cells() -> usize {
    30
}

fn default_fallback_max_size() -> usize {
    64
}

fn default_min_size() -> usize {
    2
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_check: default_max_check(),
            threshold: default_threshold(),
            max_samples: default_max_samples(),
            fallback_min_cells: default_fallback_min_cells(),
            fallback_max_size: default_fallback_max_size(),
            min_size: default_min_size(),
        }
    }
}

impl DetectionConfig {
    pub fn detect_options(&self) -> DetectOptions {
        DetectOptions::new()
            .max_check(self.max_check)
            .threshold(self.threshold)
            .max_samples(self.max_samples)
    }

    /// Cell size used when detection finds no repeating pattern:
    /// about `fallback_min_cells` cells across the short side, kept within
    /// `[min_size, fallback_max_size]`.
    pub fn fallback_cell_size(&self, width: usize, height: usize) -> usize {
        (width.min(height) / self.fallback_min_cells)
            .max(self.min_size)
            .min(self.fallback_max_size)
    }
}

/// Quantization and background exclusion defaults
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SamplingConfig {
    #[serde(default = "default_bit_depth")]
    pub bit_depth: u8,

    #[serde(default = "default_tolerance")]
    pub tolerance: u8,

    /// Hex colors (`#RRGGBB` or `#RGB`) that become transparent
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_bit_depth() -> u8 {
    8
}

fn default_tolerance() -> u8 {
    pixel_grid::DEFAULT_TOLERANCE
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            bit_depth: default_bit_depth(),
            tolerance: default_tolerance(),
            exclude: Vec::new(),
        }
    }
}

impl SamplingConfig {
    pub fn exclude_colors(&self) -> Result<Vec<Rgb>, AppError> {
        parse_colors(&self.exclude)
    }

    pub fn sample_options(&self) -> Result<SampleOptions, AppError> {
        let exclusion = ExclusionSpec::from_colors(&self.exclude_colors()?, self.tolerance)?;
        Ok(SampleOptions::new()
            .bit_depth(self.bit_depth)
            .exclusion(exclusion))
    }
}

/// Parse a list of hex colors, naming the offending entry on failure.
pub fn parse_colors(colors: &[String]) -> Result<Vec<Rgb>, AppError> {
    colors
        .iter()
        .map(|s| {
            s.parse::<Rgb>()
                .map_err(|e| AppError::Config(format!("exclude color {s:?}: {e}")))
        })
        .collect()
}

/// Limits for interactive grid edits replayed from sessions
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EditorConfig {
    /// Closest two grid lines may be moved together
    #[serde(default = "default_min_cell_size")]
    pub min_cell_size: usize,

    /// A contour click within this distance of the first point closes it
    #[serde(default = "default_contour_close_radius")]
    pub contour_close_radius: f64,
}

fn default_min_cell_size() -> usize {
    2
}

fn default_contour_close_radius() -> f64 {
    10.0
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_cell_size: default_min_cell_size(),
            contour_close_radius: default_contour_close_radius(),
        }
    }
}

/// Output file naming and encoding
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_suffix")]
    pub suffix: String,

    #[serde(default = "default_region_suffix")]
    pub region_suffix: String,

    /// Re-compress output PNGs with oxipng
    #[serde(default)]
    pub optimize: bool,
}

fn default_suffix() -> String {
    "_real".to_string()
}

fn default_region_suffix() -> String {
    "_region".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            region_suffix: default_region_suffix(),
            optimize: false,
        }
    }
}

impl AppConfig {
    /// Resolve the configuration for a run.
    ///
    /// An explicit path must load cleanly. Without one, the file named by
    /// `REPIXEL_CONFIG` is used if it exists; problems with it are logged and
    /// the defaults used instead.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            tracing::info!(path = %path.display(), "Loaded configuration");
            return Ok(config);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Ok(Self::load_or_default(Path::new(&path))),
            None => Ok(Self::default()),
        }
    }

    /// Load `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded configuration");
                config
            }
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML. An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, AppError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let d = &self.detection;
        if d.max_check < 2 {
            return Err(AppError::Config(format!(
                "detection.max_check must be at least 2, got {}",
                d.max_check
            )));
        }
        if !(d.threshold > 0.0 && d.threshold <= 1.0) {
            return Err(AppError::Config(format!(
                "detection.threshold must be in (0, 1], got {}",
                d.threshold
            )));
        }
        if d.max_samples == 0 || d.fallback_min_cells == 0 || d.min_size == 0 {
            return Err(AppError::Config(
                "detection.max_samples, fallback_min_cells and min_size must be positive"
                    .to_string(),
            ));
        }
        if d.fallback_max_size < d.min_size {
            return Err(AppError::Config(format!(
                "detection.fallback_max_size ({}) is below min_size ({})",
                d.fallback_max_size, d.min_size
            )));
        }

        let s = &self.sampling;
        if !(1..=8).contains(&s.bit_depth) {
            return Err(AppError::Config(format!(
                "sampling.bit_depth must be 1..=8, got {}",
                s.bit_depth
            )));
        }
        if s.exclude.len() > MAX_EXCLUDED_COLORS {
            return Err(AppError::Config(format!(
                "sampling.exclude holds at most {} colors, got {}",
                MAX_EXCLUDED_COLORS,
                s.exclude.len()
            )));
        }
        s.exclude_colors()?;

        if self.editor.min_cell_size == 0 {
            return Err(AppError::Config(
                "editor.min_cell_size must be at least 1".to_string(),
            ));
        }
        let radius = self.editor.contour_close_radius;
        if radius.is_nan() || radius < 0.0 {
            return Err(AppError::Config(format!(
                "editor.contour_close_radius must not be negative, got {}",
                radius
            )));
        }
        Ok(())
    }
}
