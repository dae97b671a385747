use pixel_grid::{
    detect, transform_custom, transform_uniform, Detection, ExclusionSpec, GridModel, PixelBuffer,
    SampleOptions,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::config::parse_colors;
use crate::models::{AppConfig, EditLimits, GridSnapshot, RegionConfig, Session};

/// Where a region's cell size came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSizeSource {
    /// Given by the caller or the session
    Explicit,
    /// Found by block detection
    Detected,
    /// Detection found nothing; derived from the image size
    Fallback,
}

/// Everything needed to sample one region
#[derive(Debug, Clone)]
pub struct RegionPlan {
    /// The (cropped) source pixels
    pub buffer: PixelBuffer,
    /// Grid after snapshot restore and edit replay
    pub grid: GridModel,
    pub options: SampleOptions,
    /// Uniform cell size, `None` when the grid came from a snapshot
    pub cell_size: Option<(usize, CellSizeSource)>,
    pub offset_x: i64,
    pub offset_y: i64,
    /// Sample with the custom-grid sampler
    pub custom: bool,
}

/// Pipeline that turns regions of a source image into restored images
pub struct RestorePipeline {
    config: Arc<AppConfig>,
}

impl RestorePipeline {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run block detection with the configured options.
    pub fn detect(&self, buffer: &PixelBuffer) -> Detection {
        let detection = detect(buffer, &self.config.detection.detect_options());
        for &(size, fraction) in &detection.scores {
            tracing::debug!(size, fraction, "Detection candidate");
        }
        if detection.found() {
            tracing::info!(
                size = detection.size,
                width = buffer.width() / detection.size,
                height = buffer.height() / detection.size,
                "Detected pixel size"
            );
        } else {
            tracing::info!(candidates = detection.scores.len(), "No repeating pattern found");
        }
        detection
    }

    /// Pick a cell size: explicit, then detected, then the size-based fallback.
    pub fn choose_cell_size(
        &self,
        buffer: &PixelBuffer,
        explicit: Option<usize>,
    ) -> (usize, CellSizeSource) {
        if let Some(size) = explicit {
            return (size, CellSizeSource::Explicit);
        }
        let detection = self.detect(buffer);
        if detection.found() {
            return (detection.size, CellSizeSource::Detected);
        }
        let size = self
            .config
            .detection
            .fallback_cell_size(buffer.width(), buffer.height());
        tracing::info!(size, "Using fallback cell size");
        (size, CellSizeSource::Fallback)
    }

    /// The part of `image` a region covers.
    pub fn region_buffer(
        &self,
        image: &PixelBuffer,
        region: &RegionConfig,
    ) -> Result<PixelBuffer, AppError> {
        match region.rect {
            Some(rect) => Ok(image.crop(rect.x1, rect.y1, rect.x2, rect.y2)?),
            None => Ok(image.clone()),
        }
    }

    /// Sampling options for a region, falling back to the config per field.
    pub fn sample_options(&self, region: &RegionConfig) -> Result<SampleOptions, AppError> {
        let sampling = &self.config.sampling;
        let bit_depth = region.bit_depth.unwrap_or(sampling.bit_depth);
        if !(1..=8).contains(&bit_depth) {
            return Err(AppError::Session(format!(
                "bit_depth must be 1..=8, got {bit_depth}"
            )));
        }
        let tolerance = region.tolerance.unwrap_or(sampling.tolerance);
        let colors = match &region.exclude {
            Some(colors) => parse_colors(colors)?,
            None => sampling.exclude_colors()?,
        };
        let exclusion = ExclusionSpec::from_colors(&colors, tolerance)?;
        Ok(SampleOptions::new().bit_depth(bit_depth).exclusion(exclusion))
    }

    /// Crop, choose the grid and replay edits for one region.
    pub fn plan_region(
        &self,
        image: &PixelBuffer,
        region: &RegionConfig,
    ) -> Result<RegionPlan, AppError> {
        let buffer = self.region_buffer(image, region)?;
        let options = self.sample_options(region)?;

        let (mut grid, cell_size) = match &region.grid {
            Some(snapshot) => (snapshot.to_grid()?, None),
            None => {
                let (size, source) = self.choose_cell_size(&buffer, region.cell_size);
                let grid = GridModel::from_uniform(
                    buffer.width(),
                    buffer.height(),
                    size,
                    region.offset_x,
                    region.offset_y,
                )?;
                (grid, Some((size, source)))
            }
        };

        let limits = EditLimits::from(&self.config.editor);
        for (i, edit) in region.edits.iter().enumerate() {
            let changed = edit.apply(&mut grid, limits).map_err(|e| match e {
                AppError::Session(msg) => AppError::Session(format!("edit {}: {msg}", i + 1)),
                other => other,
            })?;
            tracing::debug!(edit = i + 1, changed, "Applied edit");
        }

        Ok(RegionPlan {
            buffer,
            grid,
            options,
            cell_size,
            offset_x: region.offset_x,
            offset_y: region.offset_y,
            custom: region.has_custom_grid(),
        })
    }

    /// Restore one region.
    ///
    /// Regions with a grid snapshot or edits go through the custom-grid
    /// sampler; plain regions use the uniform sampler.
    pub fn run_region(
        &self,
        image: &PixelBuffer,
        region: &RegionConfig,
    ) -> Result<PixelBuffer, AppError> {
        let plan = self.plan_region(image, region)?;
        let output = match plan.cell_size {
            Some((size, _)) if !plan.custom => {
                transform_uniform(&plan.buffer, size, plan.offset_x, plan.offset_y, &plan.options)?
            }
            _ => transform_custom(&plan.buffer, &plan.grid, &plan.options)?,
        };
        tracing::info!(
            width = output.width(),
            height = output.height(),
            custom = plan.custom,
            "Restored region"
        );
        Ok(output)
    }

    /// Restore every region of a session, in order. A session without
    /// regions restores the whole image once.
    pub fn run_session(
        &self,
        session: &Session,
        image: &PixelBuffer,
    ) -> Result<Vec<PixelBuffer>, AppError> {
        if session.regions.is_empty() {
            return Ok(vec![self.run_region(image, &RegionConfig::default())?]);
        }
        session
            .regions
            .iter()
            .map(|region| self.run_region(image, region))
            .collect()
    }

    /// A region seeded with an editable grid snapshot, for `init`.
    pub fn seed_region(
        &self,
        image: &PixelBuffer,
        mut region: RegionConfig,
    ) -> Result<RegionConfig, AppError> {
        let plan = self.plan_region(image, &region)?;
        if let Some((size, _)) = plan.cell_size {
            region.cell_size = Some(size);
        }
        region.grid = Some(GridSnapshot::from(&plan.grid));
        region.edits.clear();
        Ok(region)
    }

    /// Output path for `input`: `<stem><suffix>.png`, or
    /// `<stem><region_suffix><n><suffix>.png` when `region` (1-based) is given.
    /// Written next to the input unless `out_dir` is set.
    pub fn output_path(&self, input: &Path, out_dir: Option<&Path>, region: Option<usize>) -> PathBuf {
        let output = &self.config.output;
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let name = match region {
            Some(n) => format!("{stem}{}{n}{}.png", output.region_suffix, output.suffix),
            None => format!("{stem}{}.png", output.suffix),
        };
        let dir = out_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edit, RegionRect};
    use pixel_grid::{CellState, Rgba};
    use pretty_assertions::assert_eq;

    fn pipeline() -> RestorePipeline {
        RestorePipeline::new(Arc::new(AppConfig::default()))
    }

    /// `cols x rows` art of distinct colors scaled by `scale`.
    fn art(cols: usize, rows: usize, scale: usize) -> PixelBuffer {
        PixelBuffer::from_fn(cols * scale, rows * scale, |x, y| {
            Rgba::opaque((x / scale * 30) as u8, (y / scale * 30) as u8, 77)
        })
    }

    #[test]
    fn test_choose_cell_size_order() {
        let p = pipeline();
        let buffer = art(6, 6, 8);
        assert_eq!(p.choose_cell_size(&buffer, Some(3)), (3, CellSizeSource::Explicit));
        assert_eq!(p.choose_cell_size(&buffer, None), (8, CellSizeSource::Detected));

        // 1px noise: nothing repeats, 90 / 30 = 3
        let noise = PixelBuffer::from_fn(90, 90, |x, y| {
            Rgba::opaque((x * 7 + y * 13) as u8, (x * y) as u8, (x ^ y) as u8)
        });
        assert_eq!(p.choose_cell_size(&noise, None), (3, CellSizeSource::Fallback));
    }

    #[test]
    fn test_plain_region_uses_uniform_sampler() {
        let p = pipeline();
        let image = art(5, 4, 6);
        let out = p.run_region(&image, &RegionConfig::default()).unwrap();
        assert_eq!((out.width(), out.height()), (5, 4));
        assert_eq!(out.pixel(4, 3), Rgba::opaque(120, 90, 77));
    }

    #[test]
    fn test_region_crop_and_offset() {
        let p = pipeline();
        let image = art(8, 8, 4);
        let region = RegionConfig {
            rect: Some(RegionRect { x1: 8, y1: 8, x2: 24, y2: 20 }),
            cell_size: Some(4),
            ..RegionConfig::default()
        };
        let out = p.run_region(&image, &region).unwrap();
        assert_eq!((out.width(), out.height()), (4, 3));
        assert_eq!(out.pixel(0, 0), Rgba::opaque(60, 60, 77));
    }

    #[test]
    fn test_region_with_edits_uses_custom_sampler() {
        let p = pipeline();
        let image = art(4, 4, 5);
        let region = RegionConfig {
            cell_size: Some(5),
            edits: vec![Edit::Toggle { col: 0, row: 0 }, Edit::MoveXLine { index: 1, position: 4 }],
            ..RegionConfig::default()
        };
        let plan = p.plan_region(&image, &region).unwrap();
        assert!(plan.custom);
        assert_eq!(plan.grid.cell_state(0, 0), CellState::Excluded);
        assert_eq!(plan.grid.x_lines(), &[0, 4, 10, 15, 20]);

        let out = p.run_region(&image, &region).unwrap();
        assert_eq!(out.pixel(0, 0), Rgba::TRANSPARENT);
        assert_eq!(out.pixel(1, 0), Rgba::opaque(30, 0, 77));
    }

    #[test]
    fn test_failed_edit_names_its_position() {
        let p = pipeline();
        let region = RegionConfig {
            cell_size: Some(5),
            edits: vec![Edit::Invert, Edit::MoveYLine { index: 0, position: 1 }],
            ..RegionConfig::default()
        };
        let err = p.plan_region(&art(2, 2, 5), &region).unwrap_err();
        assert!(err.to_string().contains("edit 2"), "{err}");
    }

    #[test]
    fn test_region_sampling_overrides_config() {
        let config = AppConfig {
            sampling: crate::models::SamplingConfig {
                exclude: vec!["#000000".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let p = RestorePipeline::new(Arc::new(config));
        let from_config = p.sample_options(&RegionConfig::default()).unwrap();
        assert!(!from_config.exclusion.is_empty());

        let region = RegionConfig {
            exclude: Some(vec![]),
            bit_depth: Some(4),
            ..RegionConfig::default()
        };
        let options = p.sample_options(&region).unwrap();
        assert!(options.exclusion.is_empty());
        assert_eq!(options.bit_depth, 4);

        let bad = RegionConfig {
            bit_depth: Some(0),
            ..RegionConfig::default()
        };
        assert!(matches!(p.sample_options(&bad), Err(AppError::Session(_))));
    }

    #[test]
    fn test_run_session_one_output_per_region() {
        let p = pipeline();
        let image = art(4, 2, 4);
        let mut session = Session::new("sheet.png");
        assert_eq!(p.run_session(&session, &image).unwrap().len(), 1);

        session.regions = vec![
            RegionConfig {
                rect: Some(RegionRect { x1: 0, y1: 0, x2: 8, y2: 8 }),
                cell_size: Some(4),
                ..RegionConfig::default()
            },
            RegionConfig {
                rect: Some(RegionRect { x1: 8, y1: 0, x2: 16, y2: 8 }),
                cell_size: Some(4),
                ..RegionConfig::default()
            },
        ];
        let outputs = p.run_session(&session, &image).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[1].pixel(0, 0), Rgba::opaque(60, 0, 77));
    }

    #[test]
    fn test_seed_region_snapshot_round_trips() {
        let p = pipeline();
        let image = art(3, 3, 4);
        let seeded = p.seed_region(&image, RegionConfig::default()).unwrap();
        assert_eq!(seeded.cell_size, Some(4));
        let snapshot = seeded.grid.clone().unwrap();
        assert_eq!(snapshot.x_lines, vec![0, 4, 8, 12]);

        let out = p.run_region(&image, &seeded).unwrap();
        let uniform = p.run_region(&image, &RegionConfig::default()).unwrap();
        assert_eq!(out, uniform);
    }

    #[test]
    fn test_output_path_naming() {
        let p = pipeline();
        let input = Path::new("/art/hero.png");
        assert_eq!(p.output_path(input, None, None), PathBuf::from("/art/hero_real.png"));
        assert_eq!(
            p.output_path(input, Some(Path::new("/out")), Some(2)),
            PathBuf::from("/out/hero_region2_real.png")
        );
    }
}
