use pixel_grid::{Cell, Contour, GridModel, Point, Rect};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::AppError;
use crate::models::config::EditorConfig;

/// A saved editing session: one source image and the regions cut from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Source image, relative paths resolve against the session file
    pub source: PathBuf,

    #[serde(default)]
    pub regions: Vec<RegionConfig>,
}

/// How one region of the source is restored.
///
/// Unset sampling fields fall back to the application config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Sub-rectangle of the source; the whole image when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<RegionRect>,

    /// Cell size; detected when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_size: Option<usize>,

    #[serde(default)]
    pub offset_x: i64,

    #[serde(default)]
    pub offset_y: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_depth: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<u8>,

    /// Hex colors that become transparent; `[]` disables the config's list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    /// Explicit grid, replacing the uniform one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSnapshot>,

    /// Edits replayed in order on top of the grid
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<Edit>,
}

impl RegionConfig {
    /// True when the region needs the custom-grid sampler.
    pub fn has_custom_grid(&self) -> bool {
        self.grid.is_some() || !self.edits.is_empty()
    }
}

/// Crop rectangle in source pixels; `x2`/`y2` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRect {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
}

impl FromStr for RegionRect {
    type Err = String;

    /// Parse `X1,Y1,X2,Y2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<usize> = s
            .split(',')
            .map(|p| p.trim().parse::<usize>())
            .collect::<Result<_, _>>()
            .map_err(|e| format!("invalid region {s:?}: {e}"))?;
        match parts.as_slice() {
            &[x1, y1, x2, y2] => Ok(Self { x1, y1, x2, y2 }),
            _ => Err(format!("invalid region {s:?}: expected X1,Y1,X2,Y2")),
        }
    }
}

/// Serialised form of a [`GridModel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub x_lines: Vec<usize>,
    pub y_lines: Vec<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<Cell>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Cell>,
}

impl From<&GridModel> for GridSnapshot {
    fn from(grid: &GridModel) -> Self {
        Self {
            x_lines: grid.x_lines().to_vec(),
            y_lines: grid.y_lines().to_vec(),
            excluded: grid.excluded_cells().iter().copied().collect(),
            included: grid.included_cells().iter().copied().collect(),
        }
    }
}

impl GridSnapshot {
    /// Rebuild the grid, re-checking every invariant.
    pub fn to_grid(&self) -> Result<GridModel, AppError> {
        let grid = GridModel::from_parts(
            self.x_lines.clone(),
            self.y_lines.clone(),
            self.excluded.iter().copied(),
            self.included.iter().copied(),
        )?;
        Ok(grid)
    }
}

/// One recorded grid edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    Toggle { col: usize, row: usize },
    IncludeRect { x1: i64, y1: i64, x2: i64, y2: i64 },
    ExcludeRect { x1: i64, y1: i64, x2: i64, y2: i64 },
    IncludePolygon { points: Vec<(i64, i64)> },
    ExcludeOutsidePolygon { points: Vec<(i64, i64)> },
    /// Contour drawn click by click; only applied if the clicks close it
    IncludeContour { clicks: Vec<(i64, i64)> },
    ExcludeOutsideContour { clicks: Vec<(i64, i64)> },
    IncludeAll,
    ExcludeAll,
    Invert,
    MoveXLine { index: usize, position: usize },
    MoveYLine { index: usize, position: usize },
}

/// Limits an edit replay honours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditLimits {
    pub min_cell_size: usize,
    pub contour_close_radius: f64,
}

impl From<&EditorConfig> for EditLimits {
    fn from(editor: &EditorConfig) -> Self {
        Self {
            min_cell_size: editor.min_cell_size,
            contour_close_radius: editor.contour_close_radius,
        }
    }
}

impl Edit {
    /// Apply the edit to `grid`, returning how many cells (or lines) changed.
    pub fn apply(&self, grid: &mut GridModel, limits: EditLimits) -> Result<usize, AppError> {
        let changed = match self {
            Edit::Toggle { col, row } => {
                grid.toggle_cell(*col, *row).ok_or_else(|| {
                    AppError::Session(format!("cell ({col}, {row}) is outside the grid"))
                })?;
                1
            }
            Edit::IncludeRect { x1, y1, x2, y2 } => {
                grid.include_in_rectangle(&rect(*x1, *y1, *x2, *y2))
            }
            Edit::ExcludeRect { x1, y1, x2, y2 } => {
                grid.exclude_in_rectangle(&rect(*x1, *y1, *x2, *y2))
            }
            Edit::IncludePolygon { points } => grid.include_in_polygon(&to_points(points)),
            Edit::ExcludeOutsidePolygon { points } => {
                grid.exclude_outside_polygon(&to_points(points))
            }
            Edit::IncludeContour { clicks } => {
                grid.include_in_contour(&replay_clicks(clicks, limits.contour_close_radius))
            }
            Edit::ExcludeOutsideContour { clicks } => {
                grid.exclude_outside_contour(&replay_clicks(clicks, limits.contour_close_radius))
            }
            Edit::IncludeAll => {
                let n = grid.excluded_cells().len();
                grid.include_all();
                n
            }
            Edit::ExcludeAll => {
                let before = grid.excluded_cells().len();
                grid.exclude_all();
                grid.excluded_cells().len() - before
            }
            Edit::Invert => {
                grid.invert_exclusions();
                grid.num_cols() * grid.num_rows()
            }
            Edit::MoveXLine { index, position } => {
                move_result(grid.move_x_line(*index, *position, limits.min_cell_size), "x", *index)?
            }
            Edit::MoveYLine { index, position } => {
                move_result(grid.move_y_line(*index, *position, limits.min_cell_size), "y", *index)?
            }
        };
        Ok(changed)
    }
}

fn rect(x1: i64, y1: i64, x2: i64, y2: i64) -> Rect {
    Rect::from_corners(Point::new(x1, y1), Point::new(x2, y2))
}

fn to_points(points: &[(i64, i64)]) -> Vec<Point> {
    points.iter().copied().map(Point::from).collect()
}

fn replay_clicks(clicks: &[(i64, i64)], radius: f64) -> Contour {
    let mut contour = Contour::new();
    for &click in clicks {
        contour.click(Point::from(click), radius);
    }
    contour
}

fn move_result(applied: Option<usize>, axis: &str, index: usize) -> Result<usize, AppError> {
    applied.map(|_| 1).ok_or_else(|| {
        AppError::Session(format!("{axis} line {index} cannot be moved"))
    })
}

/// On-disk encoding of a session file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFormat {
    Yaml,
    Json,
}

impl SessionFormat {
    /// `.json` files are JSON, anything else YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SessionFormat::Json,
            _ => SessionFormat::Yaml,
        }
    }
}

impl Session {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            regions: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        let session = Self::parse(&content, SessionFormat::from_path(path))?;
        tracing::info!(
            path = %path.display(),
            regions = session.regions.len(),
            "Loaded session"
        );
        Ok(session)
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let content = self.render(SessionFormat::from_path(path))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn parse(content: &str, format: SessionFormat) -> Result<Self, AppError> {
        let session = match format {
            SessionFormat::Yaml => serde_yaml::from_str(content)?,
            SessionFormat::Json => serde_json::from_str(content)?,
        };
        Ok(session)
    }

    pub fn render(&self, format: SessionFormat) -> Result<String, AppError> {
        let content = match format {
            SessionFormat::Yaml => serde_yaml::to_string(self)?,
            SessionFormat::Json => serde_json::to_string_pretty(self)?,
        };
        Ok(content)
    }

    /// The source path, resolved against the directory of `session_path`.
    pub fn resolve_source(&self, session_path: &Path) -> PathBuf {
        if self.source.is_absolute() {
            return self.source.clone();
        }
        session_path
            .parent()
            .map(|dir| dir.join(&self.source))
            .unwrap_or_else(|| self.source.clone())
    }
}
