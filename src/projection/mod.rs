//! Map projections from the lat/lon grid to a 2D image grid.
//!
//! All projections keep the grid shape. Rows are latitudes from +90° (row 0)
//! to -90° (last row).

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::geometry::{latitude, longitude};
use crate::terrain::Grid;

/// Rows whose `cos(latitude)` falls below this are treated as poles.
pub const POLE_EPSILON: f64 = 1e-9;

/// Available map projection types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ProjectionType {
    /// Plain lat/lon grid (identity).
    Equirectangular,
    /// Rows scaled by `1 / cos(latitude)`; pole rows are left untouched.
    Mercator,
    /// Equal-area sinusoidal: longitudes compressed toward the central meridian
    /// by `cos(latitude)`; cells outside the map envelope are zero.
    Sinusoidal,
}

impl ProjectionType {
    /// Returns all projection types.
    pub fn all() -> &'static [ProjectionType] {
        &[Self::Equirectangular, Self::Mercator, Self::Sinusoidal]
    }

    /// Returns the name of the projection.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equirectangular => "equirectangular",
            Self::Mercator => "mercator",
            Self::Sinusoidal => "sinusoidal",
        }
    }

    /// Projects `field` with this projection.
    pub fn project(&self, field: &Grid) -> Grid {
        project(field, *self)
    }
}

impl fmt::Display for ProjectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionType {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equirectangular" | "plate_carree" => Ok(Self::Equirectangular),
            "mercator" => Ok(Self::Mercator),
            "sinusoidal" => Ok(Self::Sinusoidal),
            _ => Err(TerrainError::UnsupportedProjection(s.to_string())),
        }
    }
}

impl TryFrom<String> for ProjectionType {
    type Error = TerrainError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

/// Projects a displacement field (lat/lon grid) to a 2D map grid.
pub fn project(field: &Grid, projection: ProjectionType) -> Grid {
    match projection {
        ProjectionType::Equirectangular => field.clone(),
        ProjectionType::Mercator => mercator(field),
        ProjectionType::Sinusoidal => sinusoidal(field),
    }
}

fn mercator(field: &Grid) -> Grid {
    let rows = field.rows();
    let mut out = field.clone();

    for row in 0..rows {
        let cos_lat = latitude(row, rows).cos();
        // Pole guard: 1/cos diverges there.
        if cos_lat.abs() < POLE_EPSILON {
            continue;
        }
        for v in out.row_mut(row) {
            *v = (*v as f64 / cos_lat) as f32;
        }
    }

    out
}

fn sinusoidal(field: &Grid) -> Grid {
    let rows = field.rows();
    let cols = field.cols();
    if cols == 1 {
        return field.clone();
    }

    let mut out = Grid::filled(field.shape(), 0.0);

    for row in 0..rows {
        let cos_lat = latitude(row, rows).cos().max(f64::MIN_POSITIVE);
        let src = field.row(row);
        let dst = out.row_mut(row);

        for (col, value) in dst.iter_mut().enumerate() {
            // Centered longitude of the output cell, -π..π.
            let lon_out = longitude(col, cols) - PI;
            let lon_src = lon_out / cos_lat;
            if lon_src.abs() > PI + 1e-12 {
                continue;
            }

            let pos = ((lon_src + PI) / TAU * (cols - 1) as f64).clamp(0.0, (cols - 1) as f64);
            let i0 = pos.floor() as usize;
            let i1 = (i0 + 1).min(cols - 1);
            let t = (pos - i0 as f64) as f32;
            *value = src[i0] * (1.0 - t) + src[i1] * t;
        }
    }

    out
}
