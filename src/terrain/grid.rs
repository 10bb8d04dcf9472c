//! Lat/lon grid storage shared by noise, displacement and projected fields.

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Dimensions of a lat/lon grid: `rows` latitude samples by `cols` longitude samples.
///
/// Both dimensions are always positive; the only ways in are [`GridShape::new`]
/// and validated deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ShapeDims")]
pub struct GridShape {
    rows: usize,
    cols: usize,
}

/// Unvalidated grid dimensions as they appear in configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct ShapeDims {
    pub rows: usize,
    pub cols: usize,
}

impl TryFrom<ShapeDims> for GridShape {
    type Error = TerrainError;

    fn try_from(dims: ShapeDims) -> Result<Self, Self::Error> {
        GridShape::new(dims.rows, dims.cols)
    }
}

impl From<GridShape> for ShapeDims {
    fn from(shape: GridShape) -> Self {
        ShapeDims {
            rows: shape.rows,
            cols: shape.cols,
        }
    }
}

impl GridShape {
    /// Creates a shape, rejecting empty dimensions.
    pub fn new(rows: usize, cols: usize) -> Result<Self, TerrainError> {
        if rows == 0 || cols == 0 {
            return Err(TerrainError::invalid(
                "shape",
                format!("dimensions must be positive, got {}x{}", rows, cols),
            ));
        }
        Ok(Self { rows, cols })
    }

    /// One-degree resolution over the whole sphere.
    pub fn one_degree() -> Self {
        Self { rows: 180, cols: 360 }
    }

    /// Number of latitude samples (row 0 is the north pole).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of longitude samples.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Returns true if the shape has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A row-major grid of `f32` values over latitude (rows) and longitude (columns).
///
/// Noise fields, displacement fields and projected maps are all `Grid`s; what a
/// grid represents is decided by where it sits in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    shape: GridShape,
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct RawGrid {
    shape: GridShape,
    values: Vec<f32>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = TerrainError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        Grid::from_vec(raw.shape, raw.values)
    }
}

impl Grid {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(shape: GridShape, value: f32) -> Self {
        Self {
            shape,
            values: vec![value; shape.len()],
        }
    }

    /// Wraps row-major `values`; the length must match `shape`.
    pub fn from_vec(shape: GridShape, values: Vec<f32>) -> Result<Self, TerrainError> {
        if values.len() != shape.len() {
            return Err(TerrainError::invalid(
                "values",
                format!("expected {} values for shape {}, got {}", shape.len(), shape, values.len()),
            ));
        }
        Ok(Self { shape, values })
    }

    /// Builds a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn<F>(shape: GridShape, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut values = Vec::with_capacity(shape.len());
        for row in 0..shape.rows {
            for col in 0..shape.cols {
                values.push(f(row, col));
            }
        }
        Self { shape, values }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    /// Row-major cell values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.shape.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.values[row * self.shape.cols + col] = value;
    }

    /// Returns the values of one latitude row.
    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.shape.cols;
        &self.values[start..start + self.shape.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f32] {
        let start = row * self.shape.cols;
        &mut self.values[start..start + self.shape.cols]
    }

    /// Computes the min and max cell values.
    pub fn value_range(&self) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;

        for &v in &self.values {
            min = min.min(v);
            max = max.max(v);
        }

        (min, max)
    }

    /// Returns true if no cell is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Applies `f` to every cell, producing a grid of the same shape.
    pub fn map<F>(&self, f: F) -> Grid
    where
        F: Fn(f32) -> f32,
    {
        Grid {
            shape: self.shape,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combines two grids of the same shape cell by cell.
    pub fn zip_map<F>(&self, other: &Grid, f: F) -> Result<Grid, TerrainError>
    where
        F: Fn(f32, f32) -> f32,
    {
        if self.shape != other.shape {
            return Err(TerrainError::invalid(
                "shape",
                format!("grid shapes differ: {} vs {}", self.shape, other.shape),
            ));
        }
        Ok(Grid {
            shape: self.shape,
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Min-max normalizes the grid to `[0, 1]`.
    ///
    /// Fails with `DegenerateInput` when the grid is constant; `context` names
    /// the caller in the error message.
    pub fn normalized(&self, context: &str) -> Result<Grid, TerrainError> {
        let (min, max) = self.value_range();
        let range = max - min;
        if !range.is_finite() || range <= 0.0 {
            return Err(TerrainError::degenerate(context, min));
        }
        Ok(self.map(|v| (v - min) / range))
    }

    /// Quantizes the grid to 8-bit levels for image export.
    ///
    /// Values are min-max normalized then scaled to `0..=255` and truncated, so
    /// only the maximum reaches 255. A constant grid is `DegenerateInput`.
    pub fn to_u8_levels(&self) -> Result<Vec<u8>, TerrainError> {
        let norm = self.normalized("height map quantization")?;
        Ok(norm
            .values
            .iter()
            .map(|&v| (v * 255.0).clamp(0.0, 255.0) as u8)
            .collect())
    }

    /// Row closest to the equator, longitude-ordered.
    pub fn equatorial_cross_section(&self) -> &[f32] {
        self.row(self.shape.rows / 2)
    }

    /// Binary land/water mask: `1` where the cell is strictly above `water_level`.
    pub fn land_mask(&self, water_level: f32) -> Vec<u8> {
        self.values
            .iter()
            .map(|&v| if v > water_level { 1 } else { 0 })
            .collect()
    }

    /// Fraction of cells strictly above `water_level`.
    pub fn land_fraction(&self, water_level: f32) -> f32 {
        let land = self.values.iter().filter(|&&v| v > water_level).count();
        land as f32 / self.values.len() as f32
    }
}
