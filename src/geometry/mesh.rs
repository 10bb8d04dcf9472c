//! Radially displaced sphere positions for external mesh renderers.

use glam::Vec3;
use rayon::prelude::*;

use super::coords::cell_to_sphere;
use crate::error::TerrainError;
use crate::terrain::Grid;

/// Computes one vertex per grid cell, pushed out from the unit sphere by the
/// displacement stored in `grid`.
///
/// Each vertex lies at `(radius + scale * d) * dir`, where `dir` is the unit
/// direction of the cell. Vertices are returned in row-major order, matching
/// the grid layout, so a renderer can triangulate neighbouring cells directly.
pub fn displaced_sphere_positions(
    grid: &Grid,
    radius: f32,
    scale: f32,
) -> Result<Vec<Vec3>, TerrainError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(TerrainError::invalid("radius", format!("must be finite and > 0, got {}", radius)));
    }
    if !scale.is_finite() {
        return Err(TerrainError::invalid("scale", format!("must be finite, got {}", scale)));
    }

    let shape = grid.shape();
    let positions = grid
        .values()
        .par_iter()
        .enumerate()
        .map(|(i, &d)| {
            let row = i / shape.cols();
            let col = i % shape.cols();
            cell_to_sphere(row, col, shape) * (radius + scale * d)
        })
        .collect();

    Ok(positions)
}
