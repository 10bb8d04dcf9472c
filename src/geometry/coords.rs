//! Grid index to spherical and Cartesian coordinate mapping.
//!
//! Rows run from the north pole (colatitude 0) to the south pole (colatitude π),
//! columns run over longitude `0..2π`. Both axes include their endpoints, so the
//! first and last columns sample the same meridian.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;

use crate::terrain::{Grid, GridShape};

/// Returns `n` evenly spaced samples over `[start, end]`, both endpoints included.
///
/// A single sample yields `[start]`; zero samples yield an empty vector.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Colatitude (radians, `0..π`) of `row` in a grid with `rows` rows.
#[inline]
pub fn colatitude(row: usize, rows: usize) -> f64 {
    if rows <= 1 {
        return 0.0;
    }
    PI * (row as f64 / (rows - 1) as f64)
}

/// Latitude (radians, `π/2..-π/2`) of `row` in a grid with `rows` rows.
#[inline]
pub fn latitude(row: usize, rows: usize) -> f64 {
    FRAC_PI_2 - colatitude(row, rows)
}

/// Longitude (radians, `0..2π`) of `col` in a grid with `cols` columns.
#[inline]
pub fn longitude(col: usize, cols: usize) -> f64 {
    if cols <= 1 {
        return 0.0;
    }
    TAU * (col as f64 / (cols - 1) as f64)
}

/// Builds the broadcast colatitude and longitude grids for `shape`.
///
/// `theta` holds one value per row repeated across columns, `phi` one value per
/// column repeated across rows.
pub fn lat_lon_grid(shape: GridShape) -> (Grid, Grid) {
    let thetas = linspace(0.0, PI, shape.rows());
    let phis = linspace(0.0, TAU, shape.cols());

    let theta = Grid::from_fn(shape, |row, _| thetas[row] as f32);
    let phi = Grid::from_fn(shape, |_, col| phis[col] as f32);
    (theta, phi)
}

/// Converts colatitude `theta` and longitude `phi` to a point on the unit sphere.
#[inline]
pub fn spherical_to_cartesian(theta: f64, phi: f64) -> Vec3 {
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    Vec3::new((st * cp) as f32, (st * sp) as f32, ct as f32)
}

/// Unit-sphere position of the grid cell at (`row`, `col`).
#[inline]
pub fn cell_to_sphere(row: usize, col: usize, shape: GridShape) -> Vec3 {
    spherical_to_cartesian(colatitude(row, shape.rows()), longitude(col, shape.cols()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(0.0, PI, 5);
        assert_eq!(v.len(), 5);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[4], PI);
        assert!((v[2] - FRAC_PI_2).abs() < 1e-12);

        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
    }

    #[test]
    fn test_lat_lon_grid_broadcast() {
        let shape = GridShape::new(3, 5).unwrap();
        let (theta, phi) = lat_lon_grid(shape);

        assert_eq!(theta.shape(), shape);
        assert_eq!(phi.shape(), shape);

        for col in 0..5 {
            assert_eq!(theta.get(0, col), 0.0);
            assert!((theta.get(1, col) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
            assert!((theta.get(2, col) - std::f32::consts::PI).abs() < 1e-6);
        }
        for row in 0..3 {
            assert_eq!(phi.get(row, 0), 0.0);
            assert!((phi.get(row, 4) - std::f32::consts::TAU).abs() < 1e-6);
        }
    }

    #[test]
    fn test_spherical_to_cartesian_unit_length() {
        for &(theta, phi) in &[(0.0, 0.0), (0.3, 1.2), (FRAC_PI_2, PI), (PI, TAU), (2.0, 5.5)] {
            let p = spherical_to_cartesian(theta, phi);
            assert!((p.length() - 1.0).abs() < 1e-6, "{:?} not on unit sphere", p);
        }
    }

    #[test]
    fn test_poles_and_equator() {
        let north = spherical_to_cartesian(0.0, 1.0);
        assert!((north - Vec3::Z).length() < 1e-6);

        let south = spherical_to_cartesian(PI, 1.0);
        assert!((south + Vec3::Z).length() < 1e-6);

        let equator = spherical_to_cartesian(FRAC_PI_2, 0.0);
        assert!((equator - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_longitude_seam_coincides() {
        let shape = GridShape::new(9, 17).unwrap();
        for row in 0..shape.rows() {
            let first = cell_to_sphere(row, 0, shape);
            let last = cell_to_sphere(row, shape.cols() - 1, shape);
            assert!((first - last).length() < 1e-5);
        }
    }

    #[test]
    fn test_latitude_of_middle_row_is_zero() {
        assert_eq!(latitude(4, 9), 0.0);
        assert_eq!(latitude(0, 9), FRAC_PI_2);
    }
}
