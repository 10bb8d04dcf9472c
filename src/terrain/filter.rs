//! Separable Gaussian smoothing over a grid.
//!
//! Boundaries use half-sample symmetric reflection (`d c b a | a b c d | d c b a`)
//! and the kernel is truncated at four standard deviations.

use rayon::prelude::*;

use super::grid::Grid;
use crate::error::TerrainError;

/// Kernel half-width in standard deviations.
const TRUNCATE: f64 = 4.0;

/// Builds a normalized 1D Gaussian kernel of radius `round(TRUNCATE * sigma)`.
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let denom = 2.0 * sigma * sigma;

    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / denom).exp())
        .collect();

    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// How one axis of the grid is smoothed.
#[derive(Debug, Clone)]
enum LineFilter {
    Kernel(Vec<f64>),
    /// Every sample becomes the line mean.
    Mean,
}

impl LineFilter {
    /// Picks the filter for lines of length `n`.
    ///
    /// Reflection makes the kernel periodic in `2n`. Once `sigma >= 2n` the
    /// folded weights are uniform to within ~1e-9, so the line collapses to its
    /// mean and the kernel never grows past `16n + 1` taps.
    fn for_line(sigma: f64, n: usize) -> Self {
        if sigma >= 2.0 * n as f64 {
            LineFilter::Mean
        } else {
            LineFilter::Kernel(gaussian_kernel(sigma))
        }
    }

    fn apply(&self, src: &[f32], dst: &mut [f32]) {
        match self {
            LineFilter::Kernel(kernel) => convolve_line(src, dst, kernel),
            LineFilter::Mean => {
                let mean = src.iter().map(|&v| v as f64).sum::<f64>() / src.len() as f64;
                dst.fill(mean as f32);
            }
        }
    }
}

/// Maps an out-of-range index back into `0..n` by mirror reflection.
#[inline]
fn reflect_index(i: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

fn convolve_line(src: &[f32], dst: &mut [f32], kernel: &[f64]) {
    let n = src.len();
    let radius = (kernel.len() / 2) as isize;
    for (i, out) in dst.iter_mut().enumerate() {
        let mut acc = 0.0f64;
        for (k, &w) in kernel.iter().enumerate() {
            let j = reflect_index(i as isize + k as isize - radius, n);
            acc += w * src[j] as f64;
        }
        *out = acc as f32;
    }
}

/// Smooths `grid` with a Gaussian of standard deviation `sigma` (in cells).
///
/// Rows are blurred first, then columns. Output has the same shape as the input.
pub fn gaussian_filter(grid: &Grid, sigma: f32) -> Result<Grid, TerrainError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(TerrainError::invalid("sigma", format!("must be finite and > 0, got {}", sigma)));
    }

    let (rows, cols) = (grid.rows(), grid.cols());
    let horizontal_filter = LineFilter::for_line(sigma as f64, cols);
    let vertical_filter = LineFilter::for_line(sigma as f64, rows);

    // Horizontal pass, one row per task.
    let mut horizontal = grid.clone();
    horizontal
        .values_mut()
        .par_chunks_mut(cols)
        .zip(grid.values().par_chunks(cols))
        .for_each(|(dst, src)| horizontal_filter.apply(src, dst));

    // Vertical pass on transposed columns.
    let columns: Vec<Vec<f32>> = (0..cols)
        .into_par_iter()
        .map(|col| {
            let src: Vec<f32> = (0..rows).map(|row| horizontal.get(row, col)).collect();
            let mut dst = vec![0.0f32; rows];
            vertical_filter.apply(&src, &mut dst);
            dst
        })
        .collect();

    let mut out = horizontal;
    for (col, column) in columns.iter().enumerate() {
        for (row, &v) in column.iter().enumerate() {
            out.set(row, col, v);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::GridShape;

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(2.0);
        assert_eq!(kernel.len(), 17);
        let sum: f64 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        for i in 0..kernel.len() / 2 {
            assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-15);
        }
    }

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(2, 4), 2);
        // Kernels wider than the line keep reflecting.
        assert_eq!(reflect_index(-9, 4), 0);
        assert_eq!(reflect_index(8, 4), 0);
    }

    #[test]
    fn test_constant_grid_is_unchanged() {
        let grid = Grid::filled(GridShape::new(5, 7).unwrap(), 0.75);
        let blurred = gaussian_filter(&grid, 1.5).unwrap();
        for &v in blurred.values() {
            assert!((v - 0.75).abs() < 1e-6);
        }
    }

    #[test]
    fn test_blur_preserves_shape_and_mass() {
        let shape = GridShape::new(9, 9).unwrap();
        let mut grid = Grid::filled(shape, 0.0);
        grid.set(4, 4, 1.0);

        let blurred = gaussian_filter(&grid, 0.5).unwrap();
        assert_eq!(blurred.shape(), shape);

        let total: f32 = blurred.values().iter().sum();
        assert!((total - 1.0).abs() < 1e-5, "reflect boundary should conserve mass, got {}", total);
        assert!(blurred.get(4, 4) < 1.0);
        assert!(blurred.get(4, 5) > 0.0);
        assert!((blurred.get(4, 5) - blurred.get(5, 4)).abs() < 1e-7);
    }

    #[test]
    fn test_huge_sigma_collapses_to_mean() {
        let grid = Grid::from_fn(GridShape::new(4, 4).unwrap(), |r, c| (r * 4 + c) as f32);
        let blurred = gaussian_filter(&grid, 1.0e10).unwrap();
        assert_eq!(blurred.shape(), grid.shape());
        for &v in blurred.values() {
            assert!((v - 7.5).abs() < 1e-5, "expected the grid mean, got {}", v);
        }
    }

    #[test]
    fn test_wide_kernel_agrees_with_mean_at_threshold() {
        // Just below 2n the real kernel runs; it must already be flat.
        let grid = Grid::from_fn(GridShape::new(1, 4).unwrap(), |_, c| c as f32);
        assert!(matches!(LineFilter::for_line(7.9, 4), LineFilter::Kernel(_)));
        assert!(matches!(LineFilter::for_line(8.0, 4), LineFilter::Mean));

        let blurred = gaussian_filter(&grid, 7.9).unwrap();
        for &v in blurred.values() {
            assert!((v - 1.5).abs() < 1e-3, "expected ~1.5, got {}", v);
        }
    }

    #[test]
    fn test_rejects_non_positive_sigma() {
        let grid = Grid::filled(GridShape::new(2, 2).unwrap(), 0.0);
        assert!(gaussian_filter(&grid, 0.0).is_err());
        assert!(gaussian_filter(&grid, -1.0).is_err());
    }
}
