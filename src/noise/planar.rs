//! Single-octave gradient noise over the flat lat/lon parameter plane.
//!
//! Unlike the spherical fBm this does not wrap at the longitude seam; it is the
//! cheap option for previews.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

use super::strategy::{gradient_seed, resolve_seed, NoiseStrategy};
use crate::error::TerrainError;
use crate::terrain::{Grid, GridShape};

/// Configuration for planar gradient noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanarNoiseConfig {
    /// Random seed. `None` draws a fresh seed when the strategy is built.
    pub seed: Option<u64>,
    /// Base frequency over the normalized `[-1, 1]` lat/lon plane.
    pub frequency: f32,
}

impl Default for PlanarNoiseConfig {
    fn default() -> Self {
        Self {
            seed: Some(42),
            frequency: 1.0,
        }
    }
}

impl PlanarNoiseConfig {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(TerrainError::invalid(
                "frequency",
                format!("must be finite and > 0, got {}", self.frequency),
            ));
        }
        Ok(())
    }
}

/// Gradient noise sampled at `(lat, lon)` mapped to `[-1, 1]`, normalized to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct PlanarNoise {
    config: PlanarNoiseConfig,
    seed: u64,
    gradient_seed: i32,
}

impl PlanarNoise {
    pub fn new(config: PlanarNoiseConfig) -> Result<Self, TerrainError> {
        config.validate()?;
        let seed = resolve_seed(config.seed);
        let gradient_seed = gradient_seed(seed)?;
        Ok(Self {
            config,
            seed,
            gradient_seed,
        })
    }

    fn sample(&self, x: f32, y: f32) -> f32 {
        NoiseBuilder::fbm_2d_offset(x, 1, y, 1)
            .with_seed(self.gradient_seed)
            .with_freq(1.0)
            .with_octaves(1)
            .generate()
            .0[0]
    }
}

impl NoiseStrategy for PlanarNoise {
    fn name(&self) -> &'static str {
        "planar_coherent"
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn generate(&self, shape: GridShape) -> Result<Grid, TerrainError> {
        let frequency = self.config.frequency;
        let mut grid = Grid::filled(shape, 0.0);

        grid.values_mut().par_iter_mut().enumerate().for_each(|(i, value)| {
            let row = i / shape.cols();
            let col = i % shape.cols();
            let lat = (row as f32 / shape.rows() as f32 - 0.5) * 2.0;
            let lon = (col as f32 / shape.cols() as f32 - 0.5) * 2.0;
            *value = self.sample(lat * frequency, lon * frequency);
        });

        grid.normalized("planar coherent noise")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_normalized_and_deterministic() {
        let shape = GridShape::new(16, 32).unwrap();
        let noise = PlanarNoise::new(PlanarNoiseConfig { seed: Some(42), frequency: 3.0 }).unwrap();

        let a = noise.generate(shape).unwrap();
        let b = noise.generate(shape).unwrap();

        assert_eq!(a.shape(), shape);
        assert_eq!(a, b);
        let (min, max) = a.value_range();
        assert!(min.abs() < 1e-6);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_seeds_beyond_32_bits_rejected() {
        let wide = PlanarNoiseConfig { seed: Some(7 + (1u64 << 40)), frequency: 1.0 };
        assert!(matches!(PlanarNoise::new(wide), Err(TerrainError::InvalidParameter { name: "seed", .. })));
    }

    #[test]
    fn test_rejects_zero_frequency() {
        assert!(PlanarNoise::new(PlanarNoiseConfig { seed: Some(1), frequency: 0.0 }).is_err());
    }
}
