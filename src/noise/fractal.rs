//! Multi-octave fractal Brownian motion (fBm) noise on the sphere.

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

use super::strategy::{gradient_seed, resolve_seed, NoiseStrategy};
use crate::error::TerrainError;
use crate::geometry::cell_to_sphere;
use crate::terrain::{Grid, GridShape};

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalNoiseConfig {
    /// Random seed. `None` draws a fresh seed when the strategy is built.
    pub seed: Option<u64>,
    /// Base scale applied to unit-sphere coordinates (2.0-4.0 typical).
    pub scale: f32,
    /// Number of noise octaves (4-8 typical).
    pub octaves: u8,
    /// Amplitude decay per octave (0.4-0.6 typical).
    pub persistence: f32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            seed: None,
            scale: 3.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates a new noise configuration with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Checks every tunable against its domain.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.octaves == 0 {
            return Err(TerrainError::invalid("octaves", "must be at least 1"));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(TerrainError::invalid("scale", format!("must be finite and > 0, got {}", self.scale)));
        }
        if !self.persistence.is_finite() || self.persistence <= 0.0 || self.persistence > 1.0 {
            return Err(TerrainError::invalid(
                "persistence",
                format!("must be in (0, 1], got {}", self.persistence),
            ));
        }
        if !self.lacunarity.is_finite() || self.lacunarity <= 0.0 {
            return Err(TerrainError::invalid(
                "lacunarity",
                format!("must be finite and > 0, got {}", self.lacunarity),
            ));
        }
        Ok(())
    }
}

/// Seamless spherical fBm: octaves of gradient noise sampled at unit-sphere
/// positions, so the longitude seam and the poles carry no discontinuity.
#[derive(Debug, Clone)]
pub struct MultiOctaveNoise {
    config: FractalNoiseConfig,
    seed: u64,
    gradient_seed: i32,
}

impl MultiOctaveNoise {
    /// Validates `config` and fixes the seed.
    pub fn new(config: FractalNoiseConfig) -> Result<Self, TerrainError> {
        config.validate()?;
        let seed = resolve_seed(config.seed);
        let gradient_seed = gradient_seed(seed)?;
        Ok(Self {
            config,
            seed,
            gradient_seed,
        })
    }

    pub fn config(&self) -> &FractalNoiseConfig {
        &self.config
    }

    /// Samples fractal noise at a 3D position (typically on the unit sphere).
    ///
    /// Uses 4D simplex noise with the w dimension set to 0. Octave `i` gets its
    /// own seed (`seed + i`) so octaves are decorrelated.
    ///
    /// # Returns
    /// A noise value in `[-1, 1]` (normalized by the amplitude sum)
    pub fn sample(&self, pos: Vec3) -> f32 {
        let config = &self.config;
        let base_seed = self.gradient_seed;

        let mut total = 0.0f32;
        let mut amplitude = 1.0f32;
        let mut frequency = 1.0f32;
        let mut max_amplitude = 0.0f32;

        for octave in 0..config.octaves {
            let octave_seed = base_seed.wrapping_add(octave as i32);
            let f = frequency * config.scale;

            // simdnoise fbm with a single octave is plain simplex in [-1, 1]
            let noise_value = NoiseBuilder::fbm_4d_offset(pos.x * f, 1, pos.y * f, 1, pos.z * f, 1, 0.0, 1)
                .with_seed(octave_seed)
                .with_freq(1.0)
                .with_octaves(1)
                .generate()
                .0[0];

            total += noise_value * amplitude;
            max_amplitude += amplitude;
            amplitude *= config.persistence;
            frequency *= config.lacunarity;
        }

        (total / max_amplitude).clamp(-1.0, 1.0)
    }
}

impl NoiseStrategy for MultiOctaveNoise {
    fn name(&self) -> &'static str {
        "multi_octave_coherent"
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn generate(&self, shape: GridShape) -> Result<Grid, TerrainError> {
        let mut grid = Grid::filled(shape, 0.0);

        grid.values_mut().par_iter_mut().enumerate().for_each(|(i, value)| {
            let row = i / shape.cols();
            let col = i % shape.cols();
            *value = self.sample(cell_to_sphere(row, col, shape));
        });

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_fills_unset_fields_with_defaults() {
        let config: FractalNoiseConfig = serde_json::from_str(r#"{"octaves":4}"#).unwrap();
        assert_eq!(config.octaves, 4);
        assert_eq!(config.scale, 3.0);
        assert_eq!(config.persistence, 0.5);
        assert_eq!(config.lacunarity, 2.0);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_same_seed_agrees_across_instances() {
        let a = MultiOctaveNoise::new(FractalNoiseConfig::with_seed(12345)).unwrap();
        let b = MultiOctaveNoise::new(FractalNoiseConfig::with_seed(12345)).unwrap();
        let shape = GridShape::new(6, 9).unwrap();

        for row in 0..shape.rows() {
            for col in 0..shape.cols() {
                let pos = cell_to_sphere(row, col, shape);
                assert_eq!(a.sample(pos), b.sample(pos));
            }
        }
    }

    #[test]
    fn test_flat_amplitudes_stay_in_unit_range() {
        // persistence 1 weights every octave equally, the widest the sum can get.
        let config = FractalNoiseConfig {
            octaves: 8,
            persistence: 1.0,
            ..FractalNoiseConfig::with_seed(7)
        };
        let grid = MultiOctaveNoise::new(config)
            .unwrap()
            .generate(GridShape::new(16, 32).unwrap())
            .unwrap();
        assert!(grid.values().iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_different_seeds_produce_different_grids() {
        let shape = GridShape::new(8, 16).unwrap();
        let a = MultiOctaveNoise::new(FractalNoiseConfig::with_seed(1)).unwrap().generate(shape).unwrap();
        let b = MultiOctaveNoise::new(FractalNoiseConfig::with_seed(2)).unwrap().generate(shape).unwrap();

        assert_ne!(a, b, "Different seeds should produce different results");
    }

    #[test]
    fn test_seed_upper_bits_are_not_dropped() {
        let shape = GridShape::new(8, 16).unwrap();
        let low = MultiOctaveNoise::new(FractalNoiseConfig::with_seed(5)).unwrap();
        let top = MultiOctaveNoise::new(FractalNoiseConfig::with_seed(u32::MAX as u64)).unwrap();
        assert_ne!(low.generate(shape).unwrap(), top.generate(shape).unwrap());

        let wide = MultiOctaveNoise::new(FractalNoiseConfig::with_seed(5 + (1u64 << 32)));
        assert!(matches!(wide, Err(TerrainError::InvalidParameter { name: "seed", .. })));
    }

    #[test]
    fn test_generate_shape_finite_and_deterministic() {
        let shape = GridShape::new(8, 16).unwrap();
        let noise = MultiOctaveNoise::new(FractalNoiseConfig::with_seed(42)).unwrap();

        let first = noise.generate(shape).unwrap();
        let second = noise.generate(shape).unwrap();

        assert_eq!(first.shape(), shape);
        assert!(first.is_finite());
        assert_eq!(first.values(), second.values());
    }

    #[test]
    fn test_longitude_seam_is_seamless() {
        let shape = GridShape::new(10, 20).unwrap();
        let grid = MultiOctaveNoise::new(FractalNoiseConfig::with_seed(3))
            .unwrap()
            .generate(shape)
            .unwrap();

        for row in 0..shape.rows() {
            let diff = (grid.get(row, 0) - grid.get(row, shape.cols() - 1)).abs();
            assert!(diff < 1e-3, "seam mismatch {} at row {}", diff, row);
        }
    }

    #[test]
    fn test_unseeded_config_resolves_a_seed() {
        let noise = MultiOctaveNoise::new(FractalNoiseConfig::default()).unwrap();
        let shape = GridShape::new(4, 4).unwrap();
        // The resolved seed is fixed for the lifetime of the strategy.
        assert_eq!(noise.generate(shape).unwrap(), noise.generate(shape).unwrap());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_octaves = FractalNoiseConfig { octaves: 0, ..FractalNoiseConfig::with_seed(1) };
        assert!(MultiOctaveNoise::new(bad_octaves).is_err());

        let bad_persistence = FractalNoiseConfig { persistence: 1.5, ..FractalNoiseConfig::with_seed(1) };
        assert!(MultiOctaveNoise::new(bad_persistence).is_err());

        let bad_scale = FractalNoiseConfig { scale: -2.0, ..FractalNoiseConfig::with_seed(1) };
        assert!(MultiOctaveNoise::new(bad_scale).is_err());
    }
}
