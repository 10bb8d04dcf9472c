//! Noise strategy interface and the closed set of built-in strategies.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fractal::{FractalNoiseConfig, MultiOctaveNoise};
use super::planar::{PlanarNoise, PlanarNoiseConfig};
use super::uniform::{UniformSmoothedConfig, UniformSmoothedNoise};
use crate::error::TerrainError;
use crate::terrain::{Grid, GridShape};

/// Produces a scalar field over a lat/lon grid.
///
/// Implementations are deterministic for a fixed seed: calling `generate`
/// twice with the same shape yields identical grids.
pub trait NoiseStrategy: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// The seed in effect (resolved if the configuration left it unset).
    fn seed(&self) -> u64;

    /// Generates a grid of exactly `shape`.
    fn generate(&self, shape: GridShape) -> Result<Grid, TerrainError>;
}

/// Returns `seed` or draws a fresh one from the thread RNG.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::rng().random::<u32>() as u64)
}

/// Converts a resolved seed to the 32-bit seed simdnoise takes.
///
/// Seeds above `u32::MAX` are rejected rather than truncated, so distinct
/// accepted seeds always select distinct gradient tables.
pub(crate) fn gradient_seed(seed: u64) -> Result<i32, TerrainError> {
    u32::try_from(seed)
        .map(|s| s as i32)
        .map_err(|_| TerrainError::invalid("seed", format!("gradient noise seeds must fit in 32 bits, got {}", seed)))
}

/// Strategy selection as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum NoiseConfig {
    /// Gaussian-smoothed uniform noise, normalized to `[0, 1]`.
    UniformSmoothed(UniformSmoothedConfig),
    /// Spherical fBm, values in `[-1, 1]`.
    MultiOctaveCoherent(FractalNoiseConfig),
    /// Flat lat/lon gradient noise, normalized to `[0, 1]`.
    PlanarCoherent(PlanarNoiseConfig),
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self::MultiOctaveCoherent(FractalNoiseConfig::default())
    }
}

impl NoiseConfig {
    /// Validates the tunables and builds the strategy, fixing its seed.
    pub fn build(&self) -> Result<NoiseSource, TerrainError> {
        let source = match self {
            Self::UniformSmoothed(c) => NoiseSource::UniformSmoothed(UniformSmoothedNoise::new(c.clone())?),
            Self::MultiOctaveCoherent(c) => NoiseSource::MultiOctaveCoherent(MultiOctaveNoise::new(c.clone())?),
            Self::PlanarCoherent(c) => NoiseSource::PlanarCoherent(PlanarNoise::new(c.clone())?),
        };
        debug!(strategy = source.name(), seed = source.seed(), "Built noise strategy");
        Ok(source)
    }
}

/// A built noise strategy.
#[derive(Debug, Clone)]
pub enum NoiseSource {
    UniformSmoothed(UniformSmoothedNoise),
    MultiOctaveCoherent(MultiOctaveNoise),
    PlanarCoherent(PlanarNoise),
}

impl NoiseStrategy for NoiseSource {
    fn name(&self) -> &'static str {
        match self {
            Self::UniformSmoothed(s) => s.name(),
            Self::MultiOctaveCoherent(s) => s.name(),
            Self::PlanarCoherent(s) => s.name(),
        }
    }

    fn seed(&self) -> u64 {
        match self {
            Self::UniformSmoothed(s) => s.seed(),
            Self::MultiOctaveCoherent(s) => s.seed(),
            Self::PlanarCoherent(s) => s.seed(),
        }
    }

    fn generate(&self, shape: GridShape) -> Result<Grid, TerrainError> {
        debug!(strategy = self.name(), seed = self.seed(), %shape, "Generating noise field");
        match self {
            Self::UniformSmoothed(s) => s.generate(shape),
            Self::MultiOctaveCoherent(s) => s.generate(shape),
            Self::PlanarCoherent(s) => s.generate(shape),
        }
    }
}
