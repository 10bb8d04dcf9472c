//! Power-curve feature sharpening followed by diffusion-style erosion.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::DisplacementTransform;
use crate::error::TerrainError;
use crate::terrain::{gaussian_filter, Grid};

/// Standard deviation of the diffusion blur applied each erosion round.
pub const EROSION_SIGMA: f32 = 0.5;

/// Parameters for the power-curve + erosion transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerCurveParams {
    /// Scale applied to the noise before shaping.
    pub base_scale: f32,
    /// Exponent of the power curve; > 1 sharpens peaks, < 1 flattens them.
    pub sharpness: f32,
    /// Number of erosion rounds.
    pub erosion_iterations: u32,
    /// Weight of the fresh random roughness blended in each round (0-1).
    pub roughness: f32,
    /// Seed for the roughness noise. `None` uses OS entropy, so repeated runs differ.
    pub erosion_seed: Option<u64>,
}

impl Default for PowerCurveParams {
    fn default() -> Self {
        Self {
            base_scale: 1.0,
            sharpness: 2.0,
            erosion_iterations: 4,
            roughness: 0.4,
            erosion_seed: None,
        }
    }
}

impl PowerCurveParams {
    /// Rugged preset: strong sharpening, light erosion.
    pub fn rugged() -> Self {
        Self {
            sharpness: 3.0,
            erosion_iterations: 2,
            roughness: 0.2,
            ..Default::default()
        }
    }

    /// Weathered preset: gentle curve, many erosion rounds.
    pub fn weathered() -> Self {
        Self {
            sharpness: 1.5,
            erosion_iterations: 10,
            roughness: 0.3,
            ..Default::default()
        }
    }

    fn erosion_rng(&self) -> ChaCha8Rng {
        match self.erosion_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        }
    }
}

/// Normalizes `field` to `[0, 1]`, raises it to `sharpness`, and rescales to the
/// original min/max range.
pub fn shape_features(field: &Grid, sharpness: f32) -> Result<Grid, TerrainError> {
    let (min, max) = field.value_range();
    let range = max - min;
    let normalized = field.normalized("power curve")?;
    Ok(normalized.map(|v| v.powf(sharpness) * range + min))
}

/// Runs `iterations` rounds of blur, roughness blend and the downward-only clamp.
///
/// Every cell of the result is `<=` the same cell of `shaped`.
pub fn simulate_erosion(
    shaped: &Grid,
    iterations: u32,
    roughness: f32,
    rng: &mut ChaCha8Rng,
) -> Result<Grid, TerrainError> {
    let mut eroded = shaped.clone();

    for _ in 0..iterations {
        eroded = gaussian_filter(&eroded, EROSION_SIGMA)?;

        for (value, &ceiling) in eroded.values_mut().iter_mut().zip(shaped.values()) {
            let noise: f32 = rng.random();
            let blended = *value * (1.0 - roughness) + noise * roughness;
            // Erosion only lowers terrain.
            *value = blended.min(ceiling);
        }
    }

    Ok(eroded)
}

impl DisplacementTransform for PowerCurveParams {
    fn name(&self) -> &'static str {
        "power_curve_with_erosion"
    }

    fn validate(&self) -> Result<(), TerrainError> {
        if !self.base_scale.is_finite() {
            return Err(TerrainError::invalid(
                "base_scale",
                format!("must be finite, got {}", self.base_scale),
            ));
        }
        if !self.sharpness.is_finite() || self.sharpness <= 0.0 {
            return Err(TerrainError::invalid(
                "sharpness",
                format!("must be finite and > 0, got {}", self.sharpness),
            ));
        }
        if !(0.0..=1.0).contains(&self.roughness) {
            return Err(TerrainError::invalid(
                "roughness",
                format!("must be in [0, 1], got {}", self.roughness),
            ));
        }
        Ok(())
    }

    fn apply(&self, noise: &Grid) -> Result<Grid, TerrainError> {
        self.validate()?;

        let base_scale = self.base_scale;
        let scaled = noise.map(|v| v * base_scale);
        let shaped = shape_features(&scaled, self.sharpness)?;

        let mut rng = self.erosion_rng();
        simulate_erosion(&shaped, self.erosion_iterations, self.roughness, &mut rng)
    }
}
