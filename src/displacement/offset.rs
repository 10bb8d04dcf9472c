//! Normalized noise lifted by a base height and scaled by an amplitude.

use serde::{Deserialize, Serialize};

use super::DisplacementTransform;
use crate::error::TerrainError;
use crate::terrain::Grid;

/// `displacement = base_height + normalize(noise) * amplitude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizedOffsetParams {
    /// Global scaling factor for terrain height (> 0).
    pub amplitude: f32,
    /// Base height offset (0-1).
    pub base_height: f32,
}

impl Default for NormalizedOffsetParams {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            base_height: 0.5,
        }
    }
}

impl DisplacementTransform for NormalizedOffsetParams {
    fn name(&self) -> &'static str {
        "normalized_offset"
    }

    fn validate(&self) -> Result<(), TerrainError> {
        if !self.amplitude.is_finite() || self.amplitude <= 0.0 {
            return Err(TerrainError::invalid(
                "amplitude",
                format!("must be finite and > 0, got {}", self.amplitude),
            ));
        }
        if !(0.0..=1.0).contains(&self.base_height) {
            return Err(TerrainError::invalid(
                "base_height",
                format!("must be in [0, 1], got {}", self.base_height),
            ));
        }
        Ok(())
    }

    fn apply(&self, noise: &Grid) -> Result<Grid, TerrainError> {
        self.validate()?;
        let (base, amplitude) = (self.base_height, self.amplitude);
        Ok(noise.normalized("normalized offset")?.map(|v| base + v * amplitude))
    }
}
