//! Linear scaling of the noise field.

use serde::{Deserialize, Serialize};

use super::DisplacementTransform;
use crate::error::TerrainError;
use crate::terrain::Grid;

/// Displacement is the noise multiplied by `scale`; no normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearScaleParams {
    /// Scale factor applied to every noise value.
    pub scale: f32,
}

impl Default for LinearScaleParams {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl DisplacementTransform for LinearScaleParams {
    fn name(&self) -> &'static str {
        "linear_scale"
    }

    fn validate(&self) -> Result<(), TerrainError> {
        if !self.scale.is_finite() {
            return Err(TerrainError::invalid("scale", format!("must be finite, got {}", self.scale)));
        }
        Ok(())
    }

    fn apply(&self, noise: &Grid) -> Result<Grid, TerrainError> {
        self.validate()?;
        let scale = self.scale;
        Ok(noise.map(|v| v * scale))
    }
}
