//! JSON sweep configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::sweep::{GenerationPipeline, NoiseInput};
use crate::displacement::{DisplacementTransform, Parameters};
use crate::error::TerrainError;
use crate::projection::ProjectionType;
use crate::terrain::{GridShape, ShapeDims};

/// Everything needed to run a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSweepConfig")]
pub struct SweepConfig {
    /// Grid dimensions shared by every field.
    pub shape: GridShape,
    /// Shared noise source.
    pub noise: NoiseInput,
    /// Projection applied to every output, if set.
    pub projection: Option<ProjectionType>,
    /// One entry per displacement to produce.
    pub parameters: Vec<Parameters>,
    /// Run instances on the rayon pool.
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            shape: GridShape::one_degree(),
            noise: NoiseInput::default(),
            projection: None,
            parameters: Vec::new(),
            parallel: false,
        }
    }
}

/// The JSON layout before shape and projection tags are checked.
///
/// Checking them outside serde keeps their error kinds instead of flattening
/// them into a parse message.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawSweepConfig {
    shape: ShapeDims,
    noise: NoiseInput,
    projection: Option<String>,
    parameters: Vec<Parameters>,
    parallel: bool,
}

impl Default for RawSweepConfig {
    fn default() -> Self {
        let config = SweepConfig::default();
        Self {
            shape: config.shape.into(),
            noise: config.noise,
            projection: None,
            parameters: config.parameters,
            parallel: config.parallel,
        }
    }
}

impl TryFrom<RawSweepConfig> for SweepConfig {
    type Error = TerrainError;

    fn try_from(raw: RawSweepConfig) -> Result<Self, Self::Error> {
        let config = SweepConfig {
            shape: GridShape::try_from(raw.shape)?,
            noise: raw.noise,
            projection: raw.projection.as_deref().map(str::parse).transpose()?,
            parameters: raw.parameters,
            parallel: raw.parallel,
        };
        config.validate()?;
        Ok(config)
    }
}

impl SweepConfig {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, TerrainError> {
        let raw: RawSweepConfig = serde_json::from_str(json)?;
        SweepConfig::try_from(raw)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| TerrainError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&text)?;
        info!(
            path = %path.display(),
            shape = %config.shape,
            parameters = config.parameters.len(),
            "Loaded sweep configuration"
        );
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, TerrainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every parameter set's tunables.
    pub fn validate(&self) -> Result<(), TerrainError> {
        for params in &self.parameters {
            params.transform.validate()?;
        }
        Ok(())
    }

    /// Builds the pipeline described by this configuration.
    pub fn build_pipeline(&self) -> GenerationPipeline {
        let pipeline = GenerationPipeline::new(self.shape, self.noise.clone()).with_parallel(self.parallel);
        match self.projection {
            Some(projection) => pipeline.with_projection(projection),
            None => pipeline,
        }
    }
}
