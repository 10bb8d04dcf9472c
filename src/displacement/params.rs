//! Named parameter records and the closed set of transform variants.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::linear::LinearScaleParams;
use super::offset::NormalizedOffsetParams;
use super::power_curve::PowerCurveParams;
use super::DisplacementTransform;
use crate::error::TerrainError;
use crate::terrain::Grid;

/// Tunables for one displacement transform variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformParams {
    LinearScale(LinearScaleParams),
    PowerCurveWithErosion(PowerCurveParams),
    NormalizedOffset(NormalizedOffsetParams),
}

impl DisplacementTransform for TransformParams {
    fn name(&self) -> &'static str {
        match self {
            Self::LinearScale(p) => p.name(),
            Self::PowerCurveWithErosion(p) => p.name(),
            Self::NormalizedOffset(p) => p.name(),
        }
    }

    fn validate(&self) -> Result<(), TerrainError> {
        match self {
            Self::LinearScale(p) => p.validate(),
            Self::PowerCurveWithErosion(p) => p.validate(),
            Self::NormalizedOffset(p) => p.validate(),
        }
    }

    fn apply(&self, noise: &Grid) -> Result<Grid, TerrainError> {
        match self {
            Self::LinearScale(p) => p.apply(noise),
            Self::PowerCurveWithErosion(p) => p.apply(noise),
            Self::NormalizedOffset(p) => p.apply(noise),
        }
    }
}

impl fmt::Display for TransformParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinearScale(p) => write!(f, "linear_scale(scale={})", p.scale),
            Self::PowerCurveWithErosion(p) => write!(
                f,
                "power_curve(base_scale={}, sharpness={}, erosion_iterations={}, roughness={})",
                p.base_scale, p.sharpness, p.erosion_iterations, p.roughness
            ),
            Self::NormalizedOffset(p) => write!(
                f,
                "normalized_offset(amplitude={}, base_height={})",
                p.amplitude, p.base_height
            ),
        }
    }
}

/// A named, timestamped set of transform tunables.
///
/// Records are built before generation and only read afterwards. Name
/// uniqueness is left to whoever stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Identifier of the parameter set.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time (UTC).
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Variant-specific tunables.
    pub transform: TransformParams,
}

impl Parameters {
    /// Creates a record stamped with the current time.
    pub fn new(name: impl Into<String>, transform: TransformParams) -> Self {
        Self {
            name: name.into(),
            description: None,
            created_at: Utc::now(),
            transform,
        }
    }

    /// Linear scaling record.
    pub fn linear(name: impl Into<String>, scale: f32) -> Self {
        Self::new(name, TransformParams::LinearScale(LinearScaleParams { scale }))
    }

    /// Power-curve + erosion record.
    pub fn power_curve(name: impl Into<String>, params: PowerCurveParams) -> Self {
        Self::new(name, TransformParams::PowerCurveWithErosion(params))
    }

    /// Normalized offset record.
    pub fn normalized_offset(name: impl Into<String>, params: NormalizedOffsetParams) -> Self {
        Self::new(name, TransformParams::NormalizedOffset(params))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// One-line description handed to renderers alongside the grid.
    pub fn summary(&self) -> String {
        match &self.description {
            Some(desc) => format!("{} - {} [{}]", self.name, desc, self.transform),
            None => format!("{} [{}]", self.name, self.transform),
        }
    }

    /// Applies this record's transform to `noise`.
    pub fn apply(&self, noise: &Grid) -> Result<Grid, TerrainError> {
        self.transform.apply(noise)
    }
}
