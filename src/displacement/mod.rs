//! Displacement transforms: noise field in, elevation field out.
//!
//! Every transform keeps the input shape and validates its tunables before
//! touching the grid.

mod linear;
mod offset;
mod params;
mod power_curve;

pub use linear::LinearScaleParams;
pub use offset::NormalizedOffsetParams;
pub use params::{Parameters, TransformParams};
pub use power_curve::{shape_features, simulate_erosion, PowerCurveParams, EROSION_SIGMA};

use crate::error::TerrainError;
use crate::terrain::Grid;

/// Maps a noise field to a displacement field of the same shape.
pub trait DisplacementTransform {
    /// Short identifier used in logs and summaries.
    fn name(&self) -> &'static str;

    /// Checks every tunable against its documented domain.
    fn validate(&self) -> Result<(), TerrainError>;

    /// Produces the displacement field for `noise`.
    fn apply(&self, noise: &Grid) -> Result<Grid, TerrainError>;
}
